//! The four argument matcher variants.

use std::{
    any::TypeId,
    fmt,
    hash::{Hash, Hasher},
    sync::Arc,
};

use crate::value::{TypeDesc, Value};

/// Type alias for conditional matcher predicates.
///
/// The predicate only ever sees values that already passed the type and nullability check of
/// the matcher's declared type.
pub type Predicate = dyn Fn(&Value) -> bool + Send + Sync;

/// How two conditions are told apart.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
enum Identity {
    /// The address of the shared predicate.
    Address(usize),
    /// The type of a predicate without captured state, shared by every evaluation of the same
    /// closure expression.
    Site(TypeId),
}

/// A named predicate, compared by identity.
///
/// Conditions built with [`Condition::new`] are equal only to their own clones. Conditions
/// built with [`Condition::keyed`] are equal whenever their keys are, which is what lets the
/// same setup expression evaluated twice freeze into equal setups.
#[derive(Clone)]
pub struct Condition {
    predicate: Arc<Predicate>,
    description: Arc<str>,
    site: Option<TypeId>,
}

impl Condition {
    /// Creates a condition from a predicate and a description used in diagnostics.
    pub fn new<F>(description: impl Into<Arc<str>>, predicate: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        Self {
            predicate: Arc::new(predicate),
            description: description.into(),
            site: None,
        }
    }

    /// Creates a condition whose identity is `key` instead of the predicate's address.
    ///
    /// Callers must only share a key between predicates that behave identically.
    pub fn keyed<F>(key: TypeId, description: impl Into<Arc<str>>, predicate: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        Self {
            predicate: Arc::new(predicate),
            description: description.into(),
            site: Some(key),
        }
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Evaluates the predicate.
    #[must_use]
    pub fn holds(&self, value: &Value) -> bool {
        (self.predicate)(value)
    }

    fn identity(&self) -> Identity {
        match self.site {
            Some(key) => Identity::Site(key),
            None => Identity::Address(Arc::as_ptr(&self.predicate) as *const () as usize),
        }
    }
}

impl PartialEq for Condition {
    fn eq(&self, other: &Self) -> bool {
        self.identity() == other.identity()
    }
}

impl Eq for Condition {}

impl Hash for Condition {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.identity().hash(state);
    }
}

impl fmt::Debug for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Condition").field(&self.description).finish()
    }
}

/// Constraint on one positional argument of a setup.
///
/// | Variant | `null` | non-null value | Equality |
/// |---------|--------|----------------|----------|
/// | [`Matcher::Any`] | iff the type accepts null | iff an instance of the type | by type |
/// | [`Matcher::Conditional`] | as `Any`, and the predicate holds | as `Any`, and the predicate holds | by type and predicate identity |
/// | [`Matcher::Not`] | iff the wrapped type accepts null and the wrapped matcher rejects it | iff an instance of the wrapped type that the wrapped matcher rejects | by wrapped matcher |
/// | [`Matcher::Value`] | iff the captured value is null | iff structurally equal | by type and value |
///
/// # Examples
///
/// ```rust,ignore
/// use stunts::{matcher::Matcher, value::{TypeDesc, Value}};
///
/// let positive = Matcher::condition(TypeDesc::I32, "x > 0", |v| v.as_i32().is_some_and(|x| x > 0));
/// assert!(positive.matches(&Value::I32(3)));
/// assert!(!Matcher::not(positive).matches(&Value::I32(3)));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Matcher {
    /// Accepts any instance of the type.
    Any(TypeDesc),
    /// Accepts instances of the type for which a condition holds.
    Conditional(TypeDesc, Condition),
    /// Inverts the verdict of the wrapped matcher.
    Not(Box<Matcher>),
    /// Accepts values structurally equal to a captured constant.
    Value(TypeDesc, Value),
}

impl Matcher {
    /// Creates a matcher accepting any instance of `ty`.
    #[must_use]
    pub fn any(ty: TypeDesc) -> Self {
        Matcher::Any(ty)
    }

    /// Creates a conditional matcher.
    pub fn condition<F>(ty: TypeDesc, description: impl Into<Arc<str>>, predicate: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        Matcher::Conditional(ty, Condition::new(description, predicate))
    }

    /// Creates a matcher inverting `inner`.
    #[must_use]
    pub fn not(inner: Matcher) -> Self {
        Matcher::Not(Box::new(inner))
    }

    /// Creates an exact-value matcher.
    #[must_use]
    pub fn value(ty: TypeDesc, value: Value) -> Self {
        Matcher::Value(ty, value)
    }

    /// Returns the static type this matcher is declared against.
    #[must_use]
    pub fn argument_type(&self) -> &TypeDesc {
        match self {
            Matcher::Any(ty) | Matcher::Conditional(ty, _) | Matcher::Value(ty, _) => ty,
            Matcher::Not(inner) => inner.argument_type(),
        }
    }

    /// Returns `true` if `value` satisfies this matcher.
    #[must_use]
    pub fn matches(&self, value: &Value) -> bool {
        match self {
            Matcher::Any(ty) => ty.accepts(value),
            Matcher::Conditional(ty, condition) => ty.accepts(value) && condition.holds(value),
            Matcher::Not(inner) => inner.argument_type().accepts(value) && !inner.matches(value),
            Matcher::Value(_, expected) => expected == value,
        }
    }
}

impl fmt::Display for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Matcher::Any(ty) => write!(f, "Any<{ty}>"),
            Matcher::Conditional(ty, condition) => {
                write!(f, "Is<{ty}>({})", condition.description())
            }
            Matcher::Not(inner) => write!(f, "Not({inner})"),
            Matcher::Value(_, value) => write!(f, "{value}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn positive() -> Matcher {
        Matcher::condition(TypeDesc::I32, "x > 0", |v| v.as_i32().is_some_and(|x| x > 0))
    }

    #[test]
    fn test_any_respects_nullability() {
        assert!(Matcher::any(TypeDesc::I32).matches(&Value::I32(0)));
        assert!(!Matcher::any(TypeDesc::I32).matches(&Value::Null));
        assert!(!Matcher::any(TypeDesc::I32).matches(&Value::I64(0)));
        assert!(Matcher::any(TypeDesc::nullable(TypeDesc::I32)).matches(&Value::Null));
        assert!(Matcher::any(TypeDesc::Object).matches(&Value::Null));
        assert!(Matcher::any(TypeDesc::class("IFoo")).matches(&Value::Null));
        assert!(!Matcher::any(TypeDesc::String).matches(&Value::Null));
    }

    #[test]
    fn test_conditional() {
        let m = positive();
        assert!(m.matches(&Value::I32(1)));
        assert!(!m.matches(&Value::I32(-1)));
        assert!(!m.matches(&Value::Null));

        let null_or_empty = Matcher::condition(
            TypeDesc::nullable(TypeDesc::String),
            "null or empty",
            |v| v.is_null() || v.as_str().is_some_and(str::is_empty),
        );
        assert!(null_or_empty.matches(&Value::Null));
        assert!(null_or_empty.matches(&Value::from("")));
        assert!(!null_or_empty.matches(&Value::from("x")));
    }

    #[test]
    fn test_not_respects_wrapped_nullability() {
        let m = Matcher::not(positive());
        assert!(m.matches(&Value::I32(-1)));
        assert!(!m.matches(&Value::I32(1)));
        assert!(!m.matches(&Value::Null));
        assert!(!m.matches(&Value::from("nope")));

        let not_three = Matcher::not(Matcher::value(
            TypeDesc::nullable(TypeDesc::I32),
            Value::I32(3),
        ));
        assert!(not_three.matches(&Value::Null));
        assert!(not_three.matches(&Value::I32(4)));
        assert!(!not_three.matches(&Value::I32(3)));
        assert_eq!(*not_three.argument_type(), TypeDesc::nullable(TypeDesc::I32));
    }

    #[test]
    fn test_value_matcher() {
        let m = Matcher::value(TypeDesc::I32, Value::I32(3));
        assert!(m.matches(&Value::I32(3)));
        assert!(!m.matches(&Value::I32(4)));
        assert!(Matcher::value(TypeDesc::Object, Value::Null).matches(&Value::Null));
    }

    #[test]
    fn test_equality() {
        assert_eq!(Matcher::any(TypeDesc::I32), Matcher::any(TypeDesc::I32));
        assert_ne!(Matcher::any(TypeDesc::I32), Matcher::any(TypeDesc::I64));
        assert_eq!(
            Matcher::value(TypeDesc::I32, 3.into()),
            Matcher::value(TypeDesc::I32, 3.into())
        );
        assert_ne!(
            Matcher::value(TypeDesc::I32, 3.into()),
            Matcher::value(TypeDesc::Object, 3.into())
        );

        let m = positive();
        assert_eq!(m, m.clone());
        assert_ne!(m, positive());
        assert_eq!(Matcher::not(m.clone()), Matcher::not(m));
    }

    #[test]
    fn test_display() {
        assert_eq!(Matcher::any(TypeDesc::I32).to_string(), "Any<i32>");
        assert_eq!(positive().to_string(), "Is<i32>(x > 0)");
        assert_eq!(Matcher::not(Matcher::value(TypeDesc::I32, 3.into())).to_string(), "Not(3)");
    }
}
