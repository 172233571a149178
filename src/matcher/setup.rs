//! Frozen call shapes that later invocations are matched against.

use std::{
    fmt,
    hash::{Hash, Hasher},
    sync::Arc,
};

use crate::{
    invocation::{Invocation, MethodInfo},
    matcher::Matcher,
    Result,
};

struct SetupInner {
    invocation: Invocation,
    matchers: Vec<Matcher>,
}

/// A method identity paired with one matcher per formal parameter.
///
/// Setups are immutable and cheap to clone. Equality and hashing only consider the method
/// identity and the matchers, so two setups frozen from equivalent expressions are the same
/// map key regardless of which proxy or call they were frozen from.
#[derive(Clone)]
pub struct Setup(Arc<SetupInner>);

impl Setup {
    /// Creates a setup from the invocation active at declaration time.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidArgument`] if there is not exactly one matcher per
    /// argument of `invocation`.
    pub fn new(invocation: Invocation, matchers: Vec<Matcher>) -> Result<Self> {
        if matchers.len() != invocation.arguments().len() {
            return Err(invalid_argument!(
                "{} has {} arguments but {} matchers were supplied",
                invocation.method(),
                invocation.arguments().len(),
                matchers.len()
            ));
        }

        Ok(Setup(Arc::new(SetupInner {
            invocation,
            matchers,
        })))
    }

    /// Returns the invocation the setup was frozen from.
    #[must_use]
    pub fn invocation(&self) -> &Invocation {
        &self.0.invocation
    }

    /// Returns the method identity.
    #[must_use]
    pub fn method(&self) -> &MethodInfo {
        self.0.invocation.method()
    }

    /// Returns the matchers in parameter order.
    #[must_use]
    pub fn matchers(&self) -> &[Matcher] {
        &self.0.matchers
    }

    /// Returns `true` if `actual` has the same method identity, the same arity, and every
    /// argument is accepted by the matcher at its position.
    #[must_use]
    pub fn applies_to(&self, actual: &Invocation) -> bool {
        if **actual.method() != *self.method() {
            return false;
        }

        let arguments = actual.arguments().to_vec();
        arguments.len() == self.0.matchers.len()
            && self
                .0
                .matchers
                .iter()
                .zip(arguments.iter())
                .all(|(matcher, value)| matcher.matches(value))
    }
}

impl PartialEq for Setup {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
            || (self.method() == other.method() && self.matchers() == other.matchers())
    }
}

impl Eq for Setup {}

impl Hash for Setup {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.method().hash(state);
        self.matchers().hash(state);
    }
}

impl fmt::Debug for Setup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Setup({self})")
    }
}

impl fmt::Display for Setup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}(", self.method().declaring_type(), self.method().name())?;
        for (i, matcher) in self.matchers().iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{matcher}")?;
        }
        write!(f, ")")
    }
}
