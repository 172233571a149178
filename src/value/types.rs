//! Static type descriptors for parameters, return values and matchers.

use std::{fmt, sync::Arc};

use crate::value::Value;

/// Static type of a parameter, return value or matcher.
///
/// `TypeDesc` plays the role a reflected type plays in a managed runtime: it decides whether
/// a value is an instance of the type, whether `null` is acceptable, which value is the
/// type's default and which other types can be assigned to it.
///
/// # Nullability
///
/// | Category | Variants | Accepts `null` | Default |
/// |----------|----------|----------------|---------|
/// | Primitive | `Bool`, `I32`, `I64`, `F64`, `Char`, `String` | no | zero / `false` / `'\0'` / `""` |
/// | Aggregate value | `Tuple` | no | tuple of element defaults |
/// | Nullable value | `Nullable(T)` | yes | `null` |
/// | Reference | `Object`, `Array`, `Sequence`, `Task`, `Delegate`, `Class` | yes | `null` |
///
/// Strings are non-nullable; a nullable string is `Nullable(String)` (`Option<String>` in the
/// typed API).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeDesc {
    /// No value; only valid as a return type.
    Void,
    /// Boolean.
    Bool,
    /// 32-bit signed integer.
    I32,
    /// 64-bit signed integer.
    I64,
    /// 64-bit floating point.
    F64,
    /// Unicode scalar.
    Char,
    /// Owned, non-nullable string.
    String,
    /// The universal base type. Every non-void value is an instance of it.
    Object,
    /// A value type that additionally accepts `null`.
    Nullable(Box<TypeDesc>),
    /// Array with the given element type.
    Array(Box<TypeDesc>),
    /// Iterable contract with the given element type.
    Sequence(Box<TypeDesc>),
    /// Tuple-like aggregate value.
    Tuple(Vec<TypeDesc>),
    /// Asynchronous result wrapper. `None` is a unit (void) task.
    Task(Option<Box<TypeDesc>>),
    /// Named delegate (event handler) type.
    Delegate(Arc<str>),
    /// Named reference type (class or interface).
    Class(Arc<str>),
}

impl TypeDesc {
    /// Creates an array type.
    #[must_use]
    pub fn array(element: TypeDesc) -> Self {
        TypeDesc::Array(Box::new(element))
    }

    /// Creates an iterable contract type.
    #[must_use]
    pub fn sequence(element: TypeDesc) -> Self {
        TypeDesc::Sequence(Box::new(element))
    }

    /// Creates a nullable type. Types that already accept `null` are returned unchanged.
    #[must_use]
    pub fn nullable(inner: TypeDesc) -> Self {
        if inner.accepts_null() {
            inner
        } else {
            TypeDesc::Nullable(Box::new(inner))
        }
    }

    /// Creates a task type producing `result`, or a unit task for `None`.
    #[must_use]
    pub fn task(result: Option<TypeDesc>) -> Self {
        TypeDesc::Task(result.map(Box::new))
    }

    /// Creates a named delegate type.
    #[must_use]
    pub fn delegate(name: impl Into<Arc<str>>) -> Self {
        TypeDesc::Delegate(name.into())
    }

    /// Creates a named reference type.
    #[must_use]
    pub fn class(name: impl Into<Arc<str>>) -> Self {
        TypeDesc::Class(name.into())
    }

    /// Returns `true` for reference types.
    #[must_use]
    pub fn is_reference_type(&self) -> bool {
        matches!(
            self,
            TypeDesc::Object
                | TypeDesc::Array(_)
                | TypeDesc::Sequence(_)
                | TypeDesc::Task(_)
                | TypeDesc::Delegate(_)
                | TypeDesc::Class(_)
        )
    }

    /// Returns `true` if `null` is a valid value of this type.
    ///
    /// This holds for reference types and nullable value types.
    #[must_use]
    pub fn accepts_null(&self) -> bool {
        matches!(self, TypeDesc::Nullable(_)) || self.is_reference_type()
    }

    /// Returns the default value of this type.
    ///
    /// This is the "zero" value a generated member sees for an argument that was produced by a
    /// matcher helper, and it drives the placeholder heuristic of
    /// [`crate::matcher::capture::freeze`].
    #[must_use]
    pub fn default_value(&self) -> Value {
        match self {
            TypeDesc::Void => Value::Void,
            TypeDesc::Bool => Value::Bool(false),
            TypeDesc::I32 => Value::I32(0),
            TypeDesc::I64 => Value::I64(0),
            TypeDesc::F64 => Value::F64(0.0),
            TypeDesc::Char => Value::Char('\0'),
            TypeDesc::String => Value::String(Arc::from("")),
            TypeDesc::Tuple(elements) => {
                Value::Tuple(elements.iter().map(TypeDesc::default_value).collect())
            }
            TypeDesc::Object
            | TypeDesc::Nullable(_)
            | TypeDesc::Array(_)
            | TypeDesc::Sequence(_)
            | TypeDesc::Task(_)
            | TypeDesc::Delegate(_)
            | TypeDesc::Class(_) => Value::Null,
        }
    }

    /// Returns `true` if a value of type `source` can be stored in a slot of this type.
    ///
    /// Identity, the universal `Object` base, lifting into `Nullable` and arrays flowing into
    /// iterable contracts of the same element type are the supported conversions.
    #[must_use]
    pub fn is_assignable_from(&self, source: &TypeDesc) -> bool {
        if self == source {
            return true;
        }

        match (self, source) {
            (TypeDesc::Object, other) => *other != TypeDesc::Void,
            (TypeDesc::Nullable(inner), other) => inner.as_ref() == other,
            (TypeDesc::Sequence(element), TypeDesc::Array(source_element)) => {
                element == source_element
            }
            _ => false,
        }
    }

    /// Returns `true` if `value` is an instance of this type.
    ///
    /// `null` is accepted exactly when [`accepts_null`](Self::accepts_null) holds.
    #[must_use]
    pub fn accepts(&self, value: &Value) -> bool {
        match (self, value) {
            (_, Value::Null) => self.accepts_null(),
            (TypeDesc::Void, Value::Void) => true,
            (_, Value::Void) => false,
            (TypeDesc::Object, _) => true,
            (TypeDesc::Nullable(inner), other) => inner.accepts(other),
            (TypeDesc::Bool, Value::Bool(_))
            | (TypeDesc::I32, Value::I32(_))
            | (TypeDesc::I64, Value::I64(_))
            | (TypeDesc::F64, Value::F64(_))
            | (TypeDesc::Char, Value::Char(_))
            | (TypeDesc::String, Value::String(_)) => true,
            (TypeDesc::Array(element), Value::Array(items)) => items.element() == element.as_ref(),
            (TypeDesc::Sequence(element), Value::Array(items) | Value::Sequence(items)) => {
                items.element() == element.as_ref()
            }
            (TypeDesc::Tuple(types), Value::Tuple(values)) => {
                types.len() == values.len()
                    && types.iter().zip(values.iter()).all(|(t, v)| t.accepts(v))
            }
            (TypeDesc::Task(None), Value::Completed(None)) => true,
            (TypeDesc::Task(Some(result)), Value::Completed(Some(inner))) => result.accepts(inner),
            (TypeDesc::Delegate(name), Value::Handler(handler)) => handler.type_name() == &**name,
            (TypeDesc::Class(name), Value::Object(object)) => object.type_name() == &**name,
            _ => false,
        }
    }
}

impl fmt::Display for TypeDesc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeDesc::Void => write!(f, "void"),
            TypeDesc::Bool => write!(f, "bool"),
            TypeDesc::I32 => write!(f, "i32"),
            TypeDesc::I64 => write!(f, "i64"),
            TypeDesc::F64 => write!(f, "f64"),
            TypeDesc::Char => write!(f, "char"),
            TypeDesc::String => write!(f, "string"),
            TypeDesc::Object => write!(f, "object"),
            TypeDesc::Nullable(inner) => write!(f, "{inner}?"),
            TypeDesc::Array(element) => write!(f, "{element}[]"),
            TypeDesc::Sequence(element) => write!(f, "seq<{element}>"),
            TypeDesc::Tuple(elements) => {
                write!(f, "(")?;
                for (i, element) in elements.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{element}")?;
                }
                write!(f, ")")
            }
            TypeDesc::Task(None) => write!(f, "task"),
            TypeDesc::Task(Some(result)) => write!(f, "task<{result}>"),
            TypeDesc::Delegate(name) | TypeDesc::Class(name) => write!(f, "{name}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{Elements, ObjectRef};

    #[test]
    fn test_nullability_rules() {
        assert!(!TypeDesc::I32.accepts_null());
        assert!(!TypeDesc::String.accepts_null());
        assert!(TypeDesc::nullable(TypeDesc::I32).accepts_null());
        assert!(TypeDesc::Object.accepts_null());
        assert!(TypeDesc::array(TypeDesc::I32).accepts_null());
        assert!(TypeDesc::class("ICalculator").accepts_null());
    }

    #[test]
    fn test_nullable_of_reference_is_identity() {
        let class = TypeDesc::class("IFoo");
        assert_eq!(TypeDesc::nullable(class.clone()), class);
    }

    #[test]
    fn test_default_values() {
        assert_eq!(TypeDesc::I32.default_value(), Value::I32(0));
        assert_eq!(TypeDesc::Bool.default_value(), Value::Bool(false));
        assert_eq!(TypeDesc::String.default_value(), Value::from(""));
        assert_eq!(TypeDesc::array(TypeDesc::I32).default_value(), Value::Null);
        assert_eq!(
            TypeDesc::Tuple(vec![TypeDesc::I32, TypeDesc::Bool]).default_value(),
            Value::Tuple(vec![Value::I32(0), Value::Bool(false)].into())
        );
    }

    #[test]
    fn test_assignability() {
        assert!(TypeDesc::I32.is_assignable_from(&TypeDesc::I32));
        assert!(TypeDesc::Object.is_assignable_from(&TypeDesc::I32));
        assert!(!TypeDesc::Object.is_assignable_from(&TypeDesc::Void));
        assert!(TypeDesc::nullable(TypeDesc::I32).is_assignable_from(&TypeDesc::I32));
        assert!(TypeDesc::sequence(TypeDesc::I32).is_assignable_from(&TypeDesc::array(TypeDesc::I32)));
        assert!(!TypeDesc::I32.is_assignable_from(&TypeDesc::I64));
        assert!(!TypeDesc::I32.is_assignable_from(&TypeDesc::Object));
    }

    #[test]
    fn test_accepts_values() {
        assert!(TypeDesc::I32.accepts(&Value::I32(5)));
        assert!(!TypeDesc::I32.accepts(&Value::I64(5)));
        assert!(!TypeDesc::I32.accepts(&Value::Null));
        assert!(TypeDesc::nullable(TypeDesc::I32).accepts(&Value::I32(5)));
        assert!(TypeDesc::nullable(TypeDesc::I32).accepts(&Value::Null));
        assert!(TypeDesc::Object.accepts(&Value::from("x")));

        let ints = Value::Array(Elements::new(TypeDesc::I32, vec![Value::I32(1)]));
        assert!(TypeDesc::array(TypeDesc::I32).accepts(&ints));
        assert!(TypeDesc::sequence(TypeDesc::I32).accepts(&ints));
        assert!(!TypeDesc::array(TypeDesc::I64).accepts(&ints));

        let object = Value::Object(ObjectRef::new("Widget", 7_u32));
        assert!(TypeDesc::class("Widget").accepts(&object));
        assert!(!TypeDesc::class("Gadget").accepts(&object));
    }

    #[test]
    fn test_display() {
        assert_eq!(TypeDesc::array(TypeDesc::I32).to_string(), "i32[]");
        assert_eq!(TypeDesc::nullable(TypeDesc::Bool).to_string(), "bool?");
        assert_eq!(
            TypeDesc::task(Some(TypeDesc::String)).to_string(),
            "task<string>"
        );
    }
}
