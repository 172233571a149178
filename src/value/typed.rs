//! Bridge between Rust argument types and dynamic [`Value`]s.

use crate::value::{TypeDesc, Value};

/// A Rust type that can appear as a proxied argument or return value.
///
/// Generated member bodies convert their typed parameters with [`ArgType::into_value`] before
/// building an invocation, and convert the pipeline's return value back with
/// [`ArgType::from_value`]. Matcher helpers in [`crate::matcher::arg`] use
/// [`ArgType::placeholder`] to hand the surrounding call a harmless default.
///
/// The placeholder must convert to the declared type's [`TypeDesc::default_value`]; the capture
/// protocol recognises matcher-produced arguments by that equality.
pub trait ArgType: Sized + 'static {
    /// Returns the static type of this Rust type.
    fn type_desc() -> TypeDesc;

    /// Converts into a dynamic value.
    fn into_value(self) -> Value;

    /// Converts from a dynamic value, or `None` if the value has another type.
    fn from_value(value: &Value) -> Option<Self>;

    /// Returns the default placeholder of this type.
    fn placeholder() -> Self;
}

macro_rules! primitive_arg_type {
    ($ty:ty, $desc:expr, $variant:ident) => {
        impl ArgType for $ty {
            fn type_desc() -> TypeDesc {
                $desc
            }

            fn into_value(self) -> Value {
                Value::$variant(self)
            }

            fn from_value(value: &Value) -> Option<Self> {
                match value {
                    Value::$variant(v) => Some(*v),
                    _ => None,
                }
            }

            fn placeholder() -> Self {
                <$ty>::default()
            }
        }
    };
}

primitive_arg_type!(bool, TypeDesc::Bool, Bool);
primitive_arg_type!(i32, TypeDesc::I32, I32);
primitive_arg_type!(i64, TypeDesc::I64, I64);
primitive_arg_type!(f64, TypeDesc::F64, F64);
primitive_arg_type!(char, TypeDesc::Char, Char);

impl ArgType for String {
    fn type_desc() -> TypeDesc {
        TypeDesc::String
    }

    fn into_value(self) -> Value {
        Value::from(self)
    }

    fn from_value(value: &Value) -> Option<Self> {
        value.as_str().map(str::to_owned)
    }

    fn placeholder() -> Self {
        String::new()
    }
}

impl ArgType for Value {
    fn type_desc() -> TypeDesc {
        TypeDesc::Object
    }

    fn into_value(self) -> Value {
        self
    }

    fn from_value(value: &Value) -> Option<Self> {
        Some(value.clone())
    }

    fn placeholder() -> Self {
        Value::Null
    }
}

impl<T: ArgType> ArgType for Option<T> {
    fn type_desc() -> TypeDesc {
        TypeDesc::nullable(T::type_desc())
    }

    fn into_value(self) -> Value {
        match self {
            Some(inner) => inner.into_value(),
            None => Value::Null,
        }
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Null => Some(None),
            other => T::from_value(other).map(Some),
        }
    }

    fn placeholder() -> Self {
        None
    }
}
