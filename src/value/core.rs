//! Dynamic argument and return value representation.

use std::{
    any::Any,
    fmt,
    hash::{Hash, Hasher},
    sync::Arc,
};

use crate::value::{Handler, TypeDesc};

/// Runtime value flowing through the interception pipeline.
///
/// `Value` represents every argument, return value and by-reference output a generated member
/// can hand to the pipeline. Equality is structural, which is what exact-value matchers and
/// setup deduplication rely on:
///
/// | Variant | Equality |
/// |---------|----------|
/// | Primitives, strings | by value (`F64` by bit pattern) |
/// | [`Value::Array`], [`Value::Sequence`], [`Value::Tuple`] | element-wise |
/// | [`Value::Completed`] | by inner value |
/// | [`Value::Handler`] | by invocation list identity |
/// | [`Value::Object`] | by reference identity |
///
/// Because floats compare by bit pattern, `Value` implements `Eq` and `Hash` and can be part of
/// map keys.
#[derive(Clone, Debug)]
pub enum Value {
    /// No value (void return).
    Void,
    /// The `null` reference.
    Null,
    /// Boolean value.
    Bool(bool),
    /// 32-bit signed integer.
    I32(i32),
    /// 64-bit signed integer.
    I64(i64),
    /// 64-bit floating point.
    F64(f64),
    /// Unicode scalar.
    Char(char),
    /// Immutable string.
    String(Arc<str>),
    /// Array instance.
    Array(Elements),
    /// Iterable instance that is not an array.
    Sequence(Elements),
    /// Tuple-like aggregate.
    Tuple(Arc<[Value]>),
    /// Completed asynchronous result; `None` for a unit task.
    Completed(Option<Arc<Value>>),
    /// Event handler delegate.
    Handler(Handler),
    /// Opaque reference, compared by identity.
    Object(ObjectRef),
}

impl Value {
    /// Returns `true` if this value is `null`.
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns `true` if this value is void.
    #[must_use]
    pub fn is_void(&self) -> bool {
        matches!(self, Value::Void)
    }

    /// Returns the static type this value is an exact instance of.
    ///
    /// `null` has no type of its own and yields `None`.
    #[must_use]
    pub fn type_desc(&self) -> Option<TypeDesc> {
        Some(match self {
            Value::Null => return None,
            Value::Void => TypeDesc::Void,
            Value::Bool(_) => TypeDesc::Bool,
            Value::I32(_) => TypeDesc::I32,
            Value::I64(_) => TypeDesc::I64,
            Value::F64(_) => TypeDesc::F64,
            Value::Char(_) => TypeDesc::Char,
            Value::String(_) => TypeDesc::String,
            Value::Array(items) => TypeDesc::array(items.element().clone()),
            Value::Sequence(items) => TypeDesc::sequence(items.element().clone()),
            Value::Tuple(values) => TypeDesc::Tuple(
                values
                    .iter()
                    .map(|v| v.type_desc().unwrap_or(TypeDesc::Object))
                    .collect(),
            ),
            Value::Completed(None) => TypeDesc::task(None),
            Value::Completed(Some(inner)) => {
                TypeDesc::task(Some(inner.type_desc().unwrap_or(TypeDesc::Object)))
            }
            Value::Handler(handler) => TypeDesc::delegate(handler.type_name()),
            Value::Object(object) => TypeDesc::class(object.type_name()),
        })
    }

    /// Attempts to extract an `i32` value.
    #[must_use]
    pub fn as_i32(&self) -> Option<i32> {
        match self {
            Value::I32(v) => Some(*v),
            _ => None,
        }
    }

    /// Attempts to extract an `i64` value.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::I64(v) => Some(*v),
            _ => None,
        }
    }

    /// Attempts to extract a `bool` value.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Attempts to extract a string slice.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(v) => Some(&**v),
            _ => None,
        }
    }

    /// Attempts to extract the elements of an array or sequence.
    #[must_use]
    pub fn as_elements(&self) -> Option<&Elements> {
        match self {
            Value::Array(items) | Value::Sequence(items) => Some(items),
            _ => None,
        }
    }

    /// Attempts to extract an event handler.
    #[must_use]
    pub fn as_handler(&self) -> Option<&Handler> {
        match self {
            Value::Handler(handler) => Some(handler),
            _ => None,
        }
    }

    /// Attempts to extract an object reference.
    #[must_use]
    pub fn as_object(&self) -> Option<&ObjectRef> {
        match self {
            Value::Object(object) => Some(object),
            _ => None,
        }
    }

    fn discriminant(&self) -> u8 {
        match self {
            Value::Void => 0,
            Value::Null => 1,
            Value::Bool(_) => 2,
            Value::I32(_) => 3,
            Value::I64(_) => 4,
            Value::F64(_) => 5,
            Value::Char(_) => 6,
            Value::String(_) => 7,
            Value::Array(_) => 8,
            Value::Sequence(_) => 9,
            Value::Tuple(_) => 10,
            Value::Completed(_) => 11,
            Value::Handler(_) => 12,
            Value::Object(_) => 13,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Void, Value::Void) | (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::I32(a), Value::I32(b)) => a == b,
            (Value::I64(a), Value::I64(b)) => a == b,
            (Value::F64(a), Value::F64(b)) => a.to_bits() == b.to_bits(),
            (Value::Char(a), Value::Char(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Array(a), Value::Array(b)) | (Value::Sequence(a), Value::Sequence(b)) => a == b,
            (Value::Tuple(a), Value::Tuple(b)) => a == b,
            (Value::Completed(a), Value::Completed(b)) => a == b,
            (Value::Handler(a), Value::Handler(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.discriminant().hash(state);
        match self {
            Value::Void | Value::Null => {}
            Value::Bool(v) => v.hash(state),
            Value::I32(v) => v.hash(state),
            Value::I64(v) => v.hash(state),
            Value::F64(v) => v.to_bits().hash(state),
            Value::Char(v) => v.hash(state),
            Value::String(v) => v.hash(state),
            Value::Array(items) | Value::Sequence(items) => items.hash(state),
            Value::Tuple(values) => values.hash(state),
            Value::Completed(inner) => inner.hash(state),
            Value::Handler(handler) => handler.hash(state),
            Value::Object(object) => object.hash(state),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Void => write!(f, "void"),
            Value::Null => write!(f, "null"),
            Value::Bool(v) => write!(f, "{v}"),
            Value::I32(v) => write!(f, "{v}"),
            Value::I64(v) => write!(f, "{v}L"),
            Value::F64(v) => write!(f, "{v:?}"),
            Value::Char(v) => write!(f, "{v:?}"),
            Value::String(v) => write!(f, "{:?}", &**v),
            Value::Array(items) | Value::Sequence(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            Value::Tuple(values) => {
                write!(f, "(")?;
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{value}")?;
                }
                write!(f, ")")
            }
            Value::Completed(None) => write!(f, "completed"),
            Value::Completed(Some(inner)) => write!(f, "completed({inner})"),
            Value::Handler(handler) => write!(f, "<{} x{}>", handler.type_name(), handler.len()),
            Value::Object(object) => write!(f, "<{}>", object.type_name()),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::I32(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::I64(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::F64(value)
    }
}

impl From<char> for Value {
    fn from(value: char) -> Self {
        Value::Char(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(Arc::from(value))
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(Arc::from(value))
    }
}

impl From<Handler> for Value {
    fn from(value: Handler) -> Self {
        Value::Handler(value)
    }
}

impl From<ObjectRef> for Value {
    fn from(value: ObjectRef) -> Self {
        Value::Object(value)
    }
}

/// Typed element storage shared by arrays and sequences.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Elements {
    element: TypeDesc,
    items: Arc<[Value]>,
}

impl Elements {
    /// Creates a collection of `items` declared with `element` as element type.
    #[must_use]
    pub fn new(element: TypeDesc, items: Vec<Value>) -> Self {
        Self {
            element,
            items: items.into(),
        }
    }

    /// Creates an empty collection of the given element type.
    #[must_use]
    pub fn empty(element: TypeDesc) -> Self {
        Self::new(element, Vec::new())
    }

    /// Returns the declared element type.
    #[must_use]
    pub fn element(&self) -> &TypeDesc {
        &self.element
    }

    /// Returns the number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if the collection has no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns an iterator over the elements.
    pub fn iter(&self) -> impl Iterator<Item = &Value> {
        self.items.iter()
    }
}

/// Reference to an arbitrary shared object, compared by identity.
///
/// Object references are how proxies, user objects and other non-primitive instances travel
/// through the pipeline. Two references are equal only if they point at the same allocation.
#[derive(Clone)]
pub struct ObjectRef {
    type_name: Arc<str>,
    inner: Arc<dyn Any + Send + Sync>,
}

impl ObjectRef {
    /// Allocates `value` and wraps it in a new reference.
    pub fn new<T: Any + Send + Sync>(type_name: impl Into<Arc<str>>, value: T) -> Self {
        Self::from_arc(type_name, Arc::new(value))
    }

    /// Wraps an existing allocation. References created from clones of the same `Arc` are
    /// equal.
    pub fn from_arc<T: Any + Send + Sync>(type_name: impl Into<Arc<str>>, value: Arc<T>) -> Self {
        Self {
            type_name: type_name.into(),
            inner: value,
        }
    }

    /// Wraps a type-erased allocation.
    pub fn from_any(type_name: impl Into<Arc<str>>, value: Arc<dyn Any + Send + Sync>) -> Self {
        Self {
            type_name: type_name.into(),
            inner: value,
        }
    }

    /// Returns the name of the object's type.
    #[must_use]
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Returns the address of the referenced allocation.
    #[must_use]
    pub fn identity(&self) -> usize {
        Arc::as_ptr(&self.inner) as *const () as usize
    }

    /// Attempts to view the referenced object as a `T`.
    #[must_use]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.inner.downcast_ref::<T>()
    }
}

impl PartialEq for ObjectRef {
    fn eq(&self, other: &Self) -> bool {
        self.identity() == other.identity()
    }
}

impl Eq for ObjectRef {}

impl Hash for ObjectRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.identity().hash(state);
    }
}

impl fmt::Debug for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectRef")
            .field("type_name", &self.type_name)
            .field("identity", &format_args!("{:#x}", self.identity()))
            .finish()
    }
}
