//! Method identities and formal parameters.

use std::{fmt, sync::Arc};

use strum::{Display, EnumCount, EnumIter};

use crate::value::TypeDesc;

/// The shape of member an accessor or method identity belongs to.
///
/// Property, indexer and event accessors are independent method identities; the kind tells
/// built-in behaviors which calls they apply to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumCount, EnumIter)]
pub enum MemberKind {
    /// Ordinary method.
    Method,
    /// Property getter (`get_Name`).
    PropertyGet,
    /// Property setter (`set_Name`).
    PropertySet,
    /// Indexer getter (`get_Item`).
    IndexerGet,
    /// Indexer setter (`set_Item`).
    IndexerSet,
    /// Event subscription accessor (`add_Name`).
    EventAdd,
    /// Event unsubscription accessor (`remove_Name`).
    EventRemove,
}

impl MemberKind {
    /// Returns the accessor name prefix, if this kind is an accessor.
    #[must_use]
    pub fn prefix(self) -> Option<&'static str> {
        match self {
            MemberKind::Method => None,
            MemberKind::PropertyGet | MemberKind::IndexerGet => Some("get_"),
            MemberKind::PropertySet | MemberKind::IndexerSet => Some("set_"),
            MemberKind::EventAdd => Some("add_"),
            MemberKind::EventRemove => Some("remove_"),
        }
    }

    /// Returns `true` for event accessors.
    #[must_use]
    pub fn is_event_accessor(self) -> bool {
        matches!(self, MemberKind::EventAdd | MemberKind::EventRemove)
    }
}

/// How an argument flows between caller and callee.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display)]
pub enum Direction {
    /// Passed by value.
    #[strum(serialize = "in")]
    In,
    /// Passed by reference; the callee may read and replace it.
    #[strum(serialize = "ref")]
    Ref,
    /// Output only; the callee must assign it.
    #[strum(serialize = "out")]
    Out,
}

impl Direction {
    /// Returns `true` for `Ref` and `Out` parameters.
    #[must_use]
    pub fn is_by_ref(self) -> bool {
        !matches!(self, Direction::In)
    }
}

/// A formal parameter of a method identity.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Parameter {
    name: Arc<str>,
    ty: TypeDesc,
    direction: Direction,
}

impl Parameter {
    /// Creates a by-value parameter.
    #[must_use]
    pub fn new(name: impl Into<Arc<str>>, ty: TypeDesc) -> Self {
        Self {
            name: name.into(),
            ty,
            direction: Direction::In,
        }
    }

    /// Creates a by-reference parameter.
    #[must_use]
    pub fn by_ref(name: impl Into<Arc<str>>, ty: TypeDesc) -> Self {
        Self::new(name, ty).with_direction(Direction::Ref)
    }

    /// Creates an output parameter.
    #[must_use]
    pub fn out(name: impl Into<Arc<str>>, ty: TypeDesc) -> Self {
        Self::new(name, ty).with_direction(Direction::Out)
    }

    /// Sets the direction.
    #[must_use]
    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    /// Returns the parameter name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the declared type.
    #[must_use]
    pub fn ty(&self) -> &TypeDesc {
        &self.ty
    }

    /// Returns the direction.
    #[must_use]
    pub fn direction(&self) -> Direction {
        self.direction
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.direction.is_by_ref() {
            write!(f, "{} ", self.direction)?;
        }
        write!(f, "{} {}", self.ty, self.name)
    }
}

/// Opaque, comparable identity of a called method or accessor.
///
/// Two identities are equal when their declaring type, name, member kind, formal parameters,
/// return type and generic instantiation are equal. Generic instantiations are part of the
/// identity: `Get<i32>` and `Get<string>` are different methods.
///
/// # Examples
///
/// ```rust,ignore
/// use stunts::{invocation::{MethodInfo, Parameter}, value::TypeDesc};
///
/// let add = MethodInfo::method(
///     "ICalculator",
///     "Add",
///     vec![Parameter::new("x", TypeDesc::I32), Parameter::new("y", TypeDesc::I32)],
///     TypeDesc::I32,
/// );
/// assert_eq!(add.to_string(), "ICalculator::Add(i32 x, i32 y) -> i32");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct MethodInfo {
    declaring_type: Arc<str>,
    name: Arc<str>,
    kind: MemberKind,
    parameters: Arc<[Parameter]>,
    return_type: TypeDesc,
    generic_arguments: Vec<TypeDesc>,
}

impl MethodInfo {
    /// Creates an ordinary method identity.
    ///
    /// # Arguments
    ///
    /// * `declaring_type` - The contract declaring the method
    /// * `name` - The method name
    /// * `parameters` - Formal parameters in declaration order
    /// * `return_type` - The declared return type, [`TypeDesc::Void`] for none
    #[must_use]
    pub fn method(
        declaring_type: impl Into<Arc<str>>,
        name: impl Into<Arc<str>>,
        parameters: Vec<Parameter>,
        return_type: TypeDesc,
    ) -> Self {
        Self {
            declaring_type: declaring_type.into(),
            name: name.into(),
            kind: MemberKind::Method,
            parameters: parameters.into(),
            return_type,
            generic_arguments: Vec::new(),
        }
    }

    /// Creates the getter identity of a property.
    #[must_use]
    pub fn property_get(
        declaring_type: impl Into<Arc<str>>,
        property: &str,
        ty: TypeDesc,
    ) -> Self {
        Self::accessor(declaring_type, MemberKind::PropertyGet, property, Vec::new(), ty)
    }

    /// Creates the setter identity of a property.
    #[must_use]
    pub fn property_set(
        declaring_type: impl Into<Arc<str>>,
        property: &str,
        ty: TypeDesc,
    ) -> Self {
        Self::accessor(
            declaring_type,
            MemberKind::PropertySet,
            property,
            vec![Parameter::new("value", ty)],
            TypeDesc::Void,
        )
    }

    /// Creates the getter identity of an indexer.
    #[must_use]
    pub fn indexer_get(
        declaring_type: impl Into<Arc<str>>,
        indices: Vec<Parameter>,
        ty: TypeDesc,
    ) -> Self {
        Self::accessor(declaring_type, MemberKind::IndexerGet, "Item", indices, ty)
    }

    /// Creates the setter identity of an indexer. The assigned value is the last parameter.
    #[must_use]
    pub fn indexer_set(
        declaring_type: impl Into<Arc<str>>,
        mut indices: Vec<Parameter>,
        ty: TypeDesc,
    ) -> Self {
        indices.push(Parameter::new("value", ty));
        Self::accessor(
            declaring_type,
            MemberKind::IndexerSet,
            "Item",
            indices,
            TypeDesc::Void,
        )
    }

    /// Creates the subscription accessor identity of an event.
    #[must_use]
    pub fn event_add(
        declaring_type: impl Into<Arc<str>>,
        event: &str,
        handler_type: TypeDesc,
    ) -> Self {
        Self::accessor(
            declaring_type,
            MemberKind::EventAdd,
            event,
            vec![Parameter::new("value", handler_type)],
            TypeDesc::Void,
        )
    }

    /// Creates the unsubscription accessor identity of an event.
    #[must_use]
    pub fn event_remove(
        declaring_type: impl Into<Arc<str>>,
        event: &str,
        handler_type: TypeDesc,
    ) -> Self {
        Self::accessor(
            declaring_type,
            MemberKind::EventRemove,
            event,
            vec![Parameter::new("value", handler_type)],
            TypeDesc::Void,
        )
    }

    fn accessor(
        declaring_type: impl Into<Arc<str>>,
        kind: MemberKind,
        member: &str,
        parameters: Vec<Parameter>,
        return_type: TypeDesc,
    ) -> Self {
        let prefix = kind.prefix().unwrap_or_default();
        Self {
            declaring_type: declaring_type.into(),
            name: format!("{prefix}{member}").into(),
            kind,
            parameters: parameters.into(),
            return_type,
            generic_arguments: Vec::new(),
        }
    }

    /// Sets the generic instantiation of this method.
    #[must_use]
    pub fn with_generic_arguments(mut self, arguments: Vec<TypeDesc>) -> Self {
        self.generic_arguments = arguments;
        self
    }

    /// Returns the declaring contract name.
    #[must_use]
    pub fn declaring_type(&self) -> &str {
        &self.declaring_type
    }

    /// Returns the method name, including any accessor prefix.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the member name without accessor prefix (`Changed` for `add_Changed`).
    #[must_use]
    pub fn member_name(&self) -> &str {
        self.kind
            .prefix()
            .and_then(|prefix| self.name.strip_prefix(prefix))
            .unwrap_or(&self.name)
    }

    /// Returns the member kind.
    #[must_use]
    pub fn kind(&self) -> MemberKind {
        self.kind
    }

    /// Returns the formal parameters.
    #[must_use]
    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    /// Returns the declared return type.
    #[must_use]
    pub fn return_type(&self) -> &TypeDesc {
        &self.return_type
    }

    /// Returns the generic instantiation, empty for non-generic methods.
    #[must_use]
    pub fn generic_arguments(&self) -> &[TypeDesc] {
        &self.generic_arguments
    }
}

impl fmt::Display for MethodInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.declaring_type, self.name)?;
        if !self.generic_arguments.is_empty() {
            write!(f, "<")?;
            for (i, argument) in self.generic_arguments.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{argument}")?;
            }
            write!(f, ">")?;
        }
        write!(f, "(")?;
        for (i, parameter) in self.parameters.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{parameter}")?;
        }
        write!(f, ")")?;
        if self.return_type != TypeDesc::Void {
            write!(f, " -> {}", self.return_type)?;
        }
        Ok(())
    }
}
