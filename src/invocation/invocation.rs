//! The description of a single intercepted call.

use std::{
    collections::HashSet,
    fmt,
    hash::{Hash, Hasher},
    sync::Arc,
};

use crate::{
    invocation::{Arguments, Context, MethodInfo, Outputs, Return},
    pipeline::BehaviorKind,
    proxy::Target,
    value::Value,
    Exception, Result,
};

/// One call made on a proxy.
///
/// An invocation names the proxy it was made on, the method identity that was called and the
/// positional arguments. It also carries a [`Context`] shared with the eventual [`Return`]
/// and a set of behavior kinds the pipeline must skip for this call.
///
/// Equality compares the target by identity, the method by value and the arguments
/// element-wise. The context and the exclusion set do not take part.
///
/// # Examples
///
/// ```rust,ignore
/// use stunts::prelude::*;
///
/// let invocation = Invocation::new(target, add.clone(), vec![2.into(), 3.into()])?;
/// assert_eq!(invocation.to_string(), "ICalculator::Add(x: 2, y: 3)");
///
/// let ret = invocation.create_value_return(Value::I32(5));
/// assert_eq!(ret.value(), Some(&Value::I32(5)));
/// ```
#[derive(Clone)]
pub struct Invocation {
    target: Target,
    method: Arc<MethodInfo>,
    arguments: Arguments,
    context: Context,
    excluded: HashSet<BehaviorKind>,
}

impl Invocation {
    /// Creates an invocation with an empty context and no exclusions.
    ///
    /// # Arguments
    ///
    /// * `target` - The proxy the call was made on
    /// * `method` - The called method identity
    /// * `arguments` - Argument values in parameter order
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidArgument`] if the number of arguments does not match the
    /// number of formal parameters.
    pub fn new(
        target: Target,
        method: impl Into<Arc<MethodInfo>>,
        arguments: Vec<Value>,
    ) -> Result<Self> {
        Self::builder()
            .target(target)
            .method(method)
            .arguments(arguments)
            .build()
    }

    /// Returns a builder for invocations with a custom context or exclusions.
    #[must_use]
    pub fn builder() -> InvocationBuilder {
        InvocationBuilder::default()
    }

    /// Returns the proxy the call was made on.
    #[must_use]
    pub fn target(&self) -> &Target {
        &self.target
    }

    /// Returns the called method identity.
    #[must_use]
    pub fn method(&self) -> &Arc<MethodInfo> {
        &self.method
    }

    /// Returns the arguments.
    #[must_use]
    pub fn arguments(&self) -> &Arguments {
        &self.arguments
    }

    /// Returns the context shared with the return.
    #[must_use]
    pub fn context(&self) -> &Context {
        &self.context
    }

    /// Returns the behavior kinds skipped for this call.
    #[must_use]
    pub fn excluded_kinds(&self) -> &HashSet<BehaviorKind> {
        &self.excluded
    }

    /// Returns `true` if behaviors of `kind` must be skipped for this call.
    #[must_use]
    pub fn is_excluded(&self, kind: &BehaviorKind) -> bool {
        self.excluded.contains(kind)
    }

    /// Returns a copy of this invocation that additionally skips behaviors of `kind`.
    ///
    /// The copy shares the context, so a behavior re-entering the pipeline with it still sees
    /// the values written so far.
    #[must_use]
    pub fn excluding(&self, kind: BehaviorKind) -> Invocation {
        let mut invocation = self.clone();
        invocation.excluded.insert(kind);
        invocation
    }

    /// Creates a value return.
    ///
    /// The by-reference outputs are taken from the current values of the `ref` and `out`
    /// arguments, so behaviors assign them through [`Arguments::set`] first.
    #[must_use]
    pub fn create_value_return(&self, value: Value) -> Return {
        let outputs = Outputs::new(self.arguments.by_ref_values());
        Return::with_value(value, outputs, self.context.clone())
    }

    /// Creates a value return with explicit by-reference outputs.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidArgument`] if `outputs` does not hold exactly one value per
    /// `ref`/`out` parameter.
    pub fn create_value_return_with(&self, value: Value, outputs: Vec<Value>) -> Result<Return> {
        let by_ref: Vec<_> = self
            .arguments
            .parameters()
            .iter()
            .filter(|parameter| parameter.direction().is_by_ref())
            .cloned()
            .collect();

        if by_ref.len() != outputs.len() {
            return Err(invalid_argument!(
                "{} expects {} by-reference outputs, got {}",
                self.method,
                by_ref.len(),
                outputs.len()
            ));
        }

        let outputs = Outputs::new(by_ref.into_iter().zip(outputs).collect());
        Ok(Return::with_value(value, outputs, self.context.clone()))
    }

    /// Creates an exception return.
    #[must_use]
    pub fn create_exception_return(&self, exception: Exception) -> Return {
        Return::with_exception(exception, self.context.clone())
    }
}

impl PartialEq for Invocation {
    fn eq(&self, other: &Self) -> bool {
        self.target == other.target
            && self.method == other.method
            && self.arguments == other.arguments
    }
}

impl Eq for Invocation {}

impl Hash for Invocation {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.target.hash(state);
        self.method.hash(state);
        self.arguments.hash(state);
    }
}

impl fmt::Debug for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Invocation")
            .field("target", &self.target)
            .field("method", &self.method.to_string())
            .field("arguments", &self.arguments)
            .finish()
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}::{}({})",
            self.method.declaring_type(),
            self.method.name(),
            self.arguments
        )
    }
}

/// Builder for [`Invocation`].
///
/// Target and method are required; [`build`](Self::build) fails if either is missing.
#[derive(Default)]
pub struct InvocationBuilder {
    target: Option<Target>,
    method: Option<Arc<MethodInfo>>,
    arguments: Vec<Value>,
    context: Option<Context>,
    excluded: HashSet<BehaviorKind>,
}

impl InvocationBuilder {
    /// Sets the proxy the call was made on.
    #[must_use]
    pub fn target(mut self, target: Target) -> Self {
        self.target = Some(target);
        self
    }

    /// Sets the called method identity.
    #[must_use]
    pub fn method(mut self, method: impl Into<Arc<MethodInfo>>) -> Self {
        self.method = Some(method.into());
        self
    }

    /// Sets the argument values in parameter order.
    #[must_use]
    pub fn arguments(mut self, arguments: Vec<Value>) -> Self {
        self.arguments = arguments;
        self
    }

    /// Uses an existing context instead of a fresh one.
    #[must_use]
    pub fn context(mut self, context: Context) -> Self {
        self.context = Some(context);
        self
    }

    /// Skips behaviors of `kind` for this call.
    #[must_use]
    pub fn exclude(mut self, kind: BehaviorKind) -> Self {
        self.excluded.insert(kind);
        self
    }

    /// Builds the invocation.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidArgument`] if no target or method was set, or if the
    /// number of arguments does not match the number of formal parameters.
    pub fn build(self) -> Result<Invocation> {
        let target = self
            .target
            .ok_or_else(|| invalid_argument!("invocation requires a target"))?;
        let method = self
            .method
            .ok_or_else(|| invalid_argument!("invocation requires a method"))?;

        if method.parameters().len() != self.arguments.len() {
            return Err(invalid_argument!(
                "{} expects {} arguments, got {}",
                method,
                method.parameters().len(),
                self.arguments.len()
            ));
        }

        let parameters = method.parameters().to_vec().into();
        Ok(Invocation {
            target,
            arguments: Arguments::new(parameters, self.arguments),
            method,
            context: self.context.unwrap_or_default(),
            excluded: self.excluded,
        })
    }
}
