//! The behavior contract and the closure-backed behavior.

use std::{
    any::TypeId,
    fmt,
    hash::{Hash, Hasher},
    sync::Arc,
};

use crate::{
    invocation::{Invocation, Return},
    pipeline::Next,
    proxy::AsAny,
    Result,
};

/// Identity of a behavior type.
///
/// Kinds are what an invocation's exclusion set holds: excluding a kind skips every behavior
/// of that type, whichever instance and position it is.
#[derive(Clone, Copy)]
pub struct BehaviorKind {
    id: TypeId,
    name: &'static str,
}

impl BehaviorKind {
    /// Returns the kind of behavior type `T`.
    #[must_use]
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    /// Returns the fully qualified type name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the type name without its module path.
    #[must_use]
    pub fn short_name(&self) -> &'static str {
        let end = self.name.find('<').unwrap_or(self.name.len());
        let start = self.name[..end].rfind("::").map_or(0, |pos| pos + 2);
        &self.name[start..]
    }
}

impl PartialEq for BehaviorKind {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for BehaviorKind {}

impl Hash for BehaviorKind {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for BehaviorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("BehaviorKind").field(&self.name).finish()
    }
}

impl fmt::Display for BehaviorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

/// An interceptor in a [`BehaviorPipeline`](crate::pipeline::BehaviorPipeline).
///
/// A behavior decides per invocation whether it takes part ([`applies_to`](Self::applies_to))
/// and, when it does, produces the [`Return`] ([`execute`](Self::execute)). Execution can:
///
/// - short-circuit by returning without touching `next`,
/// - pass through by returning `next.invoke(invocation)`,
/// - wrap the rest of the chain by inspecting what `next.invoke` produced.
///
/// Errors returned by a behavior propagate out of the pipeline unchanged.
///
/// # Implementing Custom Behaviors
///
/// ```rust,ignore
/// use stunts::prelude::*;
///
/// struct CountCalls(std::sync::atomic::AtomicUsize);
///
/// impl Behavior for CountCalls {
///     fn execute(&self, invocation: &Invocation, next: &mut Next<'_>) -> stunts::Result<Return> {
///         self.0.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
///         next.invoke(invocation)
///     }
/// }
/// ```
///
/// # Thread Safety
///
/// Behaviors must be `Send + Sync`: pipelines are shared between threads and may be mutated
/// while other threads dispatch through them.
pub trait Behavior: AsAny {
    /// Returns `true` if this behavior takes part in `invocation`.
    ///
    /// The default applies to every invocation.
    fn applies_to(&self, _invocation: &Invocation) -> bool {
        true
    }

    /// Produces the return for `invocation`, optionally deferring to `next`.
    ///
    /// # Errors
    ///
    /// Any error is propagated to the caller of the pipeline.
    fn execute(&self, invocation: &Invocation, next: &mut Next<'_>) -> Result<Return>;

    /// Returns the kind used for exclusion and uniqueness checks.
    fn kind(&self) -> BehaviorKind {
        BehaviorKind::of::<Self>()
    }
}

impl dyn Behavior {
    /// Attempts to view this behavior as a `T`.
    #[must_use]
    pub fn downcast_ref<T: Behavior>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    /// Attempts to convert a shared behavior into its concrete type.
    #[must_use]
    pub fn downcast_arc<T: Behavior>(self: Arc<Self>) -> Option<Arc<T>> {
        self.into_any().downcast::<T>().ok()
    }
}

/// Type alias for delegate behavior bodies.
pub type BehaviorFn = dyn Fn(&Invocation, &mut Next<'_>) -> Result<Return> + Send + Sync;

/// Type alias for delegate behavior applicability checks.
pub type AppliesFn = dyn Fn(&Invocation) -> bool + Send + Sync;

/// A behavior backed by closures.
///
/// This is how ad-hoc behaviors (canned returns, callbacks, configured failures) are added
/// without declaring a type.
///
/// # Examples
///
/// ```rust,ignore
/// use stunts::pipeline::DelegateBehavior;
///
/// let answer = DelegateBehavior::new(|invocation, _next| {
///     Ok(invocation.create_value_return(42.into()))
/// });
/// pipeline.push(std::sync::Arc::new(answer))?;
/// ```
pub struct DelegateBehavior {
    execute: Box<BehaviorFn>,
    applies: Option<Box<AppliesFn>>,
}

impl DelegateBehavior {
    /// Creates a behavior that applies to every invocation.
    pub fn new<F>(execute: F) -> Self
    where
        F: Fn(&Invocation, &mut Next<'_>) -> Result<Return> + Send + Sync + 'static,
    {
        Self {
            execute: Box::new(execute),
            applies: None,
        }
    }

    /// Restricts the behavior to invocations for which `applies` holds.
    #[must_use]
    pub fn when<F>(mut self, applies: F) -> Self
    where
        F: Fn(&Invocation) -> bool + Send + Sync + 'static,
    {
        self.applies = Some(Box::new(applies));
        self
    }
}

impl Behavior for DelegateBehavior {
    fn applies_to(&self, invocation: &Invocation) -> bool {
        self.applies.as_ref().map_or(true, |applies| applies(invocation))
    }

    fn execute(&self, invocation: &Invocation, next: &mut Next<'_>) -> Result<Return> {
        (self.execute)(invocation, next)
    }
}

impl fmt::Debug for DelegateBehavior {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DelegateBehavior")
            .field("conditional", &self.applies.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::behaviors::{DefaultValueBehavior, RecordingBehavior};

    #[test]
    fn test_kind_identity() {
        let delegate: Arc<dyn Behavior> = Arc::new(DelegateBehavior::new(|_, next| {
            Err(crate::Error::Error(format!("{}", next.position())))
        }));
        assert_eq!(delegate.kind(), BehaviorKind::of::<DelegateBehavior>());
        assert_ne!(delegate.kind(), BehaviorKind::of::<RecordingBehavior>());
        assert_eq!(delegate.kind().short_name(), "DelegateBehavior");
        assert_eq!(
            BehaviorKind::of::<DefaultValueBehavior>().to_string(),
            "DefaultValueBehavior"
        );
    }

    #[test]
    fn test_downcast() {
        let behavior: Arc<dyn Behavior> = Arc::new(DefaultValueBehavior::new());
        assert!(behavior.downcast_ref::<DefaultValueBehavior>().is_some());
        assert!(behavior.downcast_ref::<DelegateBehavior>().is_none());
        assert!(behavior.downcast_arc::<DefaultValueBehavior>().is_some());
    }
}
