//! Capabilities a generated type exposes to the interception core.
//!
//! A generated stunt implements [`Proxy`]: it owns a [`BehaviorPipeline`] and routes every
//! member body through it. A generated mock additionally implements [`Mocked`], exposing the
//! lazily created [`MockState`] used for introspection.
//!
//! Invocations refer back to the proxy they were made on through a [`Target`], a weak handle
//! compared by identity. Holding a weak handle keeps the invocation log of a mock from keeping
//! the mock itself alive.
//!
//! # Examples
//!
//! A hand-written equivalent of what a generator emits:
//!
//! ```rust,ignore
//! use std::sync::{Arc, Weak};
//! use stunts::prelude::*;
//!
//! struct CalculatorStunt {
//!     this: Weak<CalculatorStunt>,
//!     pipeline: Arc<BehaviorPipeline>,
//! }
//!
//! impl Proxy for CalculatorStunt {
//!     fn pipeline(&self) -> &BehaviorPipeline {
//!         &self.pipeline
//!     }
//! }
//!
//! impl CalculatorStunt {
//!     fn add(&self, x: i32, y: i32) -> stunts::Result<i32> {
//!         let invocation = Invocation::new(
//!             Target::from_weak(self.this.clone()),
//!             ADD.clone(),
//!             vec![x.into(), y.into()],
//!         )?;
//!         let ret = self.pipeline.invoke_or_raise(&invocation, |_| Err(stunts::Error::Error("not implemented".into())))?;
//!         Ok(ret.value().and_then(i32::from_value).unwrap_or_default())
//!     }
//! }
//! ```

use std::{
    any::Any,
    fmt,
    hash::{Hash, Hasher},
    sync::{Arc, Weak},
};

use crate::{
    mock::MockState,
    pipeline::BehaviorPipeline,
    value::{ObjectRef, Value},
    Error, Result,
};

/// Upcasting support for trait objects.
///
/// Implemented for every `Send + Sync + 'static` type; it lets `Arc<dyn Behavior>` and
/// `Arc<dyn Proxy>` be turned back into their concrete types.
pub trait AsAny: Any + Send + Sync {
    /// Returns `self` as `&dyn Any`.
    fn as_any(&self) -> &dyn Any;

    /// Converts a shared handle into `Arc<dyn Any>`.
    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;
}

impl<T: Any + Send + Sync> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}

/// The capability every generated type exposes to be dispatched through.
pub trait Proxy: AsAny {
    /// Returns the ordered, observable behavior pipeline of this instance.
    fn pipeline(&self) -> &BehaviorPipeline;

    /// Returns the mock capability, if this proxy is a mock.
    fn as_mocked(&self) -> Option<&dyn Mocked> {
        None
    }

    /// Returns the name used for diagnostics and object references to this proxy.
    fn type_name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

/// The capability a generated mock exposes on top of [`Proxy`].
pub trait Mocked: Proxy {
    /// Returns the mock state, creating it on first access.
    ///
    /// # Errors
    ///
    /// Returns an error if the state could not be attached to the pipeline, for example
    /// because a recording behavior was already added by hand.
    fn mock(&self) -> Result<&MockState>;
}

/// Weak, identity-compared handle to the proxy an invocation was made on.
#[derive(Clone)]
pub struct Target(Weak<dyn Proxy>);

impl Target {
    /// Creates a target from a shared proxy.
    pub fn new<P: Proxy>(proxy: &Arc<P>) -> Self {
        let proxy: Arc<dyn Proxy> = proxy.clone();
        Self(Arc::downgrade(&proxy))
    }

    /// Creates a target from a weak self-reference, as held by generated types.
    pub fn from_weak<P: Proxy>(proxy: Weak<P>) -> Self {
        let proxy: Weak<dyn Proxy> = proxy;
        Self(proxy)
    }

    /// Returns the proxy, if it is still alive.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TargetDropped`] if the proxy no longer exists.
    pub fn upgrade(&self) -> Result<Arc<dyn Proxy>> {
        self.0.upgrade().ok_or(Error::TargetDropped)
    }

    /// Returns the address of the proxy allocation.
    ///
    /// Equal to [`ObjectRef::identity`] of [`to_value`](Self::to_value).
    #[must_use]
    pub fn identity(&self) -> usize {
        Weak::as_ptr(&self.0) as *const () as usize
    }

    /// Returns `true` if both handles refer to the same proxy instance.
    #[must_use]
    pub fn ptr_eq(&self, other: &Target) -> bool {
        self.identity() == other.identity()
    }

    /// Returns an object reference to the proxy, suitable as an argument value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TargetDropped`] if the proxy no longer exists.
    pub fn to_value(&self) -> Result<Value> {
        let proxy = self.upgrade()?;
        let type_name = proxy.type_name().to_string();
        Ok(Value::Object(ObjectRef::from_any(type_name, proxy.into_any())))
    }
}

impl PartialEq for Target {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for Target {}

impl Hash for Target {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.identity().hash(state);
    }
}

impl fmt::Debug for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Target({:#x})", self.identity())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::CalculatorProxy;

    #[test]
    fn test_target_identity() {
        let a = CalculatorProxy::stunt();
        let b = CalculatorProxy::stunt();

        assert_eq!(Target::new(&a), Target::new(&a));
        assert_ne!(Target::new(&a), Target::new(&b));
        assert_eq!(Target::new(&a), a.target());
    }

    #[test]
    fn test_target_value_shares_identity() {
        let proxy = CalculatorProxy::stunt();
        let target = Target::new(&proxy);
        let value = target.to_value().unwrap();
        assert_eq!(value.as_object().unwrap().identity(), target.identity());
    }

    #[test]
    fn test_dropped_target() {
        let proxy = CalculatorProxy::stunt();
        let target = Target::new(&proxy);
        drop(proxy);
        assert!(matches!(target.upgrade(), Err(Error::TargetDropped)));
    }
}
