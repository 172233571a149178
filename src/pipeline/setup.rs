//! Behaviors scoped to the invocations matching one setup.

use std::{fmt, sync::Arc};

use crate::{
    invocation::{Invocation, Return},
    matcher::Setup,
    pipeline::{Behavior, BehaviorPipeline, DelegateBehavior, Next},
    value::Value,
    Exception, Result,
};

/// A behavior owning a private pipeline that only runs for invocations matching a [`Setup`].
///
/// The inner pipeline composes exactly like the outer one. Its terminal resumes the outer
/// pipeline right after this behavior, so the last inner behavior calling `next` continues
/// with whatever follows in the outer list. With no inner behaviors the invocation passes
/// straight through.
///
/// Setup behaviors are obtained from
/// [`MockState::get_or_create_setup`](crate::mock::MockState::get_or_create_setup), which
/// hands out the same instance for equal setups.
pub struct SetupBehavior {
    setup: Setup,
    behaviors: BehaviorPipeline,
}

impl SetupBehavior {
    /// Creates a setup behavior with an empty inner pipeline.
    #[must_use]
    pub fn new(setup: Setup) -> Self {
        Self {
            setup,
            behaviors: BehaviorPipeline::new(),
        }
    }

    /// Returns the setup this behavior is scoped to.
    #[must_use]
    pub fn setup(&self) -> &Setup {
        &self.setup
    }

    /// Returns the inner pipeline.
    #[must_use]
    pub fn behaviors(&self) -> &BehaviorPipeline {
        &self.behaviors
    }

    /// Appends an inner behavior.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::DuplicateBehavior`] if the behavior's kind is unique in the
    /// inner pipeline and already present.
    pub fn push(&self, behavior: Arc<dyn Behavior>) -> Result<()> {
        self.behaviors.push(behavior)
    }

    /// Appends an inner behavior returning `value` for matching calls.
    ///
    /// # Errors
    ///
    /// See [`push`](Self::push).
    pub fn returns(&self, value: Value) -> Result<()> {
        self.push(Arc::new(DelegateBehavior::new(move |invocation, _| {
            Ok(invocation.create_value_return(value.clone()))
        })))
    }

    /// Appends an inner behavior producing `exception` for matching calls.
    ///
    /// # Errors
    ///
    /// See [`push`](Self::push).
    pub fn throws(&self, exception: Exception) -> Result<()> {
        self.push(Arc::new(DelegateBehavior::new(move |invocation, _| {
            Ok(invocation.create_exception_return(exception.clone()))
        })))
    }
}

impl Behavior for SetupBehavior {
    fn applies_to(&self, invocation: &Invocation) -> bool {
        self.setup.applies_to(invocation)
    }

    fn execute(&self, invocation: &Invocation, next: &mut Next<'_>) -> Result<Return> {
        if self.behaviors.is_empty() {
            return next.invoke(invocation);
        }

        self.behaviors
            .invoke(invocation, |invocation| next.invoke(invocation))
    }
}

impl fmt::Debug for SetupBehavior {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SetupBehavior")
            .field("setup", &self.setup)
            .field("behaviors", &self.behaviors.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::{
        matcher::Matcher,
        test::{calculator, CalculatorProxy},
        value::TypeDesc,
    };

    fn add(proxy: &Arc<CalculatorProxy>, x: i32, y: i32) -> Invocation {
        Invocation::new(proxy.target(), calculator::add(), vec![x.into(), y.into()]).unwrap()
    }

    fn second_is_three(proxy: &Arc<CalculatorProxy>) -> Setup {
        Setup::new(
            add(proxy, 0, 3),
            vec![Matcher::any(TypeDesc::I32), Matcher::value(TypeDesc::I32, 3.into())],
        )
        .unwrap()
    }

    fn terminal(inv: &Invocation) -> Result<Return> {
        Ok(inv.create_value_return(Value::from("terminal")))
    }

    #[test]
    fn test_empty_setup_behavior_passes_through() {
        let proxy = CalculatorProxy::stunt();
        let pipeline = BehaviorPipeline::new();
        pipeline
            .push(Arc::new(SetupBehavior::new(second_is_three(&proxy))))
            .unwrap();

        let ret = pipeline.invoke(&add(&proxy, 1, 3), terminal).unwrap();
        assert_eq!(ret.value(), Some(&Value::from("terminal")));
    }

    #[test]
    fn test_inner_behaviors_only_run_for_matches() {
        let proxy = CalculatorProxy::stunt();
        let setup = Arc::new(SetupBehavior::new(second_is_three(&proxy)));
        setup.returns(Value::I32(42)).unwrap();

        let pipeline = BehaviorPipeline::new();
        pipeline.push(setup).unwrap();

        let hit = pipeline.invoke(&add(&proxy, 9, 3), terminal).unwrap();
        assert_eq!(hit.value(), Some(&Value::I32(42)));

        let miss = pipeline.invoke(&add(&proxy, 9, 4), terminal).unwrap();
        assert_eq!(miss.value(), Some(&Value::from("terminal")));
    }

    #[test]
    fn test_inner_chain_resumes_outer_pipeline() {
        let proxy = CalculatorProxy::stunt();
        let log = Arc::new(Mutex::new(Vec::new()));

        let setup = Arc::new(SetupBehavior::new(second_is_three(&proxy)));
        for tag in ["inner-1", "inner-2"] {
            let log = log.clone();
            setup
                .push(Arc::new(DelegateBehavior::new(move |inv, next| {
                    log.lock().unwrap().push(tag);
                    next.invoke(inv)
                })))
                .unwrap();
        }

        let pipeline = BehaviorPipeline::new();
        pipeline.push(setup).unwrap();
        let outer_log = log.clone();
        pipeline
            .push(Arc::new(DelegateBehavior::new(move |inv, _| {
                outer_log.lock().unwrap().push("outer");
                Ok(inv.create_value_return(Value::I32(5)))
            })))
            .unwrap();

        let ret = pipeline.invoke(&add(&proxy, 2, 3), terminal).unwrap();
        assert_eq!(ret.value(), Some(&Value::I32(5)));
        assert_eq!(*log.lock().unwrap(), vec!["inner-1", "inner-2", "outer"]);
    }

    #[test]
    fn test_context_flows_through_both_levels() {
        let proxy = CalculatorProxy::stunt();
        let setup = Arc::new(SetupBehavior::new(second_is_three(&proxy)));
        setup
            .push(Arc::new(DelegateBehavior::new(|inv, next| {
                inv.context().insert("inner", Value::Bool(true));
                next.invoke(inv)
            })))
            .unwrap();

        let pipeline = BehaviorPipeline::new();
        pipeline.push(setup).unwrap();
        pipeline
            .push(Arc::new(DelegateBehavior::new(|inv, _| {
                let seen = inv.context().get("inner").unwrap_or(Value::Bool(false));
                Ok(inv.create_value_return(seen))
            })))
            .unwrap();

        let ret = pipeline.invoke(&add(&proxy, 2, 3), terminal).unwrap();
        assert_eq!(ret.value(), Some(&Value::Bool(true)));
        assert_eq!(ret.context().get("inner"), Some(Value::Bool(true)));
    }
}
