//! Integration tests for dispatching calls through behavior pipelines.

mod common;

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex,
};

use common::{members, Calculator};
use stunts::{prelude::*, Result};

/// A behavior counting how often it is consulted and executed.
#[derive(Default)]
struct Probe {
    consulted: AtomicUsize,
    executed: AtomicUsize,
}

impl Behavior for Probe {
    fn applies_to(&self, _invocation: &Invocation) -> bool {
        self.consulted.fetch_add(1, Ordering::SeqCst);
        true
    }

    fn execute(&self, invocation: &Invocation, next: &mut Next<'_>) -> Result<Return> {
        self.executed.fetch_add(1, Ordering::SeqCst);
        next.invoke(invocation)
    }
}

fn tagged(log: &Arc<Mutex<Vec<usize>>>, tag: usize) -> Arc<dyn Behavior> {
    let log = log.clone();
    Arc::new(DelegateBehavior::new(move |invocation, next| {
        log.lock().unwrap().push(tag);
        next.invoke(invocation)
    }))
}

/// A recording behavior followed by a fixed return answers the call and logs it once.
#[test]
fn test_record_then_fixed_value() -> Result<()> {
    let calculator = Calculator::mock_with(MockConfig::minimal());
    calculator
        .pipeline()
        .push(Arc::new(DelegateBehavior::new(|invocation, _next| {
            Ok(invocation.create_value_return(Value::I32(42)))
        })))?;

    assert_eq!(calculator.answer()?, 42);
    assert_eq!(calculator.state().invocation_count(), 1);
    assert_eq!(
        calculator.state().invocations()[0].method().name(),
        "Answer"
    );
    Ok(())
}

#[test]
fn test_behaviors_run_in_list_order() -> Result<()> {
    let calculator = Calculator::stunt();
    let log = Arc::new(Mutex::new(Vec::new()));
    for tag in 1..=5 {
        calculator.pipeline().push(tagged(&log, tag))?;
    }

    let invocation = Invocation::new(calculator.target(), members::answer(), vec![])?;
    let ret = calculator
        .pipeline()
        .invoke(&invocation, |invocation| {
            Ok(invocation.create_value_return(Value::I32(7)))
        })?;

    assert_eq!(*log.lock().unwrap(), vec![1, 2, 3, 4, 5]);
    assert_eq!(ret.value(), Some(&Value::I32(7)));
    Ok(())
}

#[test]
fn test_short_circuit_skips_the_rest() -> Result<()> {
    let calculator = Calculator::stunt();
    let log = Arc::new(Mutex::new(Vec::new()));
    let later = Arc::new(Probe::default());

    calculator.pipeline().push(tagged(&log, 1))?;
    calculator
        .pipeline()
        .push(Arc::new(DelegateBehavior::new(|invocation, _next| {
            Ok(invocation.create_value_return(Value::I32(3)))
        })))?;
    calculator.pipeline().push(later.clone())?;

    assert_eq!(calculator.add(1, 1)?, 3);
    assert_eq!(*log.lock().unwrap(), vec![1]);
    assert_eq!(later.executed.load(Ordering::SeqCst), 0);
    Ok(())
}

#[test]
fn test_unhandled_call_reaches_the_terminal() {
    let calculator = Calculator::stunt();
    assert!(matches!(calculator.add(1, 2), Err(Error::Error(_))));
}

#[test]
fn test_context_flows_to_later_behaviors_and_the_return() -> Result<()> {
    let calculator = Calculator::stunt();
    let seen = Arc::new(Mutex::new(None));

    calculator
        .pipeline()
        .push(Arc::new(DelegateBehavior::new(|invocation, next| {
            invocation.context().insert("correlation", Value::from("abc"));
            next.invoke(invocation)
        })))?;
    calculator.pipeline().push(Arc::new(Probe::default()))?;
    let observed = seen.clone();
    calculator
        .pipeline()
        .push(Arc::new(DelegateBehavior::new(move |invocation, _next| {
            *observed.lock().unwrap() = invocation.context().get("correlation");
            Ok(invocation.create_value_return(Value::I32(0)))
        })))?;

    let invocation = Invocation::new(calculator.target(), members::answer(), vec![])?;
    let ret = calculator.pipeline().invoke(&invocation, |_| {
        Err(Error::Error("unreachable".into()))
    })?;

    assert_eq!(*seen.lock().unwrap(), Some(Value::from("abc")));
    assert_eq!(ret.context().get("correlation"), Some(Value::from("abc")));
    assert!(ret.context().ptr_eq(invocation.context()));
    Ok(())
}

#[test]
fn test_excluded_kinds_are_never_consulted() -> Result<()> {
    let calculator = Calculator::stunt();
    let first = Arc::new(Probe::default());
    let second = Arc::new(Probe::default());
    calculator.pipeline().push(first.clone())?;
    calculator
        .pipeline()
        .push(Arc::new(DelegateBehavior::new(|invocation, next| next.invoke(invocation))))?;
    calculator.pipeline().push(second.clone())?;

    let invocation = Invocation::builder()
        .target(calculator.target())
        .method(members::answer())
        .exclude(BehaviorKind::of::<Probe>())
        .build()?;
    calculator.pipeline().invoke(&invocation, |invocation| {
        Ok(invocation.create_value_return(Value::I32(0)))
    })?;

    for probe in [&first, &second] {
        assert_eq!(probe.consulted.load(Ordering::SeqCst), 0);
        assert_eq!(probe.executed.load(Ordering::SeqCst), 0);
    }

    let included = Invocation::new(calculator.target(), members::answer(), vec![])?;
    calculator.pipeline().invoke(&included, |invocation| {
        Ok(invocation.create_value_return(Value::I32(0)))
    })?;
    assert_eq!(first.executed.load(Ordering::SeqCst), 1);
    assert_eq!(second.executed.load(Ordering::SeqCst), 1);
    Ok(())
}

#[test]
fn test_behavior_can_wrap_the_rest_of_the_chain() -> Result<()> {
    let calculator = Calculator::stunt();
    let counter = Arc::new(AtomicUsize::new(0));

    calculator
        .pipeline()
        .push(Arc::new(DelegateBehavior::new(|invocation, next| {
            let ret = next.invoke(invocation)?;
            if ret.has_exception() {
                return Ok(invocation.create_value_return(Value::I32(5)));
            }
            Ok(ret)
        })))?;
    let attempts = counter.clone();
    calculator
        .pipeline()
        .push(Arc::new(DelegateBehavior::new(move |invocation, _next| {
            attempts.fetch_add(1, Ordering::SeqCst);
            Ok(invocation.create_exception_return(Exception::msg("transient")))
        })))?;

    assert_eq!(calculator.answer()?, 5);
    assert_eq!(counter.load(Ordering::SeqCst), 1);
    Ok(())
}

#[test]
fn test_exception_return_is_raised_at_the_proxy() -> Result<()> {
    let calculator = Calculator::stunt();
    calculator
        .pipeline()
        .push(Arc::new(DelegateBehavior::new(|invocation, _next| {
            Ok(invocation.create_exception_return(Exception::msg("division by zero")))
        })))?;

    match calculator.add(1, 0) {
        Err(Error::Raised(exception)) => assert_eq!(exception.to_string(), "division by zero"),
        other => panic!("expected a raised exception, got {other:?}"),
    }
    Ok(())
}

#[test]
fn test_pipeline_changes_do_not_affect_running_dispatch() -> Result<()> {
    let calculator = Calculator::stunt();
    let weak = Arc::downgrade(&calculator);
    let later = Arc::new(Probe::default());
    let added = later.clone();

    calculator
        .pipeline()
        .push(Arc::new(DelegateBehavior::new(move |invocation, next| {
            if let Some(calculator) = weak.upgrade() {
                calculator.pipeline().push(added.clone())?;
            }
            next.invoke(invocation)
        })))?;

    let invocation = Invocation::new(calculator.target(), members::answer(), vec![])?;
    calculator.pipeline().invoke(&invocation, |invocation| {
        Ok(invocation.create_value_return(Value::I32(0)))
    })?;
    assert_eq!(later.executed.load(Ordering::SeqCst), 0);
    assert_eq!(calculator.pipeline().len(), 2);
    Ok(())
}
