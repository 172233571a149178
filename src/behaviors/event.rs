//! Event subscription bookkeeping with optimistic updates.

use std::sync::{Arc, Mutex};

use tracing::{trace, warn};

use crate::{
    invocation::{Invocation, MemberKind, Return},
    mock::{MockState, StateBag},
    pipeline::{Behavior, Next},
    value::{Handler, Value},
    Error, Result,
};

/// Per-event lock for the contended update path.
#[derive(Default)]
struct EventLock(Mutex<()>);

/// Tracks `add_` / `remove_` accessor calls so a mock can raise its events.
///
/// The combined [`Handler`] of each event lives in the mock's [`StateBag`], keyed by the event
/// name. Updates first try one unlocked compare-and-swap; if another thread changed the
/// handler in between, they retry under a per-event lock for at most `retries` attempts.
/// Running out of attempts means the single-writer assumption of the lock is broken and
/// panics.
///
/// # Examples
///
/// ```rust,ignore
/// notifier.add_changed(h1)?;
/// notifier.add_changed(h2)?;
/// EventBehavior::raise(notifier.mock()?, "Changed", &[Value::from("payload")])?;
/// ```
#[derive(Debug)]
pub struct EventBehavior {
    retries: usize,
}

impl Default for EventBehavior {
    fn default() -> Self {
        Self::with_retries(16)
    }
}

impl EventBehavior {
    /// Creates the behavior with the default retry budget.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates the behavior with `retries` locked attempts.
    #[must_use]
    pub fn with_retries(retries: usize) -> Self {
        Self { retries }
    }

    /// Returns the combined handler currently subscribed to `event`.
    #[must_use]
    pub fn handler(mock: &MockState, event: &str) -> Option<Handler> {
        mock.state()
            .get::<Handler>(Some(event))
            .map(|handler| handler.as_ref().clone())
    }

    /// Invokes the handlers subscribed to `event` in subscription order.
    ///
    /// Raising an event nobody subscribed to does nothing.
    ///
    /// # Errors
    ///
    /// Returns the first error produced by a handler.
    pub fn raise(mock: &MockState, event: &str, args: &[Value]) -> Result<()> {
        match Self::handler(mock, event) {
            Some(handler) => handler.invoke(args),
            None => Ok(()),
        }
    }

    fn update<F>(&self, bag: &StateBag, event: &str, change: F)
    where
        F: Fn(Option<&Handler>) -> Option<Handler>,
    {
        if Self::try_update(bag, event, &change) {
            return;
        }

        warn!(event = event, "contended event update, retrying under lock");
        let lock = bag.get_or_add::<EventLock, _>(Some(event), EventLock::default);
        let _guard = lock!(lock.0);
        for _ in 0..self.retries {
            if Self::try_update(bag, event, &change) {
                return;
            }
        }

        panic!(
            "event '{event}' could not be updated after {} locked attempts",
            self.retries
        );
    }

    fn try_update<F>(bag: &StateBag, event: &str, change: &F) -> bool
    where
        F: Fn(Option<&Handler>) -> Option<Handler>,
    {
        let current = bag.get::<Handler>(Some(event));
        let updated = change(current.as_deref());

        match (current, updated) {
            (None, None) => true,
            (None, Some(handler)) => bag.try_add(Some(event), Arc::new(handler)),
            (Some(current), Some(handler)) => {
                bag.try_update(Some(event), Arc::new(handler), &current)
            }
            (Some(current), None) => bag.try_remove_if(Some(event), &current),
        }
    }
}

impl Behavior for EventBehavior {
    fn applies_to(&self, invocation: &Invocation) -> bool {
        invocation.method().kind().is_event_accessor() && invocation.arguments().len() == 1
    }

    fn execute(&self, invocation: &Invocation, _next: &mut Next<'_>) -> Result<Return> {
        let proxy = invocation.target().upgrade()?;
        let mocked = proxy.as_mocked().ok_or_else(|| {
            Error::NotMocked(format!(
                "{} requires a mock to track {}",
                self.kind(),
                invocation.method()
            ))
        })?;
        let state = mocked.mock()?;

        let argument = invocation.arguments().get(0)?;
        let event = invocation.method().member_name();

        if let Some(handler) = argument.as_handler() {
            match invocation.method().kind() {
                MemberKind::EventAdd => self.update(state.state(), event, |current| {
                    Some(match current {
                        Some(current) => current.combine(handler),
                        None => handler.clone(),
                    })
                }),
                _ => self.update(state.state(), event, |current| {
                    current.and_then(|current| current.remove(handler))
                }),
            }
            trace!(
                event = event,
                accessor = %invocation.method().kind(),
                "updated event subscription"
            );
        }

        Ok(invocation.create_value_return(Value::Void))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::test::NotifierProxy;

    fn recording(log: &Arc<Mutex<Vec<&'static str>>>, tag: &'static str) -> Handler {
        let log = log.clone();
        Handler::new("EventHandler", move |_| {
            log.lock().unwrap().push(tag);
            Ok(())
        })
    }

    #[test]
    fn test_subscribe_raise_unsubscribe() {
        let notifier = NotifierProxy::mock();
        let log = Arc::new(Mutex::new(Vec::new()));
        let h1 = recording(&log, "h1");
        let h2 = recording(&log, "h2");

        notifier.add_changed(h1.clone()).unwrap();
        notifier.add_changed(h2).unwrap();
        EventBehavior::raise(notifier.state(), "Changed", &[]).unwrap();
        assert_eq!(*log.lock().unwrap(), vec!["h1", "h2"]);

        log.lock().unwrap().clear();
        notifier.remove_changed(h1).unwrap();
        EventBehavior::raise(notifier.state(), "Changed", &[]).unwrap();
        assert_eq!(*log.lock().unwrap(), vec!["h2"]);
    }

    #[test]
    fn test_removing_last_handler_clears_event() {
        let notifier = NotifierProxy::mock();
        let log = Arc::new(Mutex::new(Vec::new()));
        let h1 = recording(&log, "h1");

        notifier.add_changed(h1.clone()).unwrap();
        notifier.remove_changed(h1).unwrap();
        assert!(EventBehavior::handler(notifier.state(), "Changed").is_none());
        EventBehavior::raise(notifier.state(), "Changed", &[]).unwrap();
        assert!(log.lock().unwrap().is_empty());
    }

    #[test]
    fn test_events_are_independent() {
        let notifier = NotifierProxy::mock();
        let log = Arc::new(Mutex::new(Vec::new()));

        notifier.add_changed(recording(&log, "changed")).unwrap();
        notifier.add_closed(recording(&log, "closed")).unwrap();

        EventBehavior::raise(notifier.state(), "Closed", &[]).unwrap();
        assert_eq!(*log.lock().unwrap(), vec!["closed"]);
    }

    #[test]
    fn test_removing_unknown_handler_is_harmless() {
        let notifier = NotifierProxy::mock();
        let log = Arc::new(Mutex::new(Vec::new()));
        notifier.remove_changed(recording(&log, "h1")).unwrap();
        assert!(EventBehavior::handler(notifier.state(), "Changed").is_none());
    }
}
