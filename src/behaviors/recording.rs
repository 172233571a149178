//! Invocation recording and setup capture for mocks.

use crate::{
    behaviors::DefaultValueBehavior,
    invocation::{Invocation, Return},
    matcher::capture,
    pipeline::{Behavior, Next},
    Error, Result,
};

/// Logs every call a mock receives and freezes it for the capture protocol.
///
/// The behavior is installed at the front of a mock's pipeline by
/// [`MockState::new`](crate::mock::MockState::new) and is unique there. For each invocation it:
///
/// 1. resolves the target's [`MockState`](crate::mock::MockState), failing with
///    [`Error::NotMocked`] for plain proxies,
/// 2. freezes the invocation into the current setup of the call flow,
/// 3. inside [`capture::setup`], short-circuits with a default return without logging,
/// 4. otherwise appends the invocation to the log and continues with `next`.
#[derive(Debug, Default)]
pub struct RecordingBehavior;

impl RecordingBehavior {
    /// Creates the behavior.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Behavior for RecordingBehavior {
    fn execute(&self, invocation: &Invocation, next: &mut Next<'_>) -> Result<Return> {
        let proxy = invocation.target().upgrade()?;
        let mocked = proxy.as_mocked().ok_or_else(|| {
            Error::NotMocked(format!(
                "{} requires a mock, but {} was called on {}",
                self.kind(),
                invocation.method(),
                proxy.type_name()
            ))
        })?;
        let state = mocked.mock()?;

        capture::freeze(invocation)?;
        if capture::is_configuring() {
            return DefaultValueBehavior::default_return(invocation);
        }

        state.record(invocation.clone());
        next.invoke(invocation)
    }
}
