//! The continuation cursor handed to executing behaviors.

use std::sync::Arc;

use tracing::trace;

use crate::{
    invocation::{Invocation, Return},
    pipeline::Behavior,
    Result,
};

/// Type alias for the fallback a dispatch ends in once no behavior is left.
pub type Terminal<'a> = dyn FnMut(&Invocation) -> Result<Return> + 'a;

/// Cursor over a snapshot of behaviors.
///
/// Each call to [`invoke`](Self::invoke) scans forward from the current position for the next
/// behavior that is not excluded by the invocation and applies to it, moves past it and
/// executes it with this same cursor. When the snapshot is exhausted the terminal runs.
///
/// Because the position is shared, a behavior that calls `invoke` a second time resumes after
/// whatever the chain consumed during the first call, never at the start.
pub struct Next<'a> {
    behaviors: &'a [Arc<dyn Behavior>],
    position: usize,
    terminal: &'a mut Terminal<'a>,
}

impl<'a> Next<'a> {
    /// Creates a cursor positioned before the first behavior.
    pub fn new(behaviors: &'a [Arc<dyn Behavior>], terminal: &'a mut Terminal<'a>) -> Self {
        Self {
            behaviors,
            position: 0,
            terminal,
        }
    }

    /// Returns the index the next scan starts at.
    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }

    /// Returns `true` if no behavior after the current position would run for `invocation`.
    #[must_use]
    pub fn is_exhausted(&self, invocation: &Invocation) -> bool {
        self.find(invocation).is_none()
    }

    /// Runs the rest of the chain for `invocation`.
    ///
    /// # Errors
    ///
    /// Propagates errors of the executed behavior or of the terminal.
    pub fn invoke(&mut self, invocation: &Invocation) -> Result<Return> {
        let behaviors = self.behaviors;
        match self.find(invocation) {
            Some(index) => {
                let behavior = &behaviors[index];
                self.position = index + 1;
                trace!(
                    index = index,
                    behavior = %behavior.kind(),
                    method = %invocation.method().name(),
                    "executing behavior"
                );
                behavior.execute(invocation, self)
            }
            None => {
                self.position = behaviors.len();
                trace!(
                    method = %invocation.method().name(),
                    "no behavior left, running terminal"
                );
                (self.terminal)(invocation)
            }
        }
    }

    fn find(&self, invocation: &Invocation) -> Option<usize> {
        self.behaviors
            .iter()
            .enumerate()
            .skip(self.position)
            .find(|(_, behavior)| {
                !invocation.is_excluded(&behavior.kind()) && behavior.applies_to(invocation)
            })
            .map(|(index, _)| index)
    }
}
