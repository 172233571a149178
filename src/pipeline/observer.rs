//! Change notifications for behavior pipelines.

use std::sync::Arc;

use crate::pipeline::Behavior;

/// A mutation applied to a [`BehaviorPipeline`](crate::pipeline::BehaviorPipeline).
pub enum PipelineChange<'a> {
    /// A behavior was inserted at `index`.
    Added {
        /// Position of the new behavior.
        index: usize,
        /// The new behavior.
        behavior: &'a Arc<dyn Behavior>,
    },
    /// The behavior at `index` was removed.
    Removed {
        /// Former position of the behavior.
        index: usize,
        /// The removed behavior.
        behavior: &'a Arc<dyn Behavior>,
    },
    /// The behavior at `index` was replaced.
    Replaced {
        /// Position of the replaced behavior.
        index: usize,
        /// The behavior that was removed.
        old: &'a Arc<dyn Behavior>,
        /// The behavior that took its place.
        new: &'a Arc<dyn Behavior>,
    },
    /// All behaviors of kinds that are not required were removed.
    Reset {
        /// The behaviors that were removed.
        removed: &'a [Arc<dyn Behavior>],
    },
}

/// Receives [`PipelineChange`]s.
///
/// Notifications are delivered synchronously while the pipeline's write lock is held, so a
/// derived index updated here is never observed out of sync with the list. Observers must not
/// call back into the pipeline that notifies them.
pub trait PipelineObserver: Send + Sync {
    /// Called after each mutation.
    fn on_change(&self, change: &PipelineChange<'_>);
}
