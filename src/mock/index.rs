//! Setup to setup-behavior index kept in sync with a pipeline.

use std::sync::Arc;

use dashmap::DashMap;

use crate::{
    matcher::Setup,
    pipeline::{Behavior, PipelineChange, PipelineObserver, SetupBehavior},
};

fn as_setup_behavior(behavior: &Arc<dyn Behavior>) -> Option<Arc<SetupBehavior>> {
    behavior.downcast_ref::<SetupBehavior>()?;
    Arc::clone(behavior).downcast_arc::<SetupBehavior>()
}

/// Maps each [`Setup`] to the [`SetupBehavior`] wired for it in a pipeline.
///
/// The index subscribes to the pipeline and applies every add, remove, replace and reset as
/// it happens, so a removed setup behavior can never be found again.
#[derive(Default)]
pub struct SetupIndex {
    entries: DashMap<Setup, Arc<SetupBehavior>>,
}

impl SetupIndex {
    /// Returns the behavior registered for `setup`.
    #[must_use]
    pub fn get(&self, setup: &Setup) -> Option<Arc<SetupBehavior>> {
        self.entries.get(setup).map(|entry| entry.value().clone())
    }

    /// Returns all indexed setups.
    #[must_use]
    pub fn setups(&self) -> Vec<Setup> {
        self.entries.iter().map(|entry| entry.key().clone()).collect()
    }

    /// Returns the number of indexed setups.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no setup is indexed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn add(&self, behavior: &Arc<dyn Behavior>) {
        if let Some(setup_behavior) = as_setup_behavior(behavior) {
            self.entries
                .insert(setup_behavior.setup().clone(), setup_behavior);
        }
    }

    fn remove(&self, behavior: &Arc<dyn Behavior>) {
        if let Some(setup_behavior) = as_setup_behavior(behavior) {
            self.entries.remove_if(setup_behavior.setup(), |_, existing| {
                Arc::ptr_eq(existing, &setup_behavior)
            });
        }
    }
}

impl PipelineObserver for SetupIndex {
    fn on_change(&self, change: &PipelineChange<'_>) {
        match change {
            PipelineChange::Added { behavior, .. } => self.add(behavior),
            PipelineChange::Removed { behavior, .. } => self.remove(behavior),
            PipelineChange::Replaced { old, new, .. } => {
                self.remove(old);
                self.add(new);
            }
            PipelineChange::Reset { .. } => self.entries.clear(),
        }
    }
}
