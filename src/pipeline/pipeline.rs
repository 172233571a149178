//! The ordered, observable behavior list and its dispatch entry points.

use std::{
    collections::HashSet,
    fmt,
    sync::{Arc, RwLock},
};

use tracing::trace;

use crate::{
    invocation::{Invocation, Return},
    pipeline::{Behavior, BehaviorKind, Next, PipelineChange, PipelineObserver},
    Error, Result,
};

#[derive(Default)]
struct ListState {
    behaviors: Arc<Vec<Arc<dyn Behavior>>>,
    unique: HashSet<BehaviorKind>,
    required: HashSet<BehaviorKind>,
    observers: Vec<Arc<dyn PipelineObserver>>,
}

impl ListState {
    fn notify(&self, change: &PipelineChange<'_>) {
        for observer in &self.observers {
            observer.on_change(change);
        }
    }

    fn check_unique(&self, kind: BehaviorKind, skip: Option<usize>) -> Result<()> {
        if !self.unique.contains(&kind) {
            return Ok(());
        }

        let duplicate = self
            .behaviors
            .iter()
            .enumerate()
            .any(|(index, existing)| Some(index) != skip && existing.kind() == kind);

        if duplicate {
            Err(Error::DuplicateBehavior(kind.name()))
        } else {
            Ok(())
        }
    }

    fn check_removable(&self, behavior: &Arc<dyn Behavior>) -> Result<()> {
        let kind = behavior.kind();
        if self.required.contains(&kind) {
            Err(Error::RequiredBehavior(kind.name()))
        } else {
            Ok(())
        }
    }
}

/// Ordered list of behaviors every member of a proxy dispatches through.
///
/// The list is copy-on-write: [`invoke`](Self::invoke) takes a snapshot and walks it without
/// holding any lock, so behaviors may add or remove entries (including themselves) while a
/// call is in flight. The change only affects calls that start afterwards.
///
/// # Dispatch
///
/// 1. Snapshot the list.
/// 2. Find the first behavior whose kind is not excluded by the invocation and that applies.
/// 3. Execute it with a [`Next`] cursor positioned after it, or run the terminal if there is
///    none.
///
/// # Examples
///
/// ```rust,ignore
/// use std::sync::Arc;
/// use stunts::prelude::*;
///
/// let pipeline = BehaviorPipeline::new();
/// pipeline.push(Arc::new(DelegateBehavior::new(|inv, _| Ok(inv.create_value_return(42.into())))))?;
///
/// let ret = pipeline.invoke(&invocation, |inv| Ok(inv.create_value_return(Value::Void)))?;
/// assert_eq!(ret.value(), Some(&Value::I32(42)));
/// ```
#[derive(Default)]
pub struct BehaviorPipeline {
    state: RwLock<ListState>,
}

impl BehaviorPipeline {
    /// Creates an empty pipeline.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of behaviors.
    #[must_use]
    pub fn len(&self) -> usize {
        read_lock!(self.state).behaviors.len()
    }

    /// Returns `true` if the pipeline holds no behaviors.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        read_lock!(self.state).behaviors.is_empty()
    }

    /// Returns the behavior at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<Arc<dyn Behavior>> {
        read_lock!(self.state).behaviors.get(index).cloned()
    }

    /// Returns the current behaviors. Later mutations do not affect the returned snapshot.
    #[must_use]
    pub fn snapshot(&self) -> Arc<Vec<Arc<dyn Behavior>>> {
        read_lock!(self.state).behaviors.clone()
    }

    /// Returns the position of `behavior`, compared by identity.
    #[must_use]
    pub fn position_of(&self, behavior: &Arc<dyn Behavior>) -> Option<usize> {
        read_lock!(self.state)
            .behaviors
            .iter()
            .position(|existing| Arc::ptr_eq(existing, behavior))
    }

    /// Returns the position of the first behavior of `kind`.
    #[must_use]
    pub fn position_of_kind(&self, kind: BehaviorKind) -> Option<usize> {
        read_lock!(self.state)
            .behaviors
            .iter()
            .position(|existing| existing.kind() == kind)
    }

    /// Returns `true` if `behavior` is part of the pipeline.
    #[must_use]
    pub fn contains(&self, behavior: &Arc<dyn Behavior>) -> bool {
        self.position_of(behavior).is_some()
    }

    /// Appends `behavior`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateBehavior`] if its kind is unique and already present.
    pub fn push(&self, behavior: Arc<dyn Behavior>) -> Result<()> {
        let mut state = write_lock!(self.state);
        let index = state.behaviors.len();
        Self::insert_locked(&mut state, index, behavior)
    }

    /// Inserts `behavior` at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfBounds`] if `index` is past the end and
    /// [`Error::DuplicateBehavior`] if its kind is unique and already present.
    pub fn insert(&self, index: usize, behavior: Arc<dyn Behavior>) -> Result<()> {
        let mut state = write_lock!(self.state);
        Self::insert_locked(&mut state, index, behavior)
    }

    /// Inserts `behavior` at `index` and marks its kind as unique.
    ///
    /// From then on the pipeline holds at most one behavior of that kind.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateBehavior`] if a behavior of the same kind is already present
    /// and [`Error::OutOfBounds`] if `index` is past the end.
    pub fn insert_unique(&self, index: usize, behavior: Arc<dyn Behavior>) -> Result<()> {
        self.insert_marked(index, behavior, false)
    }

    /// Inserts `behavior` at `index` and marks its kind as unique and required.
    ///
    /// From then on the pipeline holds exactly one behavior of that kind: it can be replaced by
    /// another instance of the same kind, but not removed.
    ///
    /// # Errors
    ///
    /// See [`insert_unique`](Self::insert_unique).
    pub fn insert_required(&self, index: usize, behavior: Arc<dyn Behavior>) -> Result<()> {
        self.insert_marked(index, behavior, true)
    }

    /// Removes `behavior`, compared by identity. Returns `false` if it was not present.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RequiredBehavior`] if the behavior's kind is required.
    pub fn remove(&self, behavior: &Arc<dyn Behavior>) -> Result<bool> {
        let mut state = write_lock!(self.state);
        let Some(index) = state
            .behaviors
            .iter()
            .position(|existing| Arc::ptr_eq(existing, behavior))
        else {
            return Ok(false);
        };
        state.check_removable(behavior)?;

        Self::remove_locked(&mut state, index);
        Ok(true)
    }

    /// Removes and returns the behavior at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfBounds`] if `index` is not a valid position and
    /// [`Error::RequiredBehavior`] if the behavior there is of a required kind.
    pub fn remove_at(&self, index: usize) -> Result<Arc<dyn Behavior>> {
        let mut state = write_lock!(self.state);
        let Some(existing) = state.behaviors.get(index).cloned() else {
            return Err(Error::OutOfBounds);
        };
        state.check_removable(&existing)?;

        Ok(Self::remove_locked(&mut state, index))
    }

    /// Replaces the behavior at `index`, returning the old one.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfBounds`] if `index` is not a valid position,
    /// [`Error::DuplicateBehavior`] if the new kind is unique and present elsewhere, and
    /// [`Error::RequiredBehavior`] if the old behavior is required and the new one is of
    /// another kind.
    pub fn replace(&self, index: usize, behavior: Arc<dyn Behavior>) -> Result<Arc<dyn Behavior>> {
        let mut state = write_lock!(self.state);
        let Some(current) = state.behaviors.get(index).cloned() else {
            return Err(Error::OutOfBounds);
        };
        if current.kind() != behavior.kind() {
            state.check_removable(&current)?;
        }
        state.check_unique(behavior.kind(), Some(index))?;

        let mut behaviors = state.behaviors.as_ref().clone();
        let old = std::mem::replace(&mut behaviors[index], behavior.clone());
        state.behaviors = Arc::new(behaviors);
        state.notify(&PipelineChange::Replaced {
            index,
            old: &old,
            new: &behavior,
        });
        Ok(old)
    }

    /// Removes every behavior whose kind is not required.
    ///
    /// Kinds marked unique stay unique.
    pub fn clear(&self) {
        let mut state = write_lock!(self.state);
        let (kept, removed): (Vec<_>, Vec<_>) = state
            .behaviors
            .iter()
            .cloned()
            .partition(|behavior| state.required.contains(&behavior.kind()));
        state.behaviors = Arc::new(kept);
        state.notify(&PipelineChange::Reset {
            removed: removed.as_slice(),
        });
    }

    /// Registers an observer for subsequent mutations.
    pub fn subscribe(&self, observer: Arc<dyn PipelineObserver>) {
        write_lock!(self.state).observers.push(observer);
    }

    /// Dispatches `invocation` and returns the resulting [`Return`], including exception
    /// results.
    ///
    /// # Arguments
    ///
    /// * `invocation` - The call to dispatch
    /// * `terminal` - Fallback producing the return once no applicable behavior is left
    ///
    /// # Errors
    ///
    /// Propagates errors raised by behaviors or the terminal. Exception results are returned
    /// as data.
    pub fn invoke<F>(&self, invocation: &Invocation, mut terminal: F) -> Result<Return>
    where
        F: FnMut(&Invocation) -> Result<Return>,
    {
        let snapshot = self.snapshot();
        trace!(
            method = %invocation.method(),
            behaviors = snapshot.len(),
            "dispatching invocation"
        );
        let mut next = Next::new(&snapshot, &mut terminal);
        next.invoke(invocation)
    }

    /// Dispatches `invocation` and raises an exception result as [`Error::Raised`].
    ///
    /// This is the entry point generated member bodies use.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Raised`] for exception results and propagates all other errors.
    pub fn invoke_or_raise<F>(&self, invocation: &Invocation, terminal: F) -> Result<Return>
    where
        F: FnMut(&Invocation) -> Result<Return>,
    {
        self.invoke(invocation, terminal)?.into_result()
    }

    fn insert_marked(&self, index: usize, behavior: Arc<dyn Behavior>, required: bool) -> Result<()> {
        let mut state = write_lock!(self.state);
        let kind = behavior.kind();
        if state.behaviors.iter().any(|existing| existing.kind() == kind) {
            return Err(Error::DuplicateBehavior(kind.name()));
        }

        Self::insert_locked(&mut state, index, behavior)?;
        state.unique.insert(kind);
        if required {
            state.required.insert(kind);
        }
        Ok(())
    }

    fn insert_locked(state: &mut ListState, index: usize, behavior: Arc<dyn Behavior>) -> Result<()> {
        if index > state.behaviors.len() {
            return Err(Error::OutOfBounds);
        }
        state.check_unique(behavior.kind(), None)?;

        let mut behaviors = state.behaviors.as_ref().clone();
        behaviors.insert(index, behavior.clone());
        state.behaviors = Arc::new(behaviors);
        state.notify(&PipelineChange::Added {
            index,
            behavior: &behavior,
        });
        Ok(())
    }

    fn remove_locked(state: &mut ListState, index: usize) -> Arc<dyn Behavior> {
        let mut behaviors = state.behaviors.as_ref().clone();
        let removed = behaviors.remove(index);
        state.behaviors = Arc::new(behaviors);
        state.notify(&PipelineChange::Removed {
            index,
            behavior: &removed,
        });
        removed
    }
}

impl fmt::Debug for BehaviorPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kinds: Vec<_> = self
            .snapshot()
            .iter()
            .map(|behavior| behavior.kind().short_name())
            .collect();
        f.debug_struct("BehaviorPipeline").field("behaviors", &kinds).finish()
    }
}
