//! Per-instance introspection state of a mock.

use std::sync::{Arc, Mutex, OnceLock};

use tracing::debug;

use crate::{
    behaviors::{DefaultValueBehavior, EqualityBehavior, EventBehavior, RecordingBehavior},
    invocation::{Invocation, MethodInfo},
    matcher::Setup,
    mock::{MockConfig, SetupIndex, SetupOrder, StateBag},
    pipeline::{Behavior, BehaviorKind, BehaviorPipeline, SetupBehavior},
    Result,
};

/// What a mock knows about itself: the calls it saw, the setups configured on it and the
/// state its behaviors keep.
///
/// Creating a `MockState` wires the mock's pipeline according to its [`MockConfig`]:
///
/// | Position | Behavior |
/// |----------|----------|
/// | first, unique | [`RecordingBehavior`] |
/// | next, optional | [`EqualityBehavior`], [`EventBehavior`] |
/// | last, optional | [`DefaultValueBehavior`] |
///
/// Setup-scoped behaviors created through [`get_or_create_setup`](Self::get_or_create_setup)
/// are inserted between the recording behavior and the rest, in the order the configuration
/// asks for.
pub struct MockState {
    pipeline: Arc<BehaviorPipeline>,
    config: MockConfig,
    invocations: boxcar::Vec<Invocation>,
    setups: Arc<SetupIndex>,
    state: StateBag,
    creating: Mutex<()>,
}

impl MockState {
    /// Attaches mock state to `pipeline`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::DuplicateBehavior`] if the pipeline already holds a recording
    /// behavior.
    pub fn new(pipeline: Arc<BehaviorPipeline>, config: MockConfig) -> Result<Self> {
        pipeline.insert_required(0, Arc::new(RecordingBehavior::new()))?;

        let setups = Arc::new(SetupIndex::default());
        pipeline.subscribe(setups.clone());
        for behavior in pipeline.snapshot().iter() {
            setups.add(behavior);
        }

        let mut position = 1;
        if config.identity_equality {
            pipeline.insert(position, Arc::new(EqualityBehavior::new()))?;
            position += 1;
        }
        if config.event_bookkeeping {
            pipeline.insert(
                position,
                Arc::new(EventBehavior::with_retries(config.cas_retries)),
            )?;
        }
        if config.default_values {
            pipeline.push(Arc::new(DefaultValueBehavior::new()))?;
        }

        debug!(
            behaviors = pipeline.len(),
            setup_order = ?config.setup_order,
            "attached mock state"
        );

        Ok(Self {
            pipeline,
            config,
            invocations: boxcar::Vec::new(),
            setups,
            state: StateBag::new(),
            creating: Mutex::new(()),
        })
    }

    /// Returns the pipeline this state is attached to.
    #[must_use]
    pub fn pipeline(&self) -> &Arc<BehaviorPipeline> {
        &self.pipeline
    }

    /// Returns the configuration the pipeline was wired with.
    #[must_use]
    pub fn config(&self) -> &MockConfig {
        &self.config
    }

    /// Appends `invocation` to the invocation log.
    pub fn record(&self, invocation: Invocation) {
        self.invocations.push(invocation);
    }

    /// Returns the number of recorded invocations.
    #[must_use]
    pub fn invocation_count(&self) -> usize {
        self.invocations.count()
    }

    /// Returns all recorded invocations in the order they were observed.
    #[must_use]
    pub fn invocations(&self) -> Vec<Invocation> {
        self.invocations
            .iter()
            .map(|(_, invocation)| invocation.clone())
            .collect()
    }

    /// Returns the recorded invocations of `method`.
    #[must_use]
    pub fn invocations_of(&self, method: &MethodInfo) -> Vec<Invocation> {
        self.invocations
            .iter()
            .filter(|(_, invocation)| invocation.method().as_ref() == method)
            .map(|(_, invocation)| invocation.clone())
            .collect()
    }

    /// Returns the setups that currently have a setup-scoped behavior in the pipeline.
    #[must_use]
    pub fn setups(&self) -> Vec<Setup> {
        self.setups.setups()
    }

    /// Returns the setup-scoped behavior registered for `setup`.
    #[must_use]
    pub fn setup_behavior(&self, setup: &Setup) -> Option<Arc<SetupBehavior>> {
        self.setups.get(setup)
    }

    /// Returns the state bag shared by this mock's behaviors.
    #[must_use]
    pub fn state(&self) -> &StateBag {
        &self.state
    }

    /// Returns the setup-scoped behavior for `setup`, wiring a new one into the pipeline if
    /// none exists.
    ///
    /// Equal setups always yield the same behavior, so repeated configuration accumulates in
    /// one inner pipeline.
    ///
    /// # Errors
    ///
    /// Propagates pipeline insertion errors.
    pub fn get_or_create_setup(&self, setup: Setup) -> Result<Arc<SetupBehavior>> {
        if let Some(existing) = self.setups.get(&setup) {
            return Ok(existing);
        }

        let _creating = lock!(self.creating);
        if let Some(existing) = self.setups.get(&setup) {
            return Ok(existing);
        }

        let behavior = Arc::new(SetupBehavior::new(setup));
        let position = self.setup_position();
        self.pipeline.insert(position, behavior.clone())?;

        debug!(
            setup = %behavior.setup(),
            position = position,
            "created setup behavior"
        );
        Ok(behavior)
    }

    fn setup_position(&self) -> usize {
        let snapshot = self.pipeline.snapshot();
        let after_recording = snapshot
            .iter()
            .position(|behavior| behavior.kind() == BehaviorKind::of::<RecordingBehavior>())
            .map_or(0, |index| index + 1);

        match self.config.setup_order {
            SetupOrder::NewestFirst => after_recording,
            SetupOrder::OldestFirst => snapshot
                .iter()
                .rposition(|behavior| behavior.downcast_ref::<SetupBehavior>().is_some())
                .map_or_else(
                    || builtin_end(&snapshot, after_recording),
                    |index| index + 1,
                ),
        }
    }
}

fn builtin_end(snapshot: &[Arc<dyn Behavior>], start: usize) -> usize {
    let builtins = [
        BehaviorKind::of::<EqualityBehavior>(),
        BehaviorKind::of::<EventBehavior>(),
    ];
    snapshot
        .iter()
        .enumerate()
        .skip(start)
        .take_while(|(_, behavior)| builtins.contains(&behavior.kind()))
        .last()
        .map_or(start, |(index, _)| index + 1)
}

/// Lazily created [`MockState`] slot for generated mocks.
///
/// The state is created on first access, at most once, even under concurrent first access.
/// A failed creation leaves the slot empty so a later access can retry.
///
/// ```rust,ignore
/// impl Mocked for CalculatorMock {
///     fn mock(&self) -> stunts::Result<&MockState> {
///         self.mock.get_or_init(&self.pipeline, MockConfig::default())
///     }
/// }
/// ```
#[derive(Default)]
pub struct MockCell {
    state: OnceLock<MockState>,
    init: Mutex<()>,
}

impl MockCell {
    /// Creates an empty slot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the state if it was already created.
    #[must_use]
    pub fn get(&self) -> Option<&MockState> {
        self.state.get()
    }

    /// Returns the state, attaching it to `pipeline` with `config` on first access.
    ///
    /// # Errors
    ///
    /// Propagates errors of [`MockState::new`].
    pub fn get_or_init(
        &self,
        pipeline: &Arc<BehaviorPipeline>,
        config: MockConfig,
    ) -> Result<&MockState> {
        self.get_or_try_init(|| MockState::new(pipeline.clone(), config))
    }

    /// Returns the state, creating it with `create` on first access.
    ///
    /// # Errors
    ///
    /// Propagates the error of `create`.
    pub fn get_or_try_init<F>(&self, create: F) -> Result<&MockState>
    where
        F: FnOnce() -> Result<MockState>,
    {
        if let Some(state) = self.state.get() {
            return Ok(state);
        }

        let _init = lock!(self.init);
        if let Some(state) = self.state.get() {
            return Ok(state);
        }

        let state = create()?;
        Ok(self.state.get_or_init(|| state))
    }
}
