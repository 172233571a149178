//! Ambient matcher capture: `push` during a setup expression, `freeze` when the call lands.
//!
//! A fluent setup is written as an ordinary call on a mock whose arguments are either literal
//! values or matcher helpers (see [`crate::matcher::arg`]). Each helper [`push`]es its matcher
//! onto a queue owned by the current call flow and returns the default value of its type. When
//! the call reaches the mock's recording behavior, the invocation is [`freeze`]d: every
//! argument that still equals its parameter type's default value takes the next queued matcher
//! whose type fits, and every other argument becomes an exact-value matcher.
//!
//! # Call flows
//!
//! The queue and the frozen "current setup" belong to a logical call flow:
//!
//! - inside [`scope`] the state is a tokio task-local and follows the future across `.await`
//!   points and worker threads,
//! - inside [`sync_scope`] it is bound to the closure,
//! - [`setup`] and [`setup_async`] open their own flow when none is active,
//! - anywhere else it falls back to a per-thread slot.
//!
//! Only bare [`push`] and [`freeze`] calls outside any flow use the per-thread slot; two tasks
//! sharing a worker thread must not rely on it.
//!
//! # Known ambiguity
//!
//! An argument that legitimately equals its type's default (`0`, `false`, `null`) while
//! unrelated matchers are still queued in the same flow will consume one of them. This is
//! inherent to the placeholder scheme and is left as is; avoid mixing literal defaults with
//! leftover matchers, or call [`clear`] between unrelated setup expressions.
//!
//! # Examples
//!
//! ```rust,ignore
//! use stunts::matcher::{arg, capture};
//!
//! let setup = capture::setup(|| calculator.add(arg::any::<i32>(), 3))?;
//! assert_eq!(setup.to_string(), "ICalculator::Add(Any<i32>, 3)");
//! ```

use std::{cell::RefCell, collections::VecDeque, future::Future};

use crate::{
    invocation::Invocation,
    matcher::{Matcher, Setup},
    value::Value,
    Result,
};

#[derive(Default)]
struct FlowState {
    pending: VecDeque<Matcher>,
    current: Option<Setup>,
    configuring: bool,
}

tokio::task_local! {
    static FLOW: RefCell<FlowState>;
}

thread_local! {
    static THREAD_FLOW: RefCell<FlowState> = RefCell::new(FlowState::default());
}

fn in_flow() -> bool {
    FLOW.try_with(|_| ()).is_ok()
}

fn with_flow<R>(f: impl FnOnce(&mut FlowState) -> R) -> R {
    if in_flow() {
        FLOW.with(|state| f(&mut state.borrow_mut()))
    } else {
        THREAD_FLOW.with(|state| f(&mut state.borrow_mut()))
    }
}

/// Runs `future` with its own, empty capture state.
///
/// The state follows the future across `.await` points, so matchers pushed before an await are
/// still visible to a freeze that happens after it. Concurrent scopes never see each other's
/// matchers.
pub async fn scope<F: Future>(future: F) -> F::Output {
    FLOW.scope(RefCell::new(FlowState::default()), future).await
}

/// Runs `f` with its own, empty capture state.
pub fn sync_scope<R>(f: impl FnOnce() -> R) -> R {
    FLOW.sync_scope(RefCell::new(FlowState::default()), f)
}

/// Queues `matcher` for the next freeze and returns the default value of its type.
///
/// Pushing discards any setup frozen earlier in this flow.
pub fn push(matcher: Matcher) -> Value {
    let placeholder = matcher.argument_type().default_value();
    with_flow(|state| {
        state.current = None;
        state.pending.push_back(matcher);
    });
    placeholder
}

/// Converts `invocation` into a [`Setup`] using the queued matchers and stores it as the
/// current setup of this flow.
///
/// For each argument in order: if it equals the default value of its parameter type, the
/// queue is not empty, and the type of the queue's front matcher is assignable to the
/// parameter type, the front matcher is dequeued and used. Otherwise the argument is wrapped in
/// an exact-value matcher. Matchers that were not consumed stay queued.
///
/// # Errors
///
/// Never fails for invocations built through [`Invocation::new`]; the arity check of
/// [`Setup::new`] is propagated.
pub fn freeze(invocation: &Invocation) -> Result<Setup> {
    let arguments = invocation.arguments().to_vec();

    let matchers = with_flow(|state| {
        invocation
            .arguments()
            .parameters()
            .iter()
            .zip(arguments)
            .map(|(parameter, value)| {
                let ty = parameter.ty();
                let from_queue = value == ty.default_value()
                    && state
                        .pending
                        .front()
                        .is_some_and(|next| ty.is_assignable_from(next.argument_type()));

                match from_queue.then(|| state.pending.pop_front()).flatten() {
                    Some(matcher) => matcher,
                    None => Matcher::value(ty.clone(), value),
                }
            })
            .collect()
    });

    let setup = Setup::new(invocation.clone(), matchers)?;
    with_flow(|state| state.current = Some(setup.clone()));
    Ok(setup)
}

/// Returns the setup most recently frozen in this flow.
#[must_use]
pub fn current_setup() -> Option<Setup> {
    with_flow(|state| state.current.clone())
}

/// Removes and returns the setup most recently frozen in this flow.
pub fn take_setup() -> Option<Setup> {
    with_flow(|state| state.current.take())
}

/// Returns the number of matchers waiting for a freeze.
#[must_use]
pub fn pending_count() -> usize {
    with_flow(|state| state.pending.len())
}

/// Discards queued matchers and the current setup of this flow.
pub fn clear() {
    with_flow(|state| {
        state.pending.clear();
        state.current = None;
    });
}

/// Returns `true` while a setup expression is being evaluated in this flow.
///
/// Recording behaviors use this to freeze a call without logging it as a real invocation.
#[must_use]
pub fn is_configuring() -> bool {
    with_flow(|state| state.configuring)
}

struct Configuring {
    previous: bool,
}

impl Configuring {
    fn enter() -> Self {
        let previous = with_flow(|state| {
            state.current = None;
            std::mem::replace(&mut state.configuring, true)
        });
        Configuring { previous }
    }
}

impl Drop for Configuring {
    fn drop(&mut self) {
        let previous = self.previous;
        with_flow(|state| state.configuring = previous);
    }
}

/// Evaluates a setup expression and returns the setup it froze.
///
/// `f` is expected to make exactly one call on a mock, with matcher helpers in argument
/// position. The call is frozen by the mock's recording behavior, is not logged as a real
/// invocation, and returns a default value.
///
/// Outside [`scope`] and [`sync_scope`] the expression runs in a flow of its own, which is
/// discarded afterwards.
///
/// # Errors
///
/// Returns [`crate::Error::InvalidArgument`] if `f` made no call on a mock.
pub fn setup<R>(f: impl FnOnce() -> R) -> Result<Setup> {
    if in_flow() {
        configure(f)
    } else {
        sync_scope(|| configure(f))
    }
}

/// Asynchronous variant of [`setup`] for expressions that must be awaited.
///
/// Outside [`scope`] the expression runs in a flow of its own that follows it across `.await`
/// points and worker threads, so concurrent setup expressions never share matchers.
///
/// # Errors
///
/// Returns [`crate::Error::InvalidArgument`] if the future made no call on a mock.
pub async fn setup_async<F: Future>(future: F) -> Result<Setup> {
    if in_flow() {
        configure_async(future).await
    } else {
        scope(configure_async(future)).await
    }
}

fn configure<R>(f: impl FnOnce() -> R) -> Result<Setup> {
    {
        let _configuring = Configuring::enter();
        f();
    }
    take_setup().ok_or_else(|| invalid_argument!("setup expression did not call a mock"))
}

async fn configure_async<F: Future>(future: F) -> Result<Setup> {
    {
        let _configuring = Configuring::enter();
        future.await;
    }
    take_setup().ok_or_else(|| invalid_argument!("setup expression did not call a mock"))
}
