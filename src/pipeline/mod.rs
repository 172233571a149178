//! The behavior pipeline every generated member dispatches through.
//!
//! A [`BehaviorPipeline`] is an ordered, observable list of [`Behavior`]s. Dispatch walks a
//! snapshot of the list with a [`Next`] cursor: the first applicable behavior runs and decides
//! whether the rest of the chain runs at all. A [`SetupBehavior`] nests a second pipeline that
//! only runs for invocations matching one [`Setup`](crate::matcher::Setup) and resumes the
//! outer chain when it is done.
//!
//! # Key Components
//!
//! | Type | Purpose |
//! |------|---------|
//! | [`Behavior`] | Interceptor contract |
//! | [`BehaviorKind`] | Type identity used for exclusion and uniqueness |
//! | [`DelegateBehavior`] | Closure-backed behavior |
//! | [`Next`] | Continuation cursor |
//! | [`BehaviorPipeline`] | Copy-on-write list and dispatch |
//! | [`PipelineObserver`] | Receives [`PipelineChange`] notifications |
//! | [`SetupBehavior`] | Setup-scoped nested pipeline |

mod behavior;
mod dispatch;
mod observer;
#[allow(clippy::module_inception)]
mod pipeline;
mod setup;

pub use behavior::{AppliesFn, Behavior, BehaviorFn, BehaviorKind, DelegateBehavior};
pub use dispatch::{Next, Terminal};
pub use observer::{PipelineChange, PipelineObserver};
pub use pipeline::BehaviorPipeline;
pub use setup::SetupBehavior;
