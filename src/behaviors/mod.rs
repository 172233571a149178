//! Built-in behaviors mocks are wired with.
//!
//! | Behavior | Applies to | Effect |
//! |----------|------------|--------|
//! | [`RecordingBehavior`] | every call | freezes and logs the call, then continues |
//! | [`EqualityBehavior`] | `Equals` / `GetHashCode` | reference identity |
//! | [`EventBehavior`] | `add_` / `remove_` accessors | keeps the combined handler per event |
//! | [`DefaultValueBehavior`] | every call | type-appropriate default return |

mod default;
mod equality;
mod event;
mod recording;

pub use default::DefaultValueBehavior;
pub use equality::EqualityBehavior;
pub use event::EventBehavior;
pub use recording::RecordingBehavior;
