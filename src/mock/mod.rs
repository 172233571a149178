//! Mock introspection state.
//!
//! A mock is a proxy that additionally exposes a [`MockState`]: the log of invocations it
//! observed, the index of setup-scoped behaviors wired into its pipeline, and a
//! [`StateBag`] its behaviors keep per-instance data in. The state is created lazily through
//! a [`MockCell`] and configured by a [`MockConfig`].

mod bag;
mod config;
mod index;
mod state;

pub use bag::StateBag;
pub use config::{MockConfig, SetupOrder};
pub use index::SetupIndex;
pub use state::{MockCell, MockState};
