//! Argument matchers, the capture protocol and setups.
//!
//! A [`Setup`] describes the shape of calls a user wants to configure: one method identity
//! and one [`Matcher`] per formal parameter. Setups are produced by the [`capture`] protocol
//! from an ordinary call on a mock whose arguments were written with the [`arg`] helpers.
//!
//! # Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | `types` | [`Matcher`] variants and [`Condition`] |
//! | [`capture`] | Flow-scoped `push` / `freeze` |
//! | [`arg`] | Typed helpers pushing matchers |
//! | `setup` | [`Setup`] |

pub mod arg;
pub mod capture;
mod setup;
mod types;

pub use setup::Setup;
pub use types::{Condition, Matcher, Predicate};
