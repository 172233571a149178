//! Runtime value and type model shared by invocations, matchers and behaviors.
//!
//! Generated proxies erase their typed arguments into [`Value`]s before handing a call to the
//! pipeline. Matchers and built-in behaviors reason about those values through [`TypeDesc`],
//! which carries the nullability, default-value and assignability rules of the declared type.
//!
//! # Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | `types` | [`TypeDesc`] static type descriptors |
//! | `core` | [`Value`], [`Elements`] and [`ObjectRef`] |
//! | `handler` | [`Handler`] multicast event delegates |
//! | `typed` | [`ArgType`] bridge from Rust types |

mod core;
mod handler;
mod typed;
mod types;

pub use self::core::{Elements, ObjectRef, Value};
pub use handler::{Handler, HandlerFn};
pub use typed::ArgType;
pub use types::TypeDesc;
