//! Invocation model: what was called, with which arguments, and what came back.
//!
//! Every member body of a generated proxy builds an [`Invocation`] and hands it to the
//! [`BehaviorPipeline`](crate::pipeline::BehaviorPipeline). Behaviors answer with a
//! [`Return`], usually created through [`Invocation::create_value_return`] or
//! [`Invocation::create_exception_return`].
//!
//! # Key Types
//!
//! | Type | Purpose |
//! |------|---------|
//! | [`MethodInfo`] | Comparable identity of a method or accessor |
//! | [`Parameter`] | Formal parameter with [`Direction`] |
//! | [`Arguments`] | Positional argument values, addressable by name |
//! | [`Context`] | Per-call map shared between invocation and return |
//! | [`Invocation`] | One call on a proxy |
//! | [`Return`] | Value plus by-reference [`Outputs`], or an exception |

mod arguments;
mod context;
#[allow(clippy::module_inception)]
mod invocation;
mod method;
mod result;

pub use arguments::Arguments;
pub use context::Context;
pub use invocation::{Invocation, InvocationBuilder};
pub use method::{Direction, MemberKind, MethodInfo, Parameter};
pub use result::{Outputs, Return};
