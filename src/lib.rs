// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0


#![doc(html_no_source)]
#![deny(missing_docs)]

//! # stunts
//!
//! The runtime interception core behind generated proxies and mocks.
//!
//! A generated type routes every member body through an ordered, mutable [`pipeline`] of
//! behaviors. Each behavior decides whether it applies to an [`invocation`], produces a return
//! value or exception, or delegates to the rest of the chain through a [`pipeline::Next`] cursor.
//! On top of that, [`mock`] adds an invocation log, matcher-based setups and a concurrent
//! per-mock state bag, while [`matcher::capture`] implements the protocol that turns a call
//! written inside a setup expression into a reusable [`matcher::Setup`].
//!
//! ## Architecture
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`value`] | Dynamic values, static type descriptors and event handlers |
//! | [`invocation`] | Member identities, arguments, invocations and returns |
//! | [`pipeline`] | Behaviors, the dispatch cursor and the observable pipeline |
//! | [`matcher`] | Argument matchers, setups and the capture protocol |
//! | [`mock`] | Mock state: invocation log, setup index and state bag |
//! | [`behaviors`] | Built-in recording, equality, event and default-value behaviors |
//! | [`proxy`] | Capabilities generated types implement |
//! | [`naming`] | Deterministic names for generated types |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use stunts::prelude::*;
//!
//! // `calculator` is a generated mock of `ICalculator`.
//! let setup = capture::setup(|| calculator.add(arg::any(), 3))?;
//! let behavior = calculator.mock()?.get_or_create_setup(setup)?;
//! behavior.returns(Value::I32(42))?;
//!
//! assert_eq!(calculator.add(100, 3)?, 42);
//! assert_eq!(calculator.add(100, 4)?, 0);
//! # Ok::<(), stunts::Error>(())
//! ```
//!
//! ## Concurrency
//!
//! Pipelines, mock state and handlers are `Send + Sync`. Dispatch works on an immutable
//! snapshot of the behavior list, so behaviors may mutate the pipeline they run in. Capture
//! state is flow-local: it follows a task across `.await` points inside
//! [`matcher::capture::scope`] and falls back to thread-local storage elsewhere.

#[macro_use]
pub(crate) mod macros;

#[macro_use]
pub(crate) mod error;

/// Shared fixtures used by the unit tests
#[cfg(test)]
pub(crate) mod test;

/// Convenient re-exports of the most commonly used types and traits.
pub mod prelude;

pub mod behaviors;
pub mod invocation;
pub mod matcher;
pub mod mock;
pub mod naming;
pub mod pipeline;
pub mod proxy;
pub mod value;

/// `stunts` Result type
///
/// A type alias for [`std::result::Result<T, Error>`] where the error type is always [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// `stunts` Error type
///
/// Errors raised by the interception core itself. Exceptions a behavior chooses to throw
/// travel as data in a [`invocation::Return`] and only become [`Error::Raised`] at the proxy
/// boundary.
pub use error::Error;

/// An exception value carried by an exception return.
pub use error::Exception;
