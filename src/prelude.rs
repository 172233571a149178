//! # stunts Prelude
//!
//! The types and traits needed to write generated member bodies, configure mocks and author
//! behaviors.
//!
//! ```rust,ignore
//! use stunts::prelude::*;
//! ```

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all stunts operations
pub use crate::Error;

/// An exception produced by a behavior
pub use crate::Exception;

/// The result type used throughout stunts
pub use crate::Result;

// ================================================================================================
// Values
// ================================================================================================

/// Dynamic values and their static types
pub use crate::value::{ArgType, Handler, ObjectRef, TypeDesc, Value};

// ================================================================================================
// Invocations
// ================================================================================================

/// Member identities and invocation data
pub use crate::invocation::{
    Arguments, Context, Direction, Invocation, MemberKind, MethodInfo, Outputs, Parameter, Return,
};

// ================================================================================================
// Pipeline
// ================================================================================================

/// Behaviors and dispatch
pub use crate::pipeline::{
    Behavior, BehaviorKind, BehaviorPipeline, DelegateBehavior, Next, PipelineChange,
    PipelineObserver, SetupBehavior,
};

// ================================================================================================
// Matching and Mocks
// ================================================================================================

/// Matchers, setups and the capture protocol
pub use crate::matcher::{arg, capture, Matcher, Setup};

/// Mock state and configuration
pub use crate::mock::{MockConfig, MockState, SetupOrder};

/// Built-in behaviors
pub use crate::behaviors::{DefaultValueBehavior, EqualityBehavior, EventBehavior, RecordingBehavior};

/// Proxy capabilities
pub use crate::proxy::{Mocked, Proxy, Target};
