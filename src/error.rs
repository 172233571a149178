use std::{fmt, sync::Arc};

use thiserror::Error;

macro_rules! invalid_argument {
    // Single string version
    ($msg:expr) => {
        crate::Error::InvalidArgument {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::InvalidArgument {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// The variants mirror the failure taxonomy of the interception core: configuration problems
/// fail at the call that introduced them, capability mismatches name the expectation that was
/// not met, and configured exception results only become errors when a caller explicitly asks
/// for them to be raised.
///
/// # Error Categories
///
/// ## Invalid Configuration
/// - [`Error::InvalidArgument`] - Missing or inconsistent input (no target, arity mismatch)
/// - [`Error::DuplicateBehavior`] - A second instance of a unique behavior kind was added
/// - [`Error::RequiredBehavior`] - A behavior the pipeline must keep was about to be removed
/// - [`Error::OutOfBounds`] - Index outside of a behavior list or argument collection
///
/// ## Capability Errors
/// - [`Error::NotMocked`] - A behavior that needs mock state ran against a plain proxy
/// - [`Error::TargetDropped`] - The proxy an invocation was made on no longer exists
///
/// ## Raised Results
/// - [`Error::Raised`] - A configured exception result converted into a failure
///
/// # Examples
///
/// ```rust,ignore
/// use stunts::Error;
///
/// match pipeline.invoke_or_raise(&invocation, |inv| Ok(inv.create_value_return(Value::Void))) {
///     Ok(ret) => println!("returned {:?}", ret.value()),
///     Err(Error::Raised(exception)) => println!("configured failure: {exception}"),
///     Err(e) => println!("other error: {e}"),
/// }
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// An argument passed to the core was missing or inconsistent.
    ///
    /// Raised for invocations built without a target or method, argument vectors that do not
    /// line up with the formal parameters, and similar configuration problems.
    ///
    /// # Fields
    ///
    /// * `message` - Detailed description of the problem
    /// * `file` - Source file where the error was detected
    /// * `line` - Source line where the error was detected
    #[error("Invalid argument - {file}:{line}: {message}")]
    InvalidArgument {
        /// The message to be printed for the InvalidArgument error
        message: String,
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },

    /// A behavior kind that may only appear once was added a second time.
    ///
    /// Mocked proxies always carry exactly one recording behavior; adding another one is a
    /// configuration error and never silently ignored.
    #[error("A behavior of kind '{0}' is already registered and must be unique")]
    DuplicateBehavior(&'static str),

    /// A behavior kind the pipeline must always carry was about to be removed.
    ///
    /// A mock's recording behavior is required: without it calls would silently stop being
    /// logged.
    #[error("A behavior of kind '{0}' is required and cannot be removed")]
    RequiredBehavior(&'static str),

    /// The invocation target does not expose the mock capability.
    ///
    /// The associated message names the behavior or operation that required it.
    #[error("Invocation target is not a mock: {0}")]
    NotMocked(String),

    /// The proxy instance an invocation was made on has been dropped.
    #[error("The invocation target has been dropped")]
    TargetDropped,

    /// An index was outside of the valid range of a list or argument collection.
    #[error("Out of Bound access would have occurred!")]
    OutOfBounds,

    /// A configured exception result, raised as a failure.
    ///
    /// Produced by [`crate::pipeline::BehaviorPipeline::invoke_or_raise`] when the final
    /// [`crate::invocation::Return`] carries an exception.
    #[error("{0}")]
    Raised(Exception),

    /// Generic error for miscellaneous failures.
    #[error("{0}")]
    Error(String),
}

#[derive(Error, Debug)]
#[error("{0}")]
struct Message(String);

/// A failure value carried as data inside a [`crate::invocation::Return`].
///
/// Exceptions are shared, cloneable handles to an arbitrary error. They are only raised
/// (converted to [`Error::Raised`]) when a caller requests it; otherwise they can be
/// inspected like any other result.
#[derive(Clone)]
pub struct Exception(Arc<dyn std::error::Error + Send + Sync>);

impl Exception {
    /// Wraps an existing error.
    pub fn new<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self(Arc::new(error))
    }

    /// Creates an exception carrying only a message.
    pub fn msg(message: impl Into<String>) -> Self {
        Self(Arc::new(Message(message.into())))
    }

    /// Returns the wrapped error.
    #[must_use]
    pub fn inner(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
        self.0.as_ref()
    }

    /// Returns `true` if both handles refer to the same exception instance.
    #[must_use]
    pub fn ptr_eq(&self, other: &Exception) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Exception {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Exception").field(&self.0.to_string()).finish()
    }
}

impl fmt::Display for Exception {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_argument_macro_captures_location() {
        let err = invalid_argument!("missing {}", "target");
        match err {
            Error::InvalidArgument {
                message,
                file,
                line,
            } => {
                assert_eq!(message, "missing target");
                assert!(file.ends_with("error.rs"));
                assert!(line > 0);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_exception_display_and_identity() {
        let exception = Exception::msg("boom");
        let copy = exception.clone();
        assert_eq!(exception.to_string(), "boom");
        assert!(exception.ptr_eq(&copy));
        assert!(!exception.ptr_eq(&Exception::msg("boom")));

        let raised = Error::Raised(exception);
        assert_eq!(raised.to_string(), "boom");
    }
}
