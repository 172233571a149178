//! Results produced by the pipeline for an invocation.

use std::fmt;

use crate::{
    invocation::{Context, Parameter},
    value::Value,
    Error, Exception, Result,
};

/// Final values of the `ref` and `out` parameters of a call, in parameter order.
///
/// Generated member bodies copy these back into their by-reference arguments.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Outputs {
    entries: Vec<(Parameter, Value)>,
}

impl Outputs {
    pub(crate) fn new(entries: Vec<(Parameter, Value)>) -> Self {
        Self { entries }
    }

    /// Returns the number of by-reference outputs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the method has no by-reference parameters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the output at `index` among the by-reference parameters.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.entries.get(index).map(|(_, value)| value)
    }

    /// Returns the output for the parameter called `name`.
    #[must_use]
    pub fn get_by_name(&self, name: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(parameter, _)| parameter.name() == name)
            .map(|(_, value)| value)
    }

    /// Returns an iterator over `(parameter, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&Parameter, &Value)> {
        self.entries.iter().map(|(parameter, value)| (parameter, value))
    }
}

/// The outcome of dispatching an invocation.
///
/// A return carries either a value together with the by-reference outputs, or an
/// [`Exception`]. It shares the [`Context`] of the invocation it was created from.
#[derive(Clone, Debug)]
pub struct Return {
    value: Option<Value>,
    outputs: Outputs,
    exception: Option<Exception>,
    context: Context,
}

impl Return {
    pub(crate) fn with_value(value: Value, outputs: Outputs, context: Context) -> Self {
        Self {
            value: Some(value),
            outputs,
            exception: None,
            context,
        }
    }

    pub(crate) fn with_exception(exception: Exception, context: Context) -> Self {
        Self {
            value: None,
            outputs: Outputs::default(),
            exception: Some(exception),
            context,
        }
    }

    /// Returns the return value, or `None` for an exception result.
    #[must_use]
    pub fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    /// Returns the by-reference outputs.
    #[must_use]
    pub fn outputs(&self) -> &Outputs {
        &self.outputs
    }

    /// Returns the configured exception, if any.
    #[must_use]
    pub fn exception(&self) -> Option<&Exception> {
        self.exception.as_ref()
    }

    /// Returns `true` if this return carries an exception.
    #[must_use]
    pub fn has_exception(&self) -> bool {
        self.exception.is_some()
    }

    /// Returns the context shared with the originating invocation.
    #[must_use]
    pub fn context(&self) -> &Context {
        &self.context
    }

    /// Converts an exception result into [`Error::Raised`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::Raised`] if this return carries an exception.
    pub fn into_result(self) -> Result<Return> {
        match self.exception {
            Some(exception) => Err(Error::Raised(exception)),
            None => Ok(self),
        }
    }
}

impl fmt::Display for Return {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.exception, &self.value) {
            (Some(exception), _) => write!(f, "throws {exception}"),
            (None, Some(value)) => write!(f, "returns {value}"),
            (None, None) => write!(f, "returns nothing"),
        }
    }
}
