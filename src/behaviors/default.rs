//! Type-appropriate default answers for unconfigured calls.

use std::sync::Arc;

use crate::{
    invocation::{Direction, Invocation, Return},
    pipeline::{Behavior, Next},
    value::{Elements, TypeDesc, Value},
    Result,
};

/// Answers every call with the default of its return type and assigns `out` parameters.
///
/// The defaults are richer than [`TypeDesc::default_value`] so callers can use results
/// without null checks:
///
/// | Declared type | Result |
/// |---------------|--------|
/// | array | empty array of the element type |
/// | iterable contract | empty sequence of the element type |
/// | unit task | completed task |
/// | task of `T` | task completed with the default of `T` |
/// | tuple | tuple of element defaults |
/// | anything else | [`TypeDesc::default_value`] |
///
/// `ref` parameters keep the value the caller passed in. The behavior never calls `next`, so
/// it belongs at the end of a pipeline.
#[derive(Debug, Default)]
pub struct DefaultValueBehavior;

impl DefaultValueBehavior {
    /// Creates the behavior.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Returns the value this behavior produces for `ty`.
    #[must_use]
    pub fn default_for(ty: &TypeDesc) -> Value {
        match ty {
            TypeDesc::Array(element) => Value::Array(Elements::empty(element.as_ref().clone())),
            TypeDesc::Sequence(element) => {
                Value::Sequence(Elements::empty(element.as_ref().clone()))
            }
            TypeDesc::Task(None) => Value::Completed(None),
            TypeDesc::Task(Some(result)) => {
                Value::Completed(Some(Arc::new(Self::default_for(result))))
            }
            TypeDesc::Tuple(elements) => {
                Value::Tuple(elements.iter().map(Self::default_for).collect())
            }
            other => other.default_value(),
        }
    }

    pub(crate) fn default_return(invocation: &Invocation) -> Result<Return> {
        let parameters = invocation.arguments().parameters();
        for (index, parameter) in parameters.iter().enumerate() {
            if parameter.direction() == Direction::Out {
                invocation
                    .arguments()
                    .set(index, Self::default_for(parameter.ty()))?;
            }
        }

        let value = Self::default_for(invocation.method().return_type());
        Ok(invocation.create_value_return(value))
    }
}

impl Behavior for DefaultValueBehavior {
    fn execute(&self, invocation: &Invocation, _next: &mut Next<'_>) -> Result<Return> {
        Self::default_return(invocation)
    }
}
