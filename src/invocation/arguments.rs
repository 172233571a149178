//! Positional, name-addressable argument collections.

use std::{
    fmt,
    hash::{Hash, Hasher},
    sync::{Arc, RwLock},
};

use crate::{invocation::Parameter, value::Value, Error, Result};

/// Arguments of one invocation, aligned by position with the method's formal parameters.
///
/// Values can be replaced by index or by parameter name while the invocation travels through
/// the pipeline. This is how behaviors assign `ref` and `out` parameters before a return is
/// created from the invocation.
pub struct Arguments {
    parameters: Arc<[Parameter]>,
    values: RwLock<Vec<Value>>,
}

impl Arguments {
    pub(crate) fn new(parameters: Arc<[Parameter]>, values: Vec<Value>) -> Self {
        Self {
            parameters,
            values: RwLock::new(values),
        }
    }

    /// Returns the number of arguments.
    #[must_use]
    pub fn len(&self) -> usize {
        read_lock!(self.values).len()
    }

    /// Returns `true` if the invocation has no arguments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        read_lock!(self.values).is_empty()
    }

    /// Returns the formal parameters the arguments are aligned with.
    #[must_use]
    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    /// Returns the argument at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfBounds`] if `index` is not a valid position.
    pub fn get(&self, index: usize) -> Result<Value> {
        read_lock!(self.values)
            .get(index)
            .cloned()
            .ok_or(Error::OutOfBounds)
    }

    /// Returns the argument passed for the parameter called `name`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if no parameter has that name.
    pub fn get_by_name(&self, name: &str) -> Result<Value> {
        let index = self.position(name)?;
        self.get(index)
    }

    /// Replaces the argument at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfBounds`] if `index` is not a valid position.
    pub fn set(&self, index: usize, value: Value) -> Result<()> {
        let mut values = write_lock!(self.values);
        let slot = values.get_mut(index).ok_or(Error::OutOfBounds)?;
        *slot = value;
        Ok(())
    }

    /// Replaces the argument passed for the parameter called `name`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if no parameter has that name.
    pub fn set_by_name(&self, name: &str, value: Value) -> Result<()> {
        let index = self.position(name)?;
        self.set(index, value)
    }

    /// Returns a copy of all argument values in order.
    #[must_use]
    pub fn to_vec(&self) -> Vec<Value> {
        read_lock!(self.values).clone()
    }

    /// Returns the values currently held by `ref` and `out` parameters, in parameter order.
    #[must_use]
    pub fn by_ref_values(&self) -> Vec<(Parameter, Value)> {
        let values = read_lock!(self.values);
        self.parameters
            .iter()
            .zip(values.iter())
            .filter(|(parameter, _)| parameter.direction().is_by_ref())
            .map(|(parameter, value)| (parameter.clone(), value.clone()))
            .collect()
    }

    fn position(&self, name: &str) -> Result<usize> {
        self.parameters
            .iter()
            .position(|parameter| parameter.name() == name)
            .ok_or_else(|| invalid_argument!("no parameter named '{}'", name))
    }
}

impl Clone for Arguments {
    fn clone(&self) -> Self {
        Self::new(self.parameters.clone(), self.to_vec())
    }
}

impl PartialEq for Arguments {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self, other) || *read_lock!(self.values) == *read_lock!(other.values)
    }
}

impl Eq for Arguments {}

impl Hash for Arguments {
    fn hash<H: Hasher>(&self, state: &mut H) {
        read_lock!(self.values).hash(state);
    }
}

impl fmt::Debug for Arguments {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(read_lock!(self.values).iter()).finish()
    }
}

impl fmt::Display for Arguments {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let values = read_lock!(self.values);
        for (i, (parameter, value)) in self.parameters.iter().zip(values.iter()).enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            if parameter.direction().is_by_ref() {
                write!(f, "{} ", parameter.direction())?;
            }
            write!(f, "{}: {}", parameter.name(), value)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::TypeDesc;

    fn try_parse_arguments() -> Arguments {
        let parameters: Arc<[Parameter]> = vec![
            Parameter::new("input", TypeDesc::String),
            Parameter::by_ref("count", TypeDesc::I32),
            Parameter::out("result", TypeDesc::I32),
        ]
        .into();
        Arguments::new(parameters, vec!["42".into(), 1.into(), 0.into()])
    }

    #[test]
    fn test_get_and_set_by_name() {
        let arguments = try_parse_arguments();
        assert_eq!(arguments.get_by_name("count").unwrap(), Value::I32(1));

        arguments.set_by_name("result", Value::I32(42)).unwrap();
        assert_eq!(arguments.get(2).unwrap(), Value::I32(42));

        assert!(matches!(
            arguments.get_by_name("missing"),
            Err(Error::InvalidArgument { .. })
        ));
        assert!(matches!(arguments.get(3), Err(Error::OutOfBounds)));
    }

    #[test]
    fn test_by_ref_values() {
        let arguments = try_parse_arguments();
        let outputs = arguments.by_ref_values();
        assert_eq!(outputs.len(), 2);
        assert_eq!(outputs[0].0.name(), "count");
        assert_eq!(outputs[1].0.name(), "result");
    }

    #[test]
    fn test_display_annotates_directions() {
        let arguments = try_parse_arguments();
        assert_eq!(
            arguments.to_string(),
            "input: \"42\", ref count: 1, out result: 0"
        );
    }

    #[test]
    fn test_clone_is_independent() {
        let arguments = try_parse_arguments();
        let copy = arguments.clone();
        arguments.set(1, Value::I32(7)).unwrap();
        assert_eq!(copy.get(1).unwrap(), Value::I32(1));
        assert_ne!(arguments, copy);
    }
}
