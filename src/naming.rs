//! Deterministic names for generated proxy types.
//!
//! A generator emitting proxies ahead of time and a factory looking them up at runtime have to
//! agree on the name of the type implementing a given set of contracts without talking to each
//! other. Both derive it from a [`ContractSet`] through a [`Naming`] convention.
//!
//! # Examples
//!
//! ```rust,ignore
//! use stunts::naming::{ContractSet, Naming};
//!
//! let contracts = ContractSet::new(Some("Acme.Calculator"), ["System.IDisposable", "Acme.ICalculator"]);
//! assert_eq!(Naming::MOCKS.full_name(&contracts), "Mocks.CalculatorICalculatorIDisposableMock");
//! ```

use std::fmt;

/// The ordered contracts a proxy type implements.
///
/// An optional base type comes first, followed by the interfaces without duplicates, sorted
/// ordinally by the simple name each contributes to a generated type name. Interfaces with the
/// same simple name are ordered by their full name. The same set therefore always yields the
/// same order regardless of how it was written.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ContractSet {
    base: Option<String>,
    interfaces: Vec<String>,
}

impl ContractSet {
    /// Creates a contract set.
    ///
    /// # Arguments
    ///
    /// * `base` - Full name of the base type, if any
    /// * `interfaces` - Full names of the implemented interfaces, in any order
    pub fn new<I, S>(base: Option<&str>, interfaces: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut interfaces: Vec<String> = interfaces.into_iter().map(Into::into).collect();
        interfaces.sort_by_cached_key(|interface| (simple_name(interface), interface.clone()));
        interfaces.dedup();
        Self {
            base: base.map(str::to_owned),
            interfaces,
        }
    }

    /// Returns the base type.
    #[must_use]
    pub fn base(&self) -> Option<&str> {
        self.base.as_deref()
    }

    /// Returns the interfaces in ordinal order of their simple names.
    #[must_use]
    pub fn interfaces(&self) -> &[String] {
        &self.interfaces
    }

    /// Returns all contracts, base first.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.base
            .as_deref()
            .into_iter()
            .chain(self.interfaces.iter().map(String::as_str))
    }
}

impl fmt::Display for ContractSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, contract) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{contract}")?;
        }
        Ok(())
    }
}

/// A namespace and suffix generated type names are built with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Naming {
    namespace: &'static str,
    suffix: &'static str,
}

impl Naming {
    /// Convention for plain proxies.
    pub const STUNTS: Naming = Naming::new("Stunts", "Stunt");

    /// Convention for mocks.
    pub const MOCKS: Naming = Naming::new("Mocks", "Mock");

    /// Creates a naming convention.
    #[must_use]
    pub const fn new(namespace: &'static str, suffix: &'static str) -> Self {
        Self { namespace, suffix }
    }

    /// Returns the namespace generated types live in.
    #[must_use]
    pub fn namespace(&self) -> &'static str {
        self.namespace
    }

    /// Returns the suffix appended to generated type names.
    #[must_use]
    pub fn suffix(&self) -> &'static str {
        self.suffix
    }

    /// Returns the simple name of the type implementing `contracts`.
    ///
    /// Each contract contributes its name without namespace; generic arguments are appended
    /// after `Of`.
    #[must_use]
    pub fn type_name(&self, contracts: &ContractSet) -> String {
        let mut name: String = contracts.iter().map(simple_name).collect();
        name.push_str(self.suffix);
        name
    }

    /// Returns the namespace-qualified name of the type implementing `contracts`.
    #[must_use]
    pub fn full_name(&self, contracts: &ContractSet) -> String {
        format!("{}.{}", self.namespace, self.type_name(contracts))
    }
}

/// Strips namespaces and flattens generic arguments: `Acme.IRepo<Acme.Customer>` becomes
/// `IRepoOfCustomer`.
fn simple_name(full: &str) -> String {
    let (head, arguments) = match full.find('<') {
        Some(open) => (&full[..open], Some(&full[open + 1..full.len().saturating_sub(1)])),
        None => (full, None),
    };

    let mut name = head.rsplit('.').next().unwrap_or(head).to_string();
    if let Some(arguments) = arguments {
        name.push_str("Of");
        for argument in split_arguments(arguments) {
            name.push_str(&simple_name(argument.trim()));
        }
    }
    name
}

fn split_arguments(arguments: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (index, c) in arguments.char_indices() {
        match c {
            '<' => depth += 1,
            '>' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(&arguments[start..index]);
                start = index + 1;
            }
            _ => {}
        }
    }
    parts.push(&arguments[start..]);
    parts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contract_order_is_deterministic() {
        let a = ContractSet::new(Some("Acme.Base"), ["Acme.IB", "Acme.IA", "Acme.IB"]);
        let b = ContractSet::new(Some("Acme.Base"), ["Acme.IA", "Acme.IB"]);
        assert_eq!(a, b);
        assert_eq!(a.iter().collect::<Vec<_>>(), vec!["Acme.Base", "Acme.IA", "Acme.IB"]);
        assert_eq!(a.to_string(), "Acme.Base, Acme.IA, Acme.IB");
    }

    #[test]
    fn test_ordinal_sorting() {
        let set = ContractSet::new(None, ["b.Ia", "a.IB", "a.Ia"]);
        assert_eq!(set.interfaces(), &["a.IB", "a.Ia", "b.Ia"]);
    }

    #[test]
    fn test_interfaces_sort_by_simple_name() {
        let set = ContractSet::new(None, ["Zeta.IA", "Alpha.IB"]);
        assert_eq!(set.interfaces(), &["Zeta.IA", "Alpha.IB"]);
        assert_eq!(Naming::STUNTS.type_name(&set), "IAIBStunt");

        let reordered = ContractSet::new(None, ["Alpha.IB", "Zeta.IA"]);
        assert_eq!(Naming::STUNTS.full_name(&reordered), "Stunts.IAIBStunt");
    }

    #[test]
    fn test_names() {
        let contracts = ContractSet::new(None, ["Acme.ICalculator", "System.IDisposable"]);
        assert_eq!(
            Naming::STUNTS.type_name(&contracts),
            "ICalculatorIDisposableStunt"
        );
        assert_eq!(
            Naming::MOCKS.full_name(&contracts),
            "Mocks.ICalculatorIDisposableMock"
        );
    }

    #[test]
    fn test_generic_names() {
        let contracts = ContractSet::new(
            None,
            ["Acme.IRepo<Acme.Customer>", "Acme.IMap<System.String, Acme.List<Acme.Order>>"],
        );
        assert_eq!(
            Naming::STUNTS.type_name(&contracts),
            "IMapOfStringListOfOrderIRepoOfCustomerStunt"
        );
    }
}
