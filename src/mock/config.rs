//! Configuration of the behaviors a mock starts with.

/// Where newly created setup-scoped behaviors are wired into a mock's pipeline.
///
/// When several setups match the same call, the one that comes first in the pipeline runs.
/// The order therefore decides which configuration wins.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SetupOrder {
    /// Insert directly after the recording behavior; the last configured setup wins.
    #[default]
    NewestFirst,

    /// Insert after all other setup-scoped behaviors, before the trailing built-ins; the first
    /// configured setup wins.
    OldestFirst,
}

/// Configuration for the pipeline a mock is initialised with.
///
/// A mock always carries exactly one recording behavior in front. The remaining built-ins are
/// optional:
///
/// | Field | Behavior | Position |
/// |-------|----------|----------|
/// | `identity_equality` | [`EqualityBehavior`](crate::behaviors::EqualityBehavior) | after recording |
/// | `event_bookkeeping` | [`EventBehavior`](crate::behaviors::EventBehavior) | after equality |
/// | `default_values` | [`DefaultValueBehavior`](crate::behaviors::DefaultValueBehavior) | last |
///
/// # Presets
///
/// - [`default()`](Self::default) - All built-ins, newest setup wins
/// - [`strict()`](Self::strict) - No default values; unconfigured calls reach the terminal
/// - [`minimal()`](Self::minimal) - Recording only
///
/// # Example
///
/// ```rust,ignore
/// use stunts::mock::{MockConfig, SetupOrder};
///
/// let config = MockConfig {
///     setup_order: SetupOrder::OldestFirst,
///     ..MockConfig::default()
/// };
/// ```
#[derive(Clone, Debug)]
pub struct MockConfig {
    /// Whether unconfigured calls return type defaults instead of reaching the terminal.
    pub default_values: bool,

    /// Whether `Equals` / `GetHashCode` answer with reference identity.
    pub identity_equality: bool,

    /// Whether event subscriptions are tracked so the mock can raise events.
    pub event_bookkeeping: bool,

    /// Where new setup-scoped behaviors are inserted.
    pub setup_order: SetupOrder,

    /// Maximum compare-and-swap attempts under the lock before event bookkeeping gives up.
    ///
    /// Running out of attempts is an invariant violation and panics.
    pub cas_retries: usize,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            default_values: true,
            identity_equality: true,
            event_bookkeeping: true,
            setup_order: SetupOrder::NewestFirst,
            cas_retries: 16,
        }
    }
}

impl MockConfig {
    /// Creates a configuration where unconfigured calls are not answered by the mock.
    ///
    /// Calls no setup handles fall through to the terminal of the generated member.
    #[must_use]
    pub fn strict() -> Self {
        Self {
            default_values: false,
            ..Self::default()
        }
    }

    /// Creates a configuration with only the mandatory recording behavior.
    #[must_use]
    pub fn minimal() -> Self {
        Self {
            default_values: false,
            identity_equality: false,
            event_bookkeeping: false,
            ..Self::default()
        }
    }

    /// Sets the setup order.
    #[must_use]
    pub fn with_setup_order(mut self, order: SetupOrder) -> Self {
        self.setup_order = order;
        self
    }

    /// Sets the number of locked compare-and-swap attempts for event bookkeeping.
    #[must_use]
    pub fn with_cas_retries(mut self, retries: usize) -> Self {
        self.cas_retries = retries;
        self
    }
}
