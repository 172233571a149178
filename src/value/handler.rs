//! Multicast event handler delegates.

use std::{
    fmt,
    hash::{Hash, Hasher},
    sync::Arc,
};

use crate::{value::Value, Result};

/// Type alias for a single event callback.
///
/// Callbacks receive the event arguments in declaration order. Returning an error stops the
/// remaining callbacks of the invocation list and propagates to the raiser.
pub type HandlerFn = dyn Fn(&[Value]) -> Result<()> + Send + Sync;

/// An immutable, combinable event handler.
///
/// A `Handler` owns an ordered invocation list of callbacks. Combining two handlers appends the
/// second list to the first; removing one drops the last contiguous occurrence of its list.
/// Both operations produce new handlers and never mutate the originals, which is what makes
/// compare-and-swap updates of a stored handler safe.
///
/// # Examples
///
/// ```rust,ignore
/// use stunts::value::Handler;
///
/// let h1 = Handler::new("EventHandler", |_args| Ok(()));
/// let h2 = Handler::new("EventHandler", |_args| Ok(()));
///
/// let both = h1.combine(&h2);
/// assert_eq!(both.len(), 2);
///
/// let only_h2 = both.remove(&h1).unwrap();
/// assert_eq!(only_h2, h2);
/// ```
#[derive(Clone)]
pub struct Handler {
    type_name: Arc<str>,
    invocation_list: Arc<[Arc<HandlerFn>]>,
}

impl Handler {
    /// Creates a handler with a single callback.
    ///
    /// # Arguments
    ///
    /// * `type_name` - Name of the delegate type, used for type checks
    /// * `callback` - The function to invoke when the handler is raised
    pub fn new<F>(type_name: impl Into<Arc<str>>, callback: F) -> Self
    where
        F: Fn(&[Value]) -> Result<()> + Send + Sync + 'static,
    {
        let callback: Arc<HandlerFn> = Arc::new(callback);
        Self {
            type_name: type_name.into(),
            invocation_list: Arc::from(vec![callback]),
        }
    }

    /// Returns the delegate type name.
    #[must_use]
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Returns the number of callbacks in the invocation list.
    #[must_use]
    pub fn len(&self) -> usize {
        self.invocation_list.len()
    }

    /// Returns `true` if the invocation list is empty.
    ///
    /// Handlers built through the public API always hold at least one callback.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.invocation_list.is_empty()
    }

    /// Returns a handler whose invocation list is `self` followed by `other`.
    #[must_use]
    pub fn combine(&self, other: &Handler) -> Handler {
        let mut list = Vec::with_capacity(self.len() + other.len());
        list.extend(self.invocation_list.iter().cloned());
        list.extend(other.invocation_list.iter().cloned());
        Handler {
            type_name: self.type_name.clone(),
            invocation_list: list.into(),
        }
    }

    /// Returns a handler without the last contiguous occurrence of `other`'s invocation list.
    ///
    /// If `other` does not occur, the result is equal to `self`. If nothing remains after the
    /// removal, `None` is returned.
    #[must_use]
    pub fn remove(&self, other: &Handler) -> Option<Handler> {
        let haystack = &self.invocation_list;
        let needle = &other.invocation_list;

        if needle.is_empty() || needle.len() > haystack.len() {
            return Some(self.clone());
        }

        for start in (0..=haystack.len() - needle.len()).rev() {
            let window = &haystack[start..start + needle.len()];
            if window
                .iter()
                .zip(needle.iter())
                .all(|(a, b)| same_callback(a, b))
            {
                let remaining: Vec<Arc<HandlerFn>> = haystack[..start]
                    .iter()
                    .chain(haystack[start + needle.len()..].iter())
                    .cloned()
                    .collect();

                if remaining.is_empty() {
                    return None;
                }

                return Some(Handler {
                    type_name: self.type_name.clone(),
                    invocation_list: remaining.into(),
                });
            }
        }

        Some(self.clone())
    }

    /// Invokes every callback in order with `args`.
    ///
    /// # Errors
    ///
    /// Returns the first error produced by a callback; later callbacks are not invoked.
    pub fn invoke(&self, args: &[Value]) -> Result<()> {
        for callback in self.invocation_list.iter() {
            callback(args)?;
        }
        Ok(())
    }

    fn addresses(&self) -> impl Iterator<Item = usize> + '_ {
        self.invocation_list
            .iter()
            .map(|callback| Arc::as_ptr(callback) as *const () as usize)
    }
}

fn same_callback(a: &Arc<HandlerFn>, b: &Arc<HandlerFn>) -> bool {
    std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
}

impl PartialEq for Handler {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .invocation_list
                .iter()
                .zip(other.invocation_list.iter())
                .all(|(a, b)| same_callback(a, b))
    }
}

impl Eq for Handler {}

impl Hash for Handler {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for address in self.addresses() {
            address.hash(state);
        }
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handler")
            .field("type_name", &self.type_name)
            .field("len", &self.len())
            .finish()
    }
}
