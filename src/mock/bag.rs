//! Typed, optionally keyed instance state with compare-and-swap updates.

use std::{
    any::{Any, TypeId},
    fmt,
    sync::Arc,
};

use dashmap::{mapref::entry::Entry as Slot, DashMap};

type Key = (TypeId, Option<String>);
type Entry = Arc<dyn Any + Send + Sync>;

fn key<T: Any>(name: Option<&str>) -> Key {
    (TypeId::of::<T>(), name.map(str::to_owned))
}

fn downcast<T: Any + Send + Sync>(entry: Entry) -> Arc<T> {
    match entry.downcast::<T>() {
        Ok(value) => value,
        Err(_) => unreachable!("state bag entries are keyed by their own type"),
    }
}

fn same<T: Any>(entry: &Entry, expected: &Arc<T>) -> bool {
    std::ptr::addr_eq(Arc::as_ptr(entry), Arc::as_ptr(expected))
}

/// Thread-safe storage for behaviors that need per-instance state.
///
/// Entries are addressed by their type and an optional name, so different behaviors never
/// collide and one behavior can keep several entries of the same type (one per event, for
/// example). Values are shared as `Arc<T>`; "expected previous value" checks compare by
/// `Arc` identity.
///
/// The bag only offers single-shot primitives. Callers that need an atomic read-modify-write
/// run their own retry loop around [`try_update`](Self::try_update).
///
/// # Examples
///
/// ```rust,ignore
/// let bag = StateBag::new();
/// let current = bag.get_or_add::<i32, _>(Some("calls"), || 0);
/// assert!(bag.try_update(Some("calls"), Arc::new(*current + 1), &current));
/// assert!(!bag.try_update(Some("calls"), Arc::new(5), &current));
/// ```
#[derive(Default)]
pub struct StateBag {
    entries: DashMap<Key, Entry>,
}

impl StateBag {
    /// Creates an empty bag.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the entry of type `T` stored under `name`.
    #[must_use]
    pub fn get<T: Any + Send + Sync>(&self, name: Option<&str>) -> Option<Arc<T>> {
        self.entries
            .get(&key::<T>(name))
            .map(|entry| downcast(entry.value().clone()))
    }

    /// Returns the entry of type `T` stored under `name`, adding the result of `create` if
    /// there is none.
    pub fn get_or_add<T, F>(&self, name: Option<&str>, create: F) -> Arc<T>
    where
        T: Any + Send + Sync,
        F: FnOnce() -> T,
    {
        let entry = self
            .entries
            .entry(key::<T>(name))
            .or_insert_with(|| {
                let value: Entry = Arc::new(create());
                value
            })
            .value()
            .clone();
        downcast(entry)
    }

    /// Stores `value` under `name` unless an entry of type `T` already exists there.
    ///
    /// Returns `true` if the value was added.
    pub fn try_add<T: Any + Send + Sync>(&self, name: Option<&str>, value: Arc<T>) -> bool {
        match self.entries.entry(key::<T>(name)) {
            Slot::Occupied(_) => false,
            Slot::Vacant(vacant) => {
                let value: Entry = value;
                vacant.insert(value);
                true
            }
        }
    }

    /// Replaces the entry under `name` with `value` if it is still `expected`.
    ///
    /// Returns `false` if the entry is missing or was replaced by someone else.
    pub fn try_update<T: Any + Send + Sync>(
        &self,
        name: Option<&str>,
        value: Arc<T>,
        expected: &Arc<T>,
    ) -> bool {
        let Some(mut current) = self.entries.get_mut(&key::<T>(name)) else {
            return false;
        };

        if !same(current.value(), expected) {
            return false;
        }

        let value: Entry = value;
        *current = value;
        true
    }

    /// Removes and returns the entry of type `T` stored under `name`.
    pub fn try_remove<T: Any + Send + Sync>(&self, name: Option<&str>) -> Option<Arc<T>> {
        self.entries
            .remove(&key::<T>(name))
            .map(|(_, entry)| downcast(entry))
    }

    /// Removes the entry under `name` if it is still `expected`.
    ///
    /// Returns `true` if the entry was removed.
    pub fn try_remove_if<T: Any + Send + Sync>(&self, name: Option<&str>, expected: &Arc<T>) -> bool {
        self.entries
            .remove_if(&key::<T>(name), |_, current| same(current, expected))
            .is_some()
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the bag holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for StateBag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateBag")
            .field("entries", &self.entries.len())
            .finish()
    }
}
