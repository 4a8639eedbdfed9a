//! Entry store: the authoritative key → entry mapping
//!
//! Owns the canonical set of entries. The fragment index and the prefix
//! cache hold shared handles whose records must always resolve to an
//! entry present here; the façade maintains that invariant by mutating
//! this store first (and under its lock) on every write.

use std::collections::HashMap;
use std::hash::Hash;

use typeahead_core::Entry;

/// Authoritative mapping from key to entry record.
pub(crate) struct EntryStore<K, V> {
    entries: HashMap<K, Entry<K, V>>,
}

impl<K, V> EntryStore<K, V> {
    pub(crate) fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Defensive copy of the current entry set, independent of any
    /// later mutation. Handles are shared, so scores stay live.
    pub(crate) fn snapshot(&self) -> Vec<Entry<K, V>> {
        self.entries.values().cloned().collect()
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}

impl<K, V> EntryStore<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Install an entry. The façade checks for duplicates first, under
    /// the same write lock.
    pub(crate) fn insert(&mut self, entry: Entry<K, V>) {
        self.entries.insert(entry.key().clone(), entry);
    }

    pub(crate) fn get(&self, key: &K) -> Option<&Entry<K, V>> {
        self.entries.get(key)
    }

    pub(crate) fn contains(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    /// Remove and return the entry so the caller can retire its
    /// fragment records and cache slots.
    pub(crate) fn remove(&mut self, key: &K) -> Option<Entry<K, V>> {
        self.entries.remove(key)
    }
}
