//! The autocomplete index façade
//!
//! Coordinates the three components behind one handle:
//!
//! - entry store: authoritative key → entry records
//! - fragment index: ordered (text, entry) records for prefix scans
//! - prefix cache: ranked results for short normalized queries
//!
//! ## Locking
//!
//! Each component sits behind its own `parking_lot::RwLock`. Writers
//! acquire store → fragments → cache, in that order, and hold all
//! acquired locks through the entire mutation, including cache
//! invalidation. Queries never touch the store: fragment records only
//! ever reference live entries because writers retire them under the
//! same lock order before an entry disappears.
//!
//! A query that misses the cache keeps its fragment-index read lock
//! until the computed slot is installed. Any writer whose mutation
//! could invalidate that slot must first take the fragment-index write
//! lock, so an invalidation can never slip between a scan and the
//! install of that scan's results.
//!
//! Scores are read with single atomic loads and mutated only while the
//! fragment-index write lock is held, so a scan observes each entry's
//! score either before or after a concurrent update, never mid-flight.

use std::cmp::Ordering;
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, trace};
use typeahead_core::{CacheConfig, Entry, Error, Result};

use crate::cache::PrefixCache;
use crate::fragmenter::{Fragmenter, SimpleFragmenter};
use crate::fragments::FragmentIndex;
use crate::ranking::RankedSet;
use crate::store::EntryStore;

/// In-memory autocomplete index: prefix lookups over fragment-expanded
/// names, ranked by score with deterministic tie-breaking.
///
/// Entries carry a key, an opaque value, and a mutable score. The
/// index expands each entry's name into suffix-phrase fragments at
/// insertion, so any word-aligned prefix of the name matches.
///
/// All operations are safe to call from multiple threads; each runs to
/// completion on the calling thread and is linearizable against every
/// other operation.
///
/// # Example
///
/// ```
/// use typeahead_engine::AutocompleteIndex;
///
/// let index: AutocompleteIndex<u32, &str> = AutocompleteIndex::new();
/// index.add(1, "Chicago");
/// index.add(6, "Charleston");
///
/// let results = index.autocomplete("chi", 10);
/// assert_eq!(results.len(), 1);
/// assert_eq!(*results[0].key(), 1);
/// ```
pub struct AutocompleteIndex<K, V> {
    fragmenter: Arc<dyn Fragmenter<K, V>>,
    store: RwLock<EntryStore<K, V>>,
    fragments: RwLock<FragmentIndex<K, V>>,
    cache: RwLock<PrefixCache<K, V>>,
}

impl<K, V> AutocompleteIndex<K, V>
where
    K: Ord + Eq + Hash + Clone + fmt::Debug,
{
    /// Create an index with the default fragmenter and configuration.
    pub fn new() -> Self
    where
        V: fmt::Display,
    {
        Self::build(Arc::new(SimpleFragmenter), CacheConfig::default())
    }

    /// Create an index with the default fragmenter and an explicit
    /// cache configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if the configuration is
    /// unusable.
    pub fn with_config(config: CacheConfig) -> Result<Self>
    where
        V: fmt::Display,
    {
        config.validate()?;
        Ok(Self::build(Arc::new(SimpleFragmenter), config))
    }

    /// Create an index with a custom fragmenter.
    pub fn with_fragmenter(fragmenter: impl Fragmenter<K, V> + 'static) -> Self {
        Self::build(Arc::new(fragmenter), CacheConfig::default())
    }

    /// Create an index with a custom fragmenter and configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if the configuration is
    /// unusable.
    pub fn with_fragmenter_and_config(
        fragmenter: impl Fragmenter<K, V> + 'static,
        config: CacheConfig,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(Arc::new(fragmenter), config))
    }

    fn build(fragmenter: Arc<dyn Fragmenter<K, V>>, config: CacheConfig) -> Self {
        Self {
            fragmenter,
            store: RwLock::new(EntryStore::new()),
            fragments: RwLock::new(FragmentIndex::new()),
            cache: RwLock::new(PrefixCache::new(config)),
        }
    }

    // ========================================================================
    // Mutations
    // ========================================================================

    /// Insert a pre-built entry. Silent no-op if the key is already
    /// present — the first entry wins.
    ///
    /// Fragments are computed and frozen here. An entry that was
    /// removed from an index and re-inserted keeps its original frozen
    /// fragments.
    pub fn insert(&self, entry: Entry<K, V>) {
        let mut store = self.store.write();
        if store.contains(entry.key()) {
            trace!(target: "typeahead::index", key = ?entry.key(), "duplicate insert ignored");
            return;
        }
        let mut raw = self.fragmenter.fragments(&entry);
        raw.retain(|fragment| !fragment.is_empty());
        entry.bind_fragments(raw);
        store.insert(entry.clone());

        let mut fragments = self.fragments.write();
        fragments.insert_entry(&entry);

        let mut cache = self.cache.write();
        cache.invalidate_rising(&entry, entry.score());
        trace!(
            target: "typeahead::index",
            key = ?entry.key(),
            fragments = entry.fragments().len(),
            "entry indexed"
        );
    }

    /// Insert a new entry with score 0.
    pub fn add(&self, key: K, value: V) {
        self.insert(Entry::new(key, value));
    }

    /// Insert a new entry with an explicit initial score.
    pub fn add_with_score(&self, key: K, value: V, score: f64) {
        self.insert(Entry::with_score(key, value, score));
    }

    /// Remove the entry for `key` along with all of its fragment
    /// records and cache slots. Silent no-op for unknown keys.
    pub fn remove(&self, key: &K) {
        let mut store = self.store.write();
        let Some(entry) = store.remove(key) else {
            return;
        };
        let mut fragments = self.fragments.write();
        fragments.remove_entry(&entry);

        let mut cache = self.cache.write();
        cache.invalidate_falling(&entry);
        trace!(target: "typeahead::index", key = ?entry.key(), "entry removed");
    }

    /// Atomically empty the index: entries, fragment records, and
    /// cache.
    pub fn clear(&self) {
        let mut store = self.store.write();
        let mut fragments = self.fragments.write();
        let mut cache = self.cache.write();
        let entries = store.len();
        store.clear();
        fragments.clear();
        cache.clear();
        debug!(target: "typeahead::index", entries, "index cleared");
    }

    /// Set the score for `key`.
    ///
    /// Affected cache slots are evicted before the new score becomes
    /// visible, so cached rankings never go stale.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownKey`] if the key is not present; no
    /// state changes.
    pub fn set_score(&self, key: &K, score: f64) -> Result<()> {
        self.update_score(key, |_| score)
    }

    /// Add 1 to the score for `key`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownKey`] if the key is not present.
    pub fn increment(&self, key: &K) -> Result<()> {
        self.update_score(key, |score| score + 1.0)
    }

    /// Subtract 1 from the score for `key`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownKey`] if the key is not present.
    pub fn decrement(&self, key: &K) -> Result<()> {
        self.update_score(key, |score| score - 1.0)
    }

    fn update_score<F>(&self, key: &K, compute: F) -> Result<()>
    where
        F: FnOnce(f64) -> f64,
    {
        let store = self.store.write();
        let entry = match store.get(key) {
            Some(entry) => entry.clone(),
            None => return Err(Error::unknown_key(key)),
        };

        // Scans rank under the live score; excluding them for the
        // duration of the change keeps every scan pre- or post-state.
        let _scan_guard = self.fragments.write();
        let mut cache = self.cache.write();

        let current = entry.score();
        let target = compute(current);
        match target.partial_cmp(&current) {
            Some(Ordering::Greater) => cache.invalidate_rising(&entry, target),
            Some(Ordering::Less) => cache.invalidate_falling(&entry),
            _ => {}
        }
        entry.set_score(target);
        trace!(
            target: "typeahead::index",
            key = ?entry.key(),
            from = current,
            to = target,
            "score updated"
        );
        Ok(())
    }

    // ========================================================================
    // Reads
    // ========================================================================

    /// The entry for `key`, if present.
    pub fn get(&self, key: &K) -> Option<Entry<K, V>> {
        self.store.read().get(key).cloned()
    }

    /// Whether an entry exists for `key`.
    pub fn contains(&self, key: &K) -> bool {
        self.store.read().contains(key)
    }

    /// A defensive snapshot of all entries, independent of later
    /// mutations. Suitable for serialization by a persistence layer;
    /// reload via [`clear`](Self::clear) plus repeated
    /// [`insert`](Self::insert).
    pub fn entries(&self) -> Vec<Entry<K, V>> {
        self.store.read().snapshot()
    }

    /// Number of entries in the index.
    pub fn len(&self) -> usize {
        self.store.read().len()
    }

    /// Whether the index holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The top `max_results` entries with a fragment starting with the
    /// normalized query, ranked by score descending then key ascending.
    ///
    /// A query that normalizes to the empty string returns no results.
    /// Returned handles stay valid regardless of later mutations.
    pub fn autocomplete(&self, query: &str, max_results: usize) -> Vec<Entry<K, V>> {
        let prefix = self.fragmenter.normalize(query);
        if prefix.is_empty() {
            return Vec::new();
        }

        let mut limit = max_results;
        let mut cacheable = false;
        {
            let cache = self.cache.read();
            if cache.is_cacheable(&prefix) {
                if let Some(slot) = cache.lookup(&prefix) {
                    let mut results = slot.clone();
                    results.truncate(max_results);
                    return results;
                }
                cacheable = true;
                // Compute enough results to serve any later request
                // from the slot we are about to fill.
                limit = max_results.max(cache.results_per_prefix());
            }
        }

        let fragments = self.fragments.read();
        let mut ranked = RankedSet::new(limit);
        fragments.for_each_match(&prefix, |entry| ranked.offer(entry));
        let mut results = ranked.into_sorted_vec();

        if cacheable {
            // Still under the fragment-index read lock: writers cannot
            // invalidate between the scan above and this install.
            self.cache.write().install(&prefix, &results, limit);
        }
        drop(fragments);

        results.truncate(max_results);
        results
    }

    // ========================================================================
    // Cache parameters
    // ========================================================================

    /// Maximum normalized-query length served from the cache.
    pub fn max_cache_prefix_len(&self) -> usize {
        self.cache.read().max_prefix_len()
    }

    /// Set the maximum cached prefix length. 0 disables caching.
    /// Clears the cache.
    pub fn set_max_cache_prefix_len(&self, len: usize) {
        self.cache.write().set_max_prefix_len(len);
        debug!(target: "typeahead::cache", max_prefix_len = len, "cache reconfigured");
    }

    /// Number of ranked results retained per cached prefix.
    pub fn num_cache_results(&self) -> usize {
        self.cache.read().results_per_prefix()
    }

    /// Set the per-prefix slot size. Clears the cache.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] for 0; the old value stays in
    /// effect.
    pub fn set_num_cache_results(&self, count: usize) -> Result<()> {
        self.cache.write().set_results_per_prefix(count)?;
        debug!(target: "typeahead::cache", num_cache_results = count, "cache reconfigured");
        Ok(())
    }
}

impl<K, V> Default for AutocompleteIndex<K, V>
where
    K: Ord + Eq + Hash + Clone + fmt::Debug,
    V: fmt::Display,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K: fmt::Debug, V> fmt::Debug for AutocompleteIndex<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AutocompleteIndex")
            .field("entries", &self.store.read().len())
            .field("fragment_records", &self.fragments.read().len())
            .finish_non_exhaustive()
    }
}
