//! Prefix result cache
//!
//! Caches ranked results for short normalized prefixes. Slots are
//! installed opportunistically on query misses and evicted eagerly,
//! *before* the triggering mutation becomes visible:
//!
//! - **rising score** (including a fresh insert): a slot is evicted when
//!   the entry could join or displace something at its target score —
//!   the slot is not full, or its lowest-ranked occupant scores no
//!   higher than the target.
//! - **falling score** (including removal): a slot is evicted when it
//!   contains the entry.
//!
//! Invalidation runs before the mutation becomes visible, so the cached
//! side is always judged under pre-change state. Empty result lists are
//! cached too; the rising rule evicts them as soon as a matching entry
//! appears.

use std::collections::HashMap;
use std::hash::Hash;

use tracing::trace;
use typeahead_core::{CacheConfig, Entry, Error, Result};

/// Coherent cache of ranked results keyed by normalized prefix.
pub(crate) struct PrefixCache<K, V> {
    max_prefix_len: usize,
    results_per_prefix: usize,
    slots: HashMap<String, Vec<Entry<K, V>>>,
}

impl<K, V> PrefixCache<K, V>
where
    K: Eq + Hash,
{
    pub(crate) fn new(config: CacheConfig) -> Self {
        Self {
            max_prefix_len: config.max_cache_prefix_len,
            results_per_prefix: config.num_cache_results,
            slots: HashMap::new(),
        }
    }

    /// Whether a (non-empty) normalized prefix is short enough to cache.
    pub(crate) fn is_cacheable(&self, prefix: &str) -> bool {
        // take(max + 1) keeps the length probe O(max) on long queries
        prefix.chars().take(self.max_prefix_len + 1).count() <= self.max_prefix_len
    }

    pub(crate) fn lookup(&self, prefix: &str) -> Option<&Vec<Entry<K, V>>> {
        self.slots.get(prefix)
    }

    /// Install a computed slot. Skipped when the scan's limit no longer
    /// covers the configured slot size or the prefix stopped being
    /// cacheable — both can happen when a parameter setter raced the
    /// scan, and a short slot would violate the cache contract.
    pub(crate) fn install(&mut self, prefix: &str, results: &[Entry<K, V>], computed_with: usize) {
        if computed_with < self.results_per_prefix || !self.is_cacheable(prefix) {
            return;
        }
        trace!(
            target: "typeahead::cache",
            prefix,
            results = results.len(),
            "slot installed"
        );
        self.slots.insert(prefix.to_owned(), results.to_vec());
    }

    /// Evict every slot the entry could join or displace within once
    /// its score reaches `rising_to` (for a fresh insert, its current
    /// score).
    ///
    /// Must run before the score is raised (or the entry published), so
    /// the cached worst is peeked under pre-change state. The
    /// displacement test itself uses the target score: a score jumping
    /// from below the cached worst to above it must evict, and the
    /// pre-change value cannot see that.
    pub(crate) fn invalidate_rising(&mut self, entry: &Entry<K, V>, rising_to: f64) {
        for fragment in entry.fragments() {
            for len in 1..=self.max_prefix_len {
                let Some(prefix) = char_prefix(fragment, len) else {
                    break;
                };
                let evict = match self.slots.get(prefix) {
                    Some(slot) => {
                        slot.len() < self.results_per_prefix
                            || slot.last().is_some_and(|worst| worst.score() <= rising_to)
                    }
                    None => false,
                };
                if evict {
                    trace!(target: "typeahead::cache", prefix, "slot evicted (rising)");
                    self.slots.remove(prefix);
                }
            }
        }
    }

    /// Evict every slot that contains the entry.
    ///
    /// Must run before the score is lowered (or the entry removed), so
    /// membership is judged under the pre-change ranking.
    pub(crate) fn invalidate_falling(&mut self, entry: &Entry<K, V>) {
        for fragment in entry.fragments() {
            for len in 1..=self.max_prefix_len {
                let Some(prefix) = char_prefix(fragment, len) else {
                    break;
                };
                let evict = self
                    .slots
                    .get(prefix)
                    .is_some_and(|slot| slot.iter().any(|c| c.key() == entry.key()));
                if evict {
                    trace!(target: "typeahead::cache", prefix, "slot evicted (falling)");
                    self.slots.remove(prefix);
                }
            }
        }
    }

    pub(crate) fn max_prefix_len(&self) -> usize {
        self.max_prefix_len
    }

    /// Change the cacheable prefix length. Clears every slot.
    pub(crate) fn set_max_prefix_len(&mut self, len: usize) {
        self.max_prefix_len = len;
        self.slots.clear();
    }

    pub(crate) fn results_per_prefix(&self) -> usize {
        self.results_per_prefix
    }

    /// Change the slot size. Clears every slot.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] for 0; the old value stays.
    pub(crate) fn set_results_per_prefix(&mut self, count: usize) -> Result<()> {
        if count == 0 {
            return Err(Error::invalid_config("num_cache_results must be at least 1"));
        }
        self.results_per_prefix = count;
        self.slots.clear();
        Ok(())
    }

    pub(crate) fn clear(&mut self) {
        self.slots.clear();
    }

    #[cfg(test)]
    fn slot_count(&self) -> usize {
        self.slots.len()
    }
}

/// First `len` characters of `text`, or `None` when `text` is shorter.
/// Counts codepoints, not bytes, so fragments from custom fragmenters
/// never split a character.
fn char_prefix(text: &str, len: usize) -> Option<&str> {
    let mut seen = 0;
    for (offset, _) in text.char_indices() {
        if seen == len {
            return Some(&text[..offset]);
        }
        seen += 1;
    }
    (seen == len).then_some(text)
}
