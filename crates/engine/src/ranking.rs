//! Bounded top-K selection under the rank order
//!
//! Walks a fragment range scan and keeps the best `limit` entries,
//! ordered by score descending then key ascending, de-duplicated by key
//! (different fragments of the same entity must not produce duplicate
//! results).
//!
//! Scores are captured at offer time. The set's internal order is fixed
//! from the captured values, so a concurrent-looking score mutation can
//! never corrupt the tree — the façade additionally serializes score
//! writes against scans.

use std::cmp::Ordering;
use std::collections::{BTreeSet, HashSet};
use std::hash::Hash;

use typeahead_core::Entry;

/// One candidate with its score pinned at offer time.
struct RankedEntry<K, V> {
    score: f64,
    entry: Entry<K, V>,
}

impl<K: Ord, V> Ord for RankedEntry<K, V> {
    fn cmp(&self, other: &Self) -> Ordering {
        // Less = ranks earlier: higher score first, then lower key
        other
            .score
            .total_cmp(&self.score)
            .then_with(|| self.entry.key().cmp(other.entry.key()))
    }
}

impl<K: Ord, V> PartialOrd for RankedEntry<K, V> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<K: Ord, V> PartialEq for RankedEntry<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<K: Ord, V> Eq for RankedEntry<K, V> {}

/// Bounded ordered set of the best entries seen so far.
pub(crate) struct RankedSet<K, V> {
    limit: usize,
    ranked: BTreeSet<RankedEntry<K, V>>,
    members: HashSet<K>,
}

impl<K, V> RankedSet<K, V>
where
    K: Ord + Eq + Hash + Clone,
{
    pub(crate) fn new(limit: usize) -> Self {
        Self {
            limit,
            ranked: BTreeSet::new(),
            members: HashSet::new(),
        }
    }

    /// Consider one scanned entry. Duplicates by key are skipped; once
    /// the set is full, an entry only enters by outranking the current
    /// worst, which is then evicted.
    pub(crate) fn offer(&mut self, entry: &Entry<K, V>) {
        if self.limit == 0 || self.members.contains(entry.key()) {
            return;
        }
        let candidate = RankedEntry {
            score: entry.score(),
            entry: entry.clone(),
        };
        if self.ranked.len() < self.limit {
            self.members.insert(entry.key().clone());
            self.ranked.insert(candidate);
            return;
        }
        let outranks_worst = match self.ranked.last() {
            Some(worst) => candidate < *worst,
            None => true,
        };
        if outranks_worst {
            if let Some(worst) = self.ranked.pop_last() {
                self.members.remove(worst.entry.key());
            }
            self.members.insert(entry.key().clone());
            self.ranked.insert(candidate);
        }
    }

    /// The retained entries in rank order, best first.
    pub(crate) fn into_sorted_vec(self) -> Vec<Entry<K, V>> {
        self.ranked.into_iter().map(|r| r.entry).collect()
    }
}
