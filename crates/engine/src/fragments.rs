//! Fragment index: ordered (fragment text, entry) records with prefix
//! range scans
//!
//! ## Structure
//!
//! A two-level ordered map: fragment text → (key → entry). Iteration
//! order is therefore lexicographic on text, then key ascending. The
//! score deliberately does not participate in this order; ranking is
//! applied at query time, so score changes never restructure the index.
//!
//! ## Range construction
//!
//! Matches for prefix `p` are exactly the records with
//! `p <= text < succ(p)`, where `succ(p)` replaces the last codepoint
//! with its successor. When no successor exists (the last codepoint is
//! the maximum scalar value) the scan walks the open upper range and
//! stops at the first non-matching text.

use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::Arc;

use typeahead_core::Entry;

/// Ordered set of (fragment text, entry) records supporting prefix
/// range scans.
pub(crate) struct FragmentIndex<K, V> {
    by_text: BTreeMap<Arc<str>, BTreeMap<K, Entry<K, V>>>,
    records: usize,
}

impl<K, V> FragmentIndex<K, V> {
    pub(crate) fn new() -> Self {
        Self {
            by_text: BTreeMap::new(),
            records: 0,
        }
    }

    pub(crate) fn clear(&mut self) {
        self.by_text.clear();
        self.records = 0;
    }

    /// Total number of (text, entry) records.
    pub(crate) fn len(&self) -> usize {
        self.records
    }
}

impl<K, V> FragmentIndex<K, V>
where
    K: Ord + Clone,
{
    /// Publish one record per fragment of the entry.
    pub(crate) fn insert_entry(&mut self, entry: &Entry<K, V>) {
        for fragment in entry.fragments() {
            let per_text = self.by_text.entry(Arc::clone(fragment)).or_default();
            if per_text.insert(entry.key().clone(), entry.clone()).is_none() {
                self.records += 1;
            }
        }
    }

    /// Retire every record belonging to the entry.
    pub(crate) fn remove_entry(&mut self, entry: &Entry<K, V>) {
        for fragment in entry.fragments() {
            if let Some(per_text) = self.by_text.get_mut(&**fragment) {
                if per_text.remove(entry.key()).is_some() {
                    self.records -= 1;
                }
                if per_text.is_empty() {
                    self.by_text.remove(&**fragment);
                }
            }
        }
    }

    /// Visit every record whose text starts with `prefix`, in (text,
    /// key) order. `prefix` must be non-empty.
    pub(crate) fn for_each_match<F>(&self, prefix: &str, mut visit: F)
    where
        F: FnMut(&Entry<K, V>),
    {
        let upper = successor(prefix);
        let bounds: (Bound<&str>, Bound<&str>) = match upper.as_deref() {
            Some(hi) => (Bound::Included(prefix), Bound::Excluded(hi)),
            None => (Bound::Included(prefix), Bound::Unbounded),
        };
        let open_ended = upper.is_none();
        for (text, per_text) in self.by_text.range::<str, _>(bounds) {
            // Matching texts form one contiguous block in the order.
            if open_ended && !text.starts_with(prefix) {
                break;
            }
            for entry in per_text.values() {
                visit(entry);
            }
        }
    }
}

/// Smallest string strictly greater than every extension of `prefix`:
/// the prefix with its last codepoint bumped to the next valid scalar.
///
/// Returns `None` for an empty prefix or when the last codepoint has no
/// successor, in which case the caller scans the open upper range.
pub(crate) fn successor(prefix: &str) -> Option<String> {
    let last = prefix.chars().next_back()?;
    // from_u32 skips the surrogate gap for us
    let next = (last as u32 + 1..=char::MAX as u32).find_map(char::from_u32)?;
    let mut upper = String::with_capacity(prefix.len());
    upper.push_str(&prefix[..prefix.len() - last.len_utf8()]);
    upper.push(next);
    Some(upper)
}
