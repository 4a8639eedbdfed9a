//! Entry: the shared record for one indexed entity
//!
//! ## Design
//!
//! An `Entry` is a cheaply cloneable handle (`Arc` internally) over one
//! immutable (key, value) pair plus two pieces of controlled mutability:
//!
//! - **score**: an `f64` stored as atomic bits. The index mutates it only
//!   while holding its fragment-index lock exclusively, so concurrent
//!   range scans observe either the old or the new value, never a torn
//!   one.
//! - **fragments**: the normalized match strings, bound exactly once when
//!   the entry is first inserted into an index and frozen thereafter.
//!   Changing an entry's value requires remove + insert.
//!
//! Handles returned from queries stay valid for as long as the caller
//! holds them; removing the entry from the index drops the index's
//! reference, not the caller's.

use std::cmp::Ordering;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::{Arc, OnceLock};

struct EntryInner<K, V> {
    key: K,
    value: V,
    /// f64 bit pattern; see [`Entry::score`]
    score: AtomicU64,
    /// Bound once by the index at insertion; empty until then
    fragments: OnceLock<Box<[Arc<str>]>>,
}

/// Shared record for one indexed entity: key, value, mutable score, and
/// the frozen fragment list.
///
/// Cloning is cheap (reference count bump) and all clones observe the
/// same score.
pub struct Entry<K, V> {
    inner: Arc<EntryInner<K, V>>,
}

impl<K, V> Clone for Entry<K, V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<K, V> Entry<K, V> {
    /// Create an entry with the initial score of 0.
    pub fn new(key: K, value: V) -> Self {
        Self::with_score(key, value, 0.0)
    }

    /// Create an entry with an explicit initial score.
    pub fn with_score(key: K, value: V, score: f64) -> Self {
        Self {
            inner: Arc::new(EntryInner {
                key,
                value,
                score: AtomicU64::new(score.to_bits()),
                fragments: OnceLock::new(),
            }),
        }
    }

    /// The entry's key.
    pub fn key(&self) -> &K {
        &self.inner.key
    }

    /// The entry's payload.
    pub fn value(&self) -> &V {
        &self.inner.value
    }

    /// The entry's current score. Higher scores rank earlier.
    pub fn score(&self) -> f64 {
        f64::from_bits(self.inner.score.load(AtomicOrdering::Acquire))
    }

    /// The score rounded to the nearest integer.
    ///
    /// Useful when the score is a frequency, as it commonly is.
    pub fn score_as_int(&self) -> i64 {
        self.score().round() as i64
    }

    /// Overwrite the score.
    ///
    /// Once the entry is in an index, score changes MUST go through the
    /// index (`set_score` / `increment` / `decrement`) so that cached
    /// results are invalidated first. Calling this directly on an
    /// indexed entry leaves the cache stale.
    pub fn set_score(&self, score: f64) {
        self.inner.score.store(score.to_bits(), AtomicOrdering::Release);
    }

    /// The frozen fragment list. Empty until the entry is inserted into
    /// an index.
    pub fn fragments(&self) -> &[Arc<str>] {
        self.inner.fragments.get().map(|f| &**f).unwrap_or(&[])
    }

    /// Bind the fragment list. The first call wins; later calls are
    /// ignored and return `false`.
    ///
    /// Called by the index at insertion. An entry that was removed and
    /// re-inserted keeps its original fragments, which is sound because
    /// the value they were derived from is immutable.
    pub fn bind_fragments(&self, fragments: Vec<String>) -> bool {
        let frozen: Box<[Arc<str>]> = fragments.into_iter().map(Arc::from).collect();
        self.inner.fragments.set(frozen).is_ok()
    }

    /// Rank comparison: score descending, then key ascending.
    ///
    /// This is a total order over entries with distinct keys, which the
    /// index relies on for deterministic result ordering.
    pub fn cmp_by_rank(&self, other: &Self) -> Ordering
    where
        K: Ord,
    {
        other
            .score()
            .total_cmp(&self.score())
            .then_with(|| self.key().cmp(other.key()))
    }
}

impl<K: fmt::Debug, V> fmt::Debug for Entry<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entry")
            .field("key", self.key())
            .field("score", &self.score())
            .field("fragments", &self.fragments().len())
            .finish_non_exhaustive()
    }
}

impl<K: fmt::Display, V: fmt::Display> fmt::Display for Entry<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "entry ({}, {}) with score {}",
            self.key(),
            self.value(),
            self.score()
        )
    }
}

#[cfg(feature = "serde")]
mod serde_support {
    use super::Entry;
    use serde::de::{Deserialize, Deserializer};
    use serde::ser::{Serialize, SerializeStruct, Serializer};

    /// Entries serialize as the (key, value, score) triple. Fragments
    /// are recomputed when the entry is re-inserted into an index.
    impl<K: Serialize, V: Serialize> Serialize for Entry<K, V> {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            let mut state = serializer.serialize_struct("Entry", 3)?;
            state.serialize_field("key", self.key())?;
            state.serialize_field("value", self.value())?;
            state.serialize_field("score", &self.score())?;
            state.end()
        }
    }

    impl<'de, K: Deserialize<'de>, V: Deserialize<'de>> Deserialize<'de> for Entry<K, V> {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            #[derive(serde::Deserialize)]
            struct Repr<K, V> {
                key: K,
                value: V,
                #[serde(default)]
                score: f64,
            }
            let repr = Repr::<K, V>::deserialize(deserializer)?;
            Ok(Entry::with_score(repr.key, repr.value, repr.score))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_starts_at_zero() {
        let entry = Entry::new(1, "Chicago");
        assert_eq!(entry.score(), 0.0);
        assert_eq!(*entry.key(), 1);
        assert_eq!(*entry.value(), "Chicago");
    }

    #[test]
    fn test_with_score() {
        let entry = Entry::with_score(1, "Chicago", 2.5);
        assert_eq!(entry.score(), 2.5);
        assert_eq!(entry.score_as_int(), 3);
    }

    #[test]
    fn test_clones_share_score() {
        let entry = Entry::new(1, "Chicago");
        let other = entry.clone();
        entry.set_score(4.0);
        assert_eq!(other.score(), 4.0);
    }

    #[test]
    fn test_fragments_empty_until_bound() {
        let entry = Entry::new(1, "Chicago");
        assert!(entry.fragments().is_empty());
    }

    #[test]
    fn test_bind_fragments_first_call_wins() {
        let entry = Entry::new(7, "St. Paul");
        assert!(entry.bind_fragments(vec!["st paul".into(), "paul".into()]));
        assert!(!entry.bind_fragments(vec!["other".into()]));

        let texts: Vec<&str> = entry.fragments().iter().map(|f| f.as_ref()).collect();
        assert_eq!(texts, vec!["st paul", "paul"]);
    }

    #[test]
    fn test_rank_prefers_higher_score() {
        let high = Entry::with_score(2, "b", 5.0);
        let low = Entry::with_score(1, "a", 1.0);
        assert_eq!(high.cmp_by_rank(&low), Ordering::Less);
        assert_eq!(low.cmp_by_rank(&high), Ordering::Greater);
    }

    #[test]
    fn test_rank_ties_break_on_key() {
        let first = Entry::with_score(1, "a", 3.0);
        let second = Entry::with_score(2, "b", 3.0);
        assert_eq!(first.cmp_by_rank(&second), Ordering::Less);
        assert_eq!(first.cmp_by_rank(&first), Ordering::Equal);
    }

    #[test]
    fn test_display() {
        let entry = Entry::with_score(3, "Boston", 1.0);
        assert_eq!(entry.to_string(), "entry (3, Boston) with score 1");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_round_trip_drops_fragments() {
        let entry = Entry::with_score(7, "St. Paul".to_string(), 2.0);
        entry.bind_fragments(vec!["st paul".into(), "paul".into()]);

        let json = serde_json::to_string(&entry).unwrap();
        assert_eq!(json, r#"{"key":7,"value":"St. Paul","score":2.0}"#);

        let restored: Entry<u32, String> = serde_json::from_str(&json).unwrap();
        assert_eq!(*restored.key(), 7);
        assert_eq!(restored.value(), "St. Paul");
        assert_eq!(restored.score(), 2.0);
        // Fragments are rebuilt on insertion, not carried in the wire form
        assert!(restored.fragments().is_empty());
    }
}
