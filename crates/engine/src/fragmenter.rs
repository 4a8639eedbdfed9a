//! Text normalization and fragment generation
//!
//! Pipeline: lowercase → delete apostrophes → non-alphanumerics to space
//!           → collapse space runs → trim
//!
//! Fragmentation expands one entity name into its suffix phrases, so a
//! query can match any word-aligned prefix of the full name without
//! per-character tries: "barack hussein obama" yields fragments
//! "barack hussein obama", "hussein obama", and "obama".

use std::fmt::Display;

use typeahead_core::Entry;

/// Normalize a raw string into canonical query/fragment form.
///
/// Rules, applied in order:
/// 1. lowercase;
/// 2. delete apostrophes (`'`) — elided, not replaced with a space;
/// 3. replace every other non-alphanumeric character with a space;
/// 4. collapse runs of spaces;
/// 5. trim leading and trailing spaces.
///
/// The output contains only `[0-9a-z ]`. Normalization is idempotent.
///
/// # Example
///
/// ```
/// use typeahead_engine::fragmenter::normalize;
///
/// assert_eq!(normalize(" Asdf  a.!f!"), "asdf a f");
/// assert_eq!(normalize("Asdf  a'f"), "asdf af");
/// ```
pub fn normalize(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut pending_space = false;
    for ch in raw.to_lowercase().chars() {
        if ch == '\'' {
            continue;
        }
        if ch.is_ascii_alphanumeric() {
            if pending_space && !out.is_empty() {
                out.push(' ');
            }
            pending_space = false;
            out.push(ch);
        } else {
            pending_space = true;
        }
    }
    out
}

/// Expand a normalized name into its suffix phrases, longest first.
///
/// `"st paul"` becomes `["st paul", "paul"]`. An empty name yields no
/// fragments, which makes the owning entry unreachable via autocomplete
/// (it can still be fetched by key).
pub fn suffix_phrases(name: &str) -> Vec<String> {
    if name.is_empty() {
        return Vec::new();
    }
    let words: Vec<&str> = name.split(' ').collect();
    (0..words.len()).map(|start| words[start..].join(" ")).collect()
}

/// Turns one entity into the set of normalized strings it should match
/// under, and canonicalizes query text the same way.
///
/// The index treats fragments opaquely beyond requiring each to be a
/// fixed point of `normalize`. Implementations may emit fragments the
/// name alone would not produce (synonyms, aliases).
pub trait Fragmenter<K, V>: Send + Sync {
    /// Canonicalize a query or fragment string.
    fn normalize(&self, raw: &str) -> String;

    /// Produce the fragments for an entry. Called once, at insertion.
    fn fragments(&self, entry: &Entry<K, V>) -> Vec<String>;
}

/// Default fragmenter: normalizes the entry value's display form and
/// emits its suffix phrases.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimpleFragmenter;

impl<K, V: Display> Fragmenter<K, V> for SimpleFragmenter {
    fn normalize(&self, raw: &str) -> String {
        normalize(raw)
    }

    fn fragments(&self, entry: &Entry<K, V>) -> Vec<String> {
        suffix_phrases(&normalize(&entry.value().to_string()))
    }
}
