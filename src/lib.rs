//! # Typeahead
//!
//! An in-memory autocomplete index. Given a short textual prefix, it
//! returns the top-K matching entries ordered by score (higher first,
//! ties to the lower key), with sub-millisecond lookups over tens of
//! thousands of entries.
//!
//! Entities register under the suffix phrases of their normalized name,
//! so *"Barack Hussein Obama"* resolves for prefixes of
//! *"barack hussein obama"*, *"hussein obama"*, and *"obama"*. Results
//! for one- and two-character queries are cached and kept coherent
//! across concurrent mutations.
//!
//! # Quick Start
//!
//! ```
//! use typeahead::AutocompleteIndex;
//!
//! fn main() -> typeahead::Result<()> {
//!     let index: AutocompleteIndex<u32, String> = AutocompleteIndex::new();
//!     index.add(1, "Chicago".to_string());
//!     index.add(2, "Minneapolis".to_string());
//!     index.add(7, "St. Paul".to_string());
//!
//!     index.increment(&7)?; // bump St. Paul's score by 1
//!
//!     // Matches the interior word "paul" as well as "st paul"
//!     let results = index.autocomplete("pau", 10);
//!     assert_eq!(*results[0].key(), 7);
//!
//!     // Ranked: St. Paul's score of 1 puts it ahead on shared prefixes
//!     let results = index.autocomplete("s", 10);
//!     assert_eq!(*results[0].key(), 7);
//!
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! [`AutocompleteIndex`] is the entry point. It coordinates an entry
//! store (key → record), an ordered fragment index (prefix range
//! scans), and a short-prefix result cache, under a fixed lock order.
//! Internal layering lives in `typeahead-engine` and `typeahead-core`;
//! only the surface re-exported here is stable.

// Re-export the public API from typeahead-engine
pub use typeahead_engine::*;
