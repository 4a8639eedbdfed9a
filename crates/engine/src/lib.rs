//! Autocomplete engine: fragment expansion, prefix range scans, scored
//! ranking, and a coherent short-prefix result cache
//!
//! This crate provides:
//! - [`AutocompleteIndex`]: the thread-safe index façade
//! - [`Fragmenter`] / [`SimpleFragmenter`]: the normalization and
//!   fragment-generation seam
//! - Re-exports of the record and error types from `typeahead-core`
//!
//! # Design
//!
//! One entity registers under the suffix phrases of its normalized name
//! ("barack hussein obama" also answers for "hussein obama" and
//! "obama"). Queries normalize the same way, range-scan the ordered
//! fragment set, and keep the top results under the rank order (score
//! descending, ties to the lower key). Results for one- and
//! two-character queries — the expensive ones — are cached and kept
//! coherent by evicting affected slots before any mutation that could
//! change them becomes visible.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod cache;
mod fragments;
mod ranking;
mod store;

pub mod fragmenter;
pub mod index;

pub use fragmenter::{normalize, Fragmenter, SimpleFragmenter};
pub use index::AutocompleteIndex;
pub use typeahead_core::{
    CacheConfig, Entry, Error, Result, DEFAULT_MAX_CACHE_PREFIX_LEN, DEFAULT_NUM_CACHE_RESULTS,
};
