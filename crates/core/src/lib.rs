//! Core types for the typeahead autocomplete index
//!
//! This crate defines the foundational types shared across the system:
//! - Entry: the shared record for one indexed entity (key, value,
//!   mutable score, frozen fragment list)
//! - Error / Result: the typed error surface
//! - CacheConfig: parameters for the short-prefix result cache
//!
//! The index itself lives in `typeahead-engine`; this crate stays free
//! of locking and query logic so the record types can be reused by
//! collaborators (persistence, HTTP surface) without pulling the engine
//! in.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod entry;
pub mod error;

pub use config::{CacheConfig, DEFAULT_MAX_CACHE_PREFIX_LEN, DEFAULT_NUM_CACHE_RESULTS};
pub use entry::Entry;
pub use error::{Error, Result};
