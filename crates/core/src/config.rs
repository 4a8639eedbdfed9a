//! Cache configuration
//!
//! Two knobs control the short-prefix result cache:
//!
//! - `max_cache_prefix_len`: queries whose normalized form is at most
//!   this many characters are answered from (and installed into) the
//!   cache. 0 disables caching entirely.
//! - `num_cache_results`: how many ranked results a cache slot holds.
//!   Should be at least the largest `max_results` callers pass, so that
//!   cache hits can serve any request size.
//!
//! Changing either parameter on a live index clears the cache.

use crate::error::{Error, Result};

/// Default maximum prefix length served from the cache
pub const DEFAULT_MAX_CACHE_PREFIX_LEN: usize = 2;

/// Default number of ranked results retained per cached prefix
pub const DEFAULT_NUM_CACHE_RESULTS: usize = 20;

/// Configuration for the prefix result cache
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheConfig {
    /// Maximum normalized-query length (in characters) eligible for
    /// caching. 0 disables the cache.
    pub max_cache_prefix_len: usize,
    /// Number of ranked results stored per cached prefix. Must be ≥ 1.
    pub num_cache_results: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_cache_prefix_len: DEFAULT_MAX_CACHE_PREFIX_LEN,
            num_cache_results: DEFAULT_NUM_CACHE_RESULTS,
        }
    }
}

impl CacheConfig {
    /// Configuration with caching turned off.
    ///
    /// Every query goes to the fragment index. Useful as a reference
    /// when checking cache coherence.
    pub fn disabled() -> Self {
        Self {
            max_cache_prefix_len: 0,
            ..Self::default()
        }
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if `num_cache_results` is 0.
    pub fn validate(&self) -> Result<()> {
        if self.num_cache_results == 0 {
            return Err(Error::invalid_config("num_cache_results must be at least 1"));
        }
        Ok(())
    }
}
