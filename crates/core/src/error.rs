//! Error types for the typeahead index
//!
//! A single typed error enum covers the whole public surface. Most
//! anomalous inputs (duplicate insert, removing an unknown key) are
//! silent no-ops by contract and never reach this module; only score
//! updates on unknown keys and invalid cache parameters surface errors.

use std::fmt::Debug;
use thiserror::Error;

/// Result type alias for typeahead operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the typeahead index
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A score update referenced a key that is not in the index.
    ///
    /// No state is changed when this is returned.
    #[error("unknown key: {key}")]
    UnknownKey {
        /// Debug rendering of the offending key
        key: String,
    },

    /// A cache parameter was set to an unusable value.
    ///
    /// The previous configuration stays in effect.
    #[error("invalid configuration: {reason}")]
    InvalidConfig {
        /// What was wrong with the requested configuration
        reason: String,
    },
}

impl Error {
    /// Create an UnknownKey error from any debuggable key
    pub fn unknown_key<K: Debug>(key: &K) -> Self {
        Error::UnknownKey {
            key: format!("{key:?}"),
        }
    }

    /// Create an InvalidConfig error
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Error::InvalidConfig {
            reason: reason.into(),
        }
    }

    /// Check if this is an unknown-key error
    pub fn is_unknown_key(&self) -> bool {
        matches!(self, Error::UnknownKey { .. })
    }

    /// Check if this is a configuration error
    pub fn is_invalid_config(&self) -> bool {
        matches!(self, Error::InvalidConfig { .. })
    }
}
