//! Error types for the filter domain

use thiserror::Error;

/// Errors from Bloom filter construction and keyed operations
#[derive(Debug, Error)]
pub enum FilterError {
    /// Construction was rejected. No partially-valid filter is ever returned.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// A keyed operation received a non-textual key. Aborts that call only.
    #[error("key is not valid UTF-8 text: {0}")]
    TypeMismatch(String),
}
