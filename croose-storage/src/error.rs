//! Error types for the storage layer.

use thiserror::Error;

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors raised by persistence and cache backends.
///
/// A missing document is not an error: lookups return `Option` and deletes
/// return whether anything was removed.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The backend failed (connection, timeout, driver error).
    #[error("backend error: {0}")]
    Backend(String),

    /// Invalid data.
    #[error("invalid data: {0}")]
    InvalidData(String),
}
