//! Error types for the service layer.

use croose_expand::ExpandError;
use croose_model::ModelError;
use croose_storage::StorageError;
use thiserror::Error;

/// Result type for service operations.
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Errors surfaced by [`DocumentService`](crate::DocumentService).
///
/// Absent documents are reported through `Option`/`bool` return values and
/// never appear here.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Unknown document type or malformed merge policy/sort.
    #[error("model error: {0}")]
    Model(#[from] ModelError),

    /// Expansion against a broken schema registry.
    #[error("expansion error: {0}")]
    Expand(#[from] ExpandError),

    /// Persistence or cache backend failure.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// Invalid document id.
    #[error("invalid id: {0}")]
    Id(#[from] croose_types::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A create supplied an id that is already taken.
    #[error("document already exists: {0}")]
    AlreadyExists(String),
}
