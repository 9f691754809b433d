//! Error types for the model layer.

use thiserror::Error;

/// Result type for model operations.
pub type ModelResult<T> = Result<T, ModelError>;

/// Errors raised while building or interpreting model configuration.
///
/// All of these indicate a broken setup (bad schema registration, malformed
/// merge policy) rather than a runtime condition.
#[derive(Debug, Error)]
pub enum ModelError {
    /// No schema is registered for the document type.
    #[error("unknown document type: {0}")]
    UnknownType(String),

    /// A schema with the same document type is already registered.
    #[error("document type already registered: {0}")]
    DuplicateType(String),

    /// A reference field names a target type that is not registered.
    #[error("{doc_type}.{field} references unregistered type {target}")]
    UnresolvedReference {
        doc_type: String,
        field: String,
        target: String,
    },

    /// A merge policy that is neither a boolean nor a map of booleans.
    #[error("invalid merge policy: {0}")]
    InvalidMergePolicy(String),

    /// A sort expression that names no field.
    #[error("invalid sort expression: {0:?}")]
    InvalidSort(String),
}
