//! Error types for expansion planning.

use thiserror::Error;

/// Result type for planner operations.
pub type ExpandResult<T> = Result<T, ExpandError>;

/// Errors that can occur while compiling an expansion plan.
///
/// Both variants mean the schema registry is incomplete. Unknown or
/// non-reference fields in a request are not errors; they end up in
/// [`ExpansionPlan::dropped`](crate::ExpansionPlan::dropped).
#[derive(Debug, Error)]
pub enum ExpandError {
    /// The document type being expanded has no registered schema.
    #[error("unknown document type: {0}")]
    UnknownType(String),

    /// A requested reference points at a type with no registered schema.
    #[error("expansion path {path:?} references unregistered type {target}")]
    UnknownTargetType { path: String, target: String },
}
