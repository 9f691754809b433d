//! Core type definitions for croose.
//!
//! This crate holds the identifier types shared by every layer of the
//! data-access stack. Document shapes, schemas and merge policies live in
//! `croose-model`.

mod ids;

pub use ids::DocumentId;

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in type operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid document id: {0:?}")]
    InvalidId(String),
}
