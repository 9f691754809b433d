//! Document model for croose.
//!
//! Defines the types every layer of the data-access stack agrees on:
//! - [`Document`]: a typed, identified bag of JSON fields with timestamps
//! - [`SchemaNode`] / [`DocumentSchema`]: the per-type field shape graph
//! - [`SchemaRegistry`]: the startup-time catalogue of document schemas
//! - [`MergePolicy`]: how array fields are merged on update
//! - [`Filter`] / [`Sort`]: the query primitives consumed by stores

mod document;
mod error;
mod policy;
mod query;
mod registry;
mod schema;

pub use document::{Document, DocumentSnapshot, Fields};
pub use error::{ModelError, ModelResult};
pub use policy::MergePolicy;
pub use query::{Filter, Sort, SortKey, SortOrder, collate};
pub use registry::SchemaRegistry;
pub use schema::{DocumentSchema, FieldMap, SchemaNode};

pub use croose_types::DocumentId;
