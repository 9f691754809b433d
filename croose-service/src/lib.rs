//! Document service for croose.
//!
//! [`DocumentService`] ties the pieces together: it validates document types
//! against the [`SchemaRegistry`](croose_model::SchemaRegistry), reads
//! through an optional [`DocumentCache`](croose_storage::DocumentCache),
//! merges updates with [`croose_mutation::apply_update`], and expands
//! references with plans from a shared
//! [`ExpansionPlanner`](croose_expand::ExpansionPlanner).
//!
//! ```no_run
//! # async fn demo(service: croose_service::DocumentService) -> croose_service::ServiceResult<()> {
//! use croose_model::{DocumentId, Filter};
//! use croose_service::{ReadOptions, UpdateOptions};
//!
//! let post = service
//!     .read("posts", &DocumentId::from("post1"), &ReadOptions::with_expand("createdBy,comments"))
//!     .await?;
//!
//! let mut update = serde_json::Map::new();
//! update.insert("name".into(), "foo".into());
//! if let Some(outcome) = service
//!     .update("users", &Filter::all().with("_id", "user4"), update, &UpdateOptions::default())
//!     .await?
//! {
//!     println!("{:?}", outcome.change_log);
//! }
//! # let _ = post;
//! # Ok(())
//! # }
//! ```

mod config;
mod error;
mod options;
mod service;

pub use config::ServiceConfig;
pub use error::{ServiceError, ServiceResult};
pub use options::{ReadOptions, SearchOptions, SearchPage, SearchResult, UpdateOptions, UpdateOutcome};
pub use service::DocumentService;
