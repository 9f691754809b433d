//! Reference-expansion planning for croose.
//!
//! An expansion request is a compact string such as
//! `"createdBy.connections,comments*createdBy"`: comma-separated paths whose
//! segments are separated by `.` (or `*`). The planner walks each path
//! against the [`SchemaRegistry`](croose_model::SchemaRegistry) and compiles
//! an [`ExpansionPlan`]: a tree of reference fields to resolve, each entry
//! optionally carrying the plan to apply to the documents it loads.
//!
//! # Components
//!
//! - **Request**: whitespace stripping, separator normalization, and folding
//!   of all paths into one prefix tree (duplicates collapse here)
//! - **Planner**: the recursive schema walk
//! - **Cache**: a bounded LRU of compiled plans keyed by document type and a
//!   SHA-256 digest of the raw request string
//!
//! # Example
//!
//! ```
//! use croose_expand::ExpansionPlanner;
//! use croose_model::{DocumentSchema, SchemaNode, SchemaRegistry};
//! use std::sync::Arc;
//!
//! let registry = SchemaRegistry::from_schemas([
//!     DocumentSchema::new("users").with_field("name", SchemaNode::scalar()),
//!     DocumentSchema::new("posts").with_field("createdBy", SchemaNode::reference("users")),
//! ])
//! .unwrap();
//!
//! let planner = ExpansionPlanner::new(Arc::new(registry), 128);
//! let plan = planner.plan("posts", "createdBy, title").unwrap();
//! assert_eq!(plan.entries().len(), 1);
//! assert_eq!(plan.dropped(), ["title"]);
//! ```

mod cache;
mod error;
mod plan;
mod planner;
mod request;

pub use cache::{CacheStats, PlanCache, PlanKey, DEFAULT_PLAN_CACHE_CAPACITY};
pub use error::{ExpandError, ExpandResult};
pub use plan::{ExpansionPlan, PlanEntry};
pub use planner::ExpansionPlanner;
pub use request::{ExpansionRequest, PathNode, PathTree};
