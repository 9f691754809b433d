//! Collaborator traits for croose's document service.
//!
//! [`DocumentStore`] is the persistence side: filtered lookups, paged finds,
//! counts, saves and deletes, plus [`populate`](DocumentStore::populate),
//! which executes an [`ExpansionPlan`](croose_expand::ExpansionPlan) through
//! `find_one` lookups unless the backend overrides it with a native join.
//!
//! [`DocumentCache`] is the string-valued cache used for cache-aside reads.
//! Keys come from [`cache_key`].
//!
//! [`MemoryStore`] and [`MemoryCache`] implement both traits in process.

mod cache;
mod error;
mod memory;
mod resolve;
mod store;

pub use cache::{DocumentCache, cache_key};
pub use error::{StorageError, StorageResult};
pub use memory::{MemoryCache, MemoryStore};
pub use resolve::populate_entries;
pub use store::{DocumentStore, FindOptions};
