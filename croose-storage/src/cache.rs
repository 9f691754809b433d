use crate::error::StorageResult;
use async_trait::async_trait;
use croose_model::DocumentId;

/// Builds the cache key for a document: `<doc_type>:<id>`.
pub fn cache_key(doc_type: &str, id: &DocumentId) -> String {
    format!("{doc_type}:{id}")
}

/// String-valued cache consulted alongside the store.
///
/// Values are opaque to the cache; the service stores serialized documents
/// and treats anything it cannot deserialize as a miss.
#[async_trait]
pub trait DocumentCache: Send + Sync {
    async fn get(&self, key: &str) -> StorageResult<Option<String>>;

    async fn set(&self, key: &str, value: String) -> StorageResult<()>;

    async fn delete(&self, key: &str) -> StorageResult<()>;

    /// Removes several keys in one round trip.
    async fn delete_many(&self, keys: &[String]) -> StorageResult<()>;
}
