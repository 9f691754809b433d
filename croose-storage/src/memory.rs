//! In-process backends for tests and embedding.

use crate::cache::DocumentCache;
use crate::error::StorageResult;
use crate::store::{DocumentStore, FindOptions};
use async_trait::async_trait;
use croose_model::{Document, Filter};
use std::collections::HashMap;
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::sync::RwLock;

fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}

/// Document store backed by a map of per-type vectors.
///
/// Documents keep insertion order, which is the order unsorted finds return.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, Vec<Document>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored documents of `doc_type`.
    pub async fn len(&self, doc_type: &str) -> usize {
        self.collections.read().await.get(doc_type).map_or(0, Vec::len)
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn find_one(&self, doc_type: &str, filter: &Filter) -> StorageResult<Option<Document>> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(doc_type)
            .and_then(|docs| docs.iter().find(|doc| filter.matches(doc)))
            .cloned())
    }

    async fn find(&self, doc_type: &str, options: &FindOptions) -> StorageResult<Vec<Document>> {
        let collections = self.collections.read().await;
        let Some(docs) = collections.get(doc_type) else {
            return Ok(Vec::new());
        };
        let mut matched: Vec<&Document> = docs.iter().filter(|doc| options.filter.matches(doc)).collect();
        if let Some(sort) = &options.sort {
            matched.sort_by(|a, b| sort.compare(a, b));
        }
        let skip = usize::try_from(options.skip).unwrap_or(usize::MAX);
        let limit = options
            .limit
            .map_or(usize::MAX, |l| usize::try_from(l).unwrap_or(usize::MAX));
        Ok(matched.into_iter().skip(skip).take(limit).cloned().collect())
    }

    async fn count(&self, doc_type: &str, filter: &Filter) -> StorageResult<u64> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(doc_type)
            .map_or(0, |docs| docs.iter().filter(|doc| filter.matches(doc)).count() as u64))
    }

    async fn save(&self, mut doc: Document) -> StorageResult<Document> {
        let now = now_millis();
        let mut collections = self.collections.write().await;
        let docs = collections.entry(doc.doc_type.clone()).or_default();
        doc.updated_at = now;
        match docs.iter_mut().find(|existing| existing.id == doc.id) {
            Some(existing) => {
                doc.created_at = existing.created_at;
                *existing = doc.clone();
            }
            None => {
                if doc.created_at == 0 {
                    doc.created_at = now;
                }
                docs.push(doc.clone());
            }
        }
        Ok(doc)
    }

    async fn delete_one(&self, doc_type: &str, filter: &Filter) -> StorageResult<bool> {
        let mut collections = self.collections.write().await;
        let Some(docs) = collections.get_mut(doc_type) else {
            return Ok(false);
        };
        match docs.iter().position(|doc| filter.matches(doc)) {
            Some(index) => {
                docs.remove(index);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_many(&self, doc_type: &str, filter: &Filter) -> StorageResult<u64> {
        let mut collections = self.collections.write().await;
        let Some(docs) = collections.get_mut(doc_type) else {
            return Ok(0);
        };
        let before = docs.len();
        docs.retain(|doc| !filter.matches(doc));
        Ok((before - docs.len()) as u64)
    }
}

/// String cache backed by a map.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a value verbatim, bypassing the service. Used to plant
    /// entries that fail to deserialize.
    pub async fn insert_raw(&self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.write().await.insert(key.into(), value.into());
    }

    pub async fn contains(&self, key: &str) -> bool {
        self.entries.read().await.contains_key(key)
    }

    /// The raw value under `key`.
    pub async fn peek(&self, key: &str) -> Option<String> {
        self.entries.read().await.get(key).cloned()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl DocumentCache for MemoryCache {
    async fn get(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.peek(key).await)
    }

    async fn set(&self, key: &str, value: String) -> StorageResult<()> {
        self.entries.write().await.insert(key.to_string(), value);
        Ok(())
    }

    async fn delete(&self, key: &str) -> StorageResult<()> {
        self.entries.write().await.remove(key);
        Ok(())
    }

    async fn delete_many(&self, keys: &[String]) -> StorageResult<()> {
        let mut entries = self.entries.write().await;
        for key in keys {
            entries.remove(key);
        }
        Ok(())
    }
}
