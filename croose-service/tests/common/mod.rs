#![allow(dead_code)]

use async_trait::async_trait;
use croose_model::{
    Document, DocumentId, DocumentSchema, FieldMap, Fields, Filter, SchemaNode, SchemaRegistry,
};
use croose_service::{DocumentService, ReadOptions, ServiceConfig};
use croose_storage::{DocumentStore, FindOptions, MemoryCache, MemoryStore, StorageResult};
use serde_json::{Value, json};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

pub fn blog_registry() -> Arc<SchemaRegistry> {
    let post_ref = FieldMap::new().with("post", SchemaNode::reference("posts"));

    let users = DocumentSchema::new("users")
        .with_field("name", SchemaNode::scalar())
        .with_field("email", SchemaNode::scalar())
        .with_field("connections", SchemaNode::reference_array("users"))
        .with_field(
            "plainObj",
            SchemaNode::embedded(FieldMap::new().with("user", SchemaNode::reference("users"))),
        )
        .with_field("subDoc", SchemaNode::embedded(post_ref.clone()))
        .with_field("subDocArr", SchemaNode::embedded_array(post_ref));

    let posts = DocumentSchema::new("posts")
        .with_field("content", SchemaNode::scalar())
        .with_field("createdBy", SchemaNode::reference("users"))
        .with_field("comments", SchemaNode::reference_array("comments"));

    let comments = DocumentSchema::new("comments")
        .with_field("message", SchemaNode::scalar())
        .with_field("createdBy", SchemaNode::reference("users"));

    Arc::new(SchemaRegistry::from_schemas([users, posts, comments]).unwrap())
}

pub fn fields(value: Value) -> Fields {
    serde_json::from_value(value).unwrap()
}

pub fn id(raw: &str) -> DocumentId {
    DocumentId::from(raw)
}

pub fn by_id(raw: &str) -> Filter {
    Filter::by_id(&id(raw))
}

pub fn blog_data() -> Vec<(&'static str, Value)> {
    vec![
        (
            "users",
            json!({
                "_id": "user1",
                "name": "John Joe",
                "email": "john@test.com",
                "connections": ["user2"],
                "subDoc": {"post": "post1"},
                "subDocArr": [{"post": "post1"}, {"post": "post2"}],
                "plainObj": {"user": "user1"}
            }),
        ),
        ("users", json!({"_id": "user2", "name": "Jane", "email": "jane@test.com", "connections": ["user3"]})),
        ("users", json!({"_id": "user3", "name": "Joe", "email": "joe@test.com", "connections": ["user4"]})),
        ("users", json!({"_id": "user4", "name": "James", "email": "james@test.com", "connections": ["user3"]})),
        ("posts", json!({"_id": "post1", "content": "content one", "comments": ["comment1"], "createdBy": "user1"})),
        (
            "posts",
            json!({"_id": "post2", "content": "content two", "comments": ["comment1", "comment2"], "createdBy": "user2"}),
        ),
        (
            "posts",
            json!({
                "_id": "post3",
                "content": "content three",
                "comments": ["comment1", "comment2", "comment3"],
                "createdBy": "user3"
            }),
        ),
        ("comments", json!({"_id": "comment1", "message": "comment one", "createdBy": "user1"})),
        ("comments", json!({"_id": "comment2", "message": "comment two", "createdBy": "user2"})),
        ("comments", json!({"_id": "comment3", "message": "comment three", "createdBy": "user3"})),
    ]
}

/// Wraps a [`MemoryStore`] and counts `find_one` calls.
#[derive(Default)]
pub struct CountingStore {
    pub inner: MemoryStore,
    find_one_calls: AtomicUsize,
}

impl CountingStore {
    pub fn find_one_calls(&self) -> usize {
        self.find_one_calls.load(Ordering::SeqCst)
    }

    pub fn reset(&self) {
        self.find_one_calls.store(0, Ordering::SeqCst);
    }
}

#[async_trait]
impl DocumentStore for CountingStore {
    async fn find_one(&self, doc_type: &str, filter: &Filter) -> StorageResult<Option<Document>> {
        self.find_one_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.find_one(doc_type, filter).await
    }

    async fn find(&self, doc_type: &str, options: &FindOptions) -> StorageResult<Vec<Document>> {
        self.inner.find(doc_type, options).await
    }

    async fn count(&self, doc_type: &str, filter: &Filter) -> StorageResult<u64> {
        self.inner.count(doc_type, filter).await
    }

    async fn save(&self, doc: Document) -> StorageResult<Document> {
        self.inner.save(doc).await
    }

    async fn delete_one(&self, doc_type: &str, filter: &Filter) -> StorageResult<bool> {
        self.inner.delete_one(doc_type, filter).await
    }

    async fn delete_many(&self, doc_type: &str, filter: &Filter) -> StorageResult<u64> {
        self.inner.delete_many(doc_type, filter).await
    }
}

pub struct Harness {
    pub service: DocumentService,
    pub store: Arc<CountingStore>,
    pub cache: Arc<MemoryCache>,
}

/// A service over an empty store, with a memory cache attached.
pub fn harness(cache_enabled: bool) -> Harness {
    let store = Arc::new(CountingStore::default());
    let cache = Arc::new(MemoryCache::new());
    let config = ServiceConfig {
        cache_enabled,
        ..ServiceConfig::default()
    };
    let mut service = DocumentService::new(blog_registry(), store.clone(), config);
    service.set_cache(cache.clone());
    Harness { service, store, cache }
}

/// Same as [`harness`], seeded with the blog data.
pub async fn seeded(cache_enabled: bool) -> Harness {
    let h = harness(cache_enabled);
    for (doc_type, data) in blog_data() {
        h.service
            .create(doc_type, fields(data), &ReadOptions::default())
            .await
            .unwrap();
    }
    h.store.reset();
    h
}
