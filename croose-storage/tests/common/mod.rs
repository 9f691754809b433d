#![allow(dead_code)]

use croose_model::{Document, DocumentId, DocumentSchema, FieldMap, Fields, SchemaNode, SchemaRegistry};
use croose_storage::{DocumentStore, MemoryStore};
use serde_json::{Value, json};
use std::sync::Arc;

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

pub fn doc(doc_type: &str, id: &str, fields: Value) -> Document {
    let fields: Fields = serde_json::from_value(fields).unwrap();
    Document::new(doc_type, DocumentId::from(id), fields)
}

pub fn blog_data() -> Vec<Document> {
    vec![
        doc(
            "users",
            "user1",
            json!({
                "name": "John Joe",
                "email": "john@test.com",
                "connections": ["user2"],
                "subDoc": {"post": "post1"},
                "subDocArr": [{"post": "post1"}, {"post": "post2"}],
                "plainObj": {"user": "user1"}
            }),
        ),
        doc("users", "user2", json!({"name": "Jane", "email": "jane@test.com", "connections": ["user3"]})),
        doc("users", "user3", json!({"name": "Joe", "email": "joe@test.com", "connections": ["user4"]})),
        doc("users", "user4", json!({"name": "James", "email": "james@test.com", "connections": ["user3"]})),
        doc("posts", "post1", json!({"content": "content one", "comments": ["comment1"], "createdBy": "user1"})),
        doc(
            "posts",
            "post2",
            json!({"content": "content two", "comments": ["comment1", "comment2"], "createdBy": "user2"}),
        ),
        doc(
            "posts",
            "post3",
            json!({
                "content": "content three",
                "comments": ["comment1", "comment2", "comment3"],
                "createdBy": "user3"
            }),
        ),
        doc("comments", "comment1", json!({"message": "comment one", "createdBy": "user1"})),
        doc("comments", "comment2", json!({"message": "comment two", "createdBy": "user2"})),
        doc("comments", "comment3", json!({"message": "comment three", "createdBy": "user3"})),
    ]
}

pub async fn seeded_store() -> MemoryStore {
    let store = MemoryStore::new();
    for doc in blog_data() {
        store.save(doc).await.unwrap();
    }
    store
}
