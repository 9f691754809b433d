#![allow(dead_code)]

use croose_model::{DocumentSchema, FieldMap, SchemaNode, SchemaRegistry};
use std::sync::Arc;

/// users ↔ posts ↔ comments, with self references, embedded documents and
/// embedded document arrays.
pub fn blog_registry() -> Arc<SchemaRegistry> {
    let post_ref = FieldMap::new().with("post", SchemaNode::reference("posts"));

    let users = DocumentSchema::new("users")
        .with_field("name", SchemaNode::scalar())
        .with_field("email", SchemaNode::scalar())
        .with_field("tags", SchemaNode::scalar_array())
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
