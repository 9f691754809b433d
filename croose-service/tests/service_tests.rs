mod common;

use common::{by_id, fields, harness, id, seeded};
use croose_model::{Filter, MergePolicy, ModelError};
use croose_mutation::FieldChange;
use croose_service::{ReadOptions, ServiceError, UpdateOptions};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};

// ── Create ───────────────────────────────────────────────────────

#[tokio::test]
async fn create_stamps_timestamps_and_keeps_supplied_id() {
    let h = harness(false);
    let doc = h
        .service
        .create("users", fields(json!({"_id": "user4", "name": "James"})), &ReadOptions::default())
        .await
        .unwrap();
    assert_eq!(doc.id, id("user4"));
    assert_eq!(doc.doc_type, "users");
    assert!(doc.created_at > 0);
    assert!(doc.get("_id").is_none());
}

#[tokio::test]
async fn create_generates_an_id() {
    let h = harness(false);
    let a = h
        .service
        .create("users", fields(json!({"name": "A"})), &ReadOptions::default())
        .await
        .unwrap();
    let b = h
        .service
        .create("users", fields(json!({"name": "B"})), &ReadOptions::default())
        .await
        .unwrap();
    assert_ne!(a.id, b.id);
    assert_eq!(h.service.count("users", &Filter::all()).await.unwrap(), 2);
}

#[tokio::test]
async fn create_ignores_reserved_keys() {
    let h = harness(false);
    let doc = h
        .service
        .create(
            "users",
            fields(json!({"name": "A", "_type": "posts", "createdAt": 1, "updatedAt": 2})),
            &ReadOptions::default(),
        )
        .await
        .unwrap();
    assert_eq!(doc.doc_type, "users");
    assert!(doc.created_at > 2);
    let value = doc.to_value().unwrap();
    assert_eq!(value["_type"], json!("users"));
}

#[tokio::test]
async fn create_rejects_taken_id() {
    let h = seeded(false).await;
    let err = h
        .service
        .create("users", fields(json!({"_id": "user1", "name": "Dup"})), &ReadOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::AlreadyExists(_)));
}

#[tokio::test]
async fn create_rejects_non_string_id() {
    let h = harness(false);
    let err = h
        .service
        .create("users", fields(json!({"_id": 7})), &ReadOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Id(_)));
}

#[tokio::test]
async fn unknown_type_is_an_error() {
    let h = harness(false);
    let err = h
        .service
        .create("widgets", fields(json!({})), &ReadOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Model(ModelError::UnknownType(_))));
    assert!(h.service.count("widgets", &Filter::all()).await.is_err());
}

// ── Read ─────────────────────────────────────────────────────────

#[tokio::test]
async fn read_by_id() {
    let h = seeded(false).await;
    let doc = h
        .service
        .read("users", &id("user4"), &ReadOptions::default())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(doc.get_str("/name"), Some("James"));
}

#[tokio::test]
async fn read_missing_is_none() {
    let h = seeded(false).await;
    let doc = h
        .service
        .read("users", &id("nobody"), &ReadOptions::default())
        .await
        .unwrap();
    assert!(doc.is_none());
}

// ── Update ───────────────────────────────────────────────────────

#[tokio::test]
async fn update_traces_scalar_change() {
    let h = seeded(false).await;
    let outcome = h
        .service
        .update("users", &by_id("user4"), fields(json!({"name": "foo"})), &UpdateOptions::default())
        .await
        .unwrap()
        .unwrap();

    assert_eq!(outcome.document.get_str("/name"), Some("foo"));
    assert_eq!(outcome.modified, vec!["name"]);
    assert_eq!(
        outcome.change_log.get("name"),
        Some(&FieldChange::Replaced {
            from: json!("James"),
            to: json!("foo"),
        })
    );

    let stored = h
        .service
        .read("users", &id("user4"), &ReadOptions::default())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.get_str("/name"), Some("foo"));
    assert_eq!(stored.get_str("/email"), Some("james@test.com"));
}

#[tokio::test]
async fn update_soft_merges_arrays_by_default() {
    let h = seeded(false).await;
    let outcome = h
        .service
        .update(
            "users",
            &by_id("user2"),
            fields(json!({"connections": ["user3", "user4"]})),
            &UpdateOptions::default(),
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(outcome.document.get("connections"), Some(&json!(["user3", "user4"])));
    assert_eq!(
        outcome.change_log.get("connections"),
        Some(&FieldChange::Array {
            added: vec![json!("user4")],
            removed: vec![],
        })
    );
}

#[tokio::test]
async fn update_hard_overwrites_arrays() {
    let h = seeded(false).await;
    let outcome = h
        .service
        .update(
            "users",
            &by_id("user2"),
            fields(json!({"connections": ["user4"]})),
            &UpdateOptions::default().merge(MergePolicy::hard()),
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(outcome.document.get("connections"), Some(&json!(["user4"])));
    assert_eq!(
        outcome.change_log.get("connections"),
        Some(&FieldChange::Array {
            added: vec![json!("user4")],
            removed: vec![json!("user3")],
        })
    );
}

#[tokio::test]
async fn update_with_per_field_policy() {
    let h = seeded(false).await;
    let policy = MergePolicy::from_value(&json!({"connections": true})).unwrap();
    let outcome = h
        .service
        .update(
            "users",
            &by_id("user1"),
            fields(json!({
                "connections": ["user3"],
                "subDocArr": [{"post": "post3"}]
            })),
            &UpdateOptions::default().merge(policy),
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(outcome.document.get("connections"), Some(&json!(["user2", "user3"])));
    assert_eq!(outcome.document.get("subDocArr"), Some(&json!([{"post": "post3"}])));
    assert_eq!(outcome.modified, vec!["connections", "subDocArr"]);
}

#[tokio::test]
async fn update_noop_does_not_touch_the_store() {
    let h = seeded(false).await;
    let before = h
        .service
        .read("users", &id("user3"), &ReadOptions::default())
        .await
        .unwrap()
        .unwrap();
    let outcome = h
        .service
        .update(
            "users",
            &by_id("user3"),
            fields(json!({"name": "Joe", "connections": ["user4"]})),
            &UpdateOptions::default(),
        )
        .await
        .unwrap()
        .unwrap();
    assert!(outcome.modified.is_empty());
    assert!(outcome.change_log.is_empty());
    assert_eq!(outcome.document.updated_at, before.updated_at);
}

#[tokio::test]
async fn update_missing_is_none() {
    let h = seeded(false).await;
    let outcome = h
        .service
        .update("users", &by_id("nobody"), fields(json!({"name": "x"})), &UpdateOptions::default())
        .await
        .unwrap();
    assert!(outcome.is_none());
}

#[tokio::test]
async fn update_by_field_filter() {
    let h = seeded(false).await;
    let outcome = h
        .service
        .update(
            "posts",
            &Filter::all().with("createdBy", "user3"),
            fields(json!({"content": "edited"})),
            &UpdateOptions::default(),
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(outcome.document.id, id("post3"));
}

#[tokio::test]
async fn update_cannot_rewrite_reserved_keys() {
    let h = seeded(false).await;
    let outcome = h
        .service
        .update(
            "users",
            &by_id("user4"),
            fields(json!({"_id": "other", "_type": "posts", "name": "x"})),
            &UpdateOptions::default(),
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(outcome.document.id, id("user4"));
    assert_eq!(outcome.document.doc_type, "users");
    assert_eq!(outcome.modified, vec!["name"]);
}

#[tokio::test]
async fn update_result_serializes_with_change_log() {
    let h = seeded(false).await;
    let outcome = h
        .service
        .update("users", &by_id("user4"), fields(json!({"name": "foo"})), &UpdateOptions::default())
        .await
        .unwrap()
        .unwrap();
    let value = serde_json::to_value(&outcome).unwrap();
    assert_eq!(value["modified"], json!(["name"]));
    assert_eq!(value["changeLog"]["name"], json!({"from": "James", "to": "foo"}));
    assert_eq!(value["document"]["_id"], json!("user4"));
}

// ── Delete / count ───────────────────────────────────────────────

#[tokio::test]
async fn delete_single() {
    let h = seeded(false).await;
    assert!(h.service.delete("users", &by_id("user4")).await.unwrap());
    assert!(!h.service.delete("users", &by_id("user4")).await.unwrap());
    assert_eq!(h.service.count("users", &Filter::all()).await.unwrap(), 3);
}

#[tokio::test]
async fn delete_many_and_count() {
    let h = seeded(false).await;
    let filter = Filter::all().with("comments", "comment2");
    assert_eq!(h.service.count("posts", &filter).await.unwrap(), 2);
    assert_eq!(h.service.delete_many("posts", &filter).await.unwrap(), 2);
    assert_eq!(h.service.count("posts", &Filter::all()).await.unwrap(), 1);
    assert_eq!(h.service.delete_many("posts", &filter).await.unwrap(), 0);
}

#[tokio::test]
async fn count_with_null_operand_matches_missing_field() {
    let h = seeded(false).await;
    let filter = Filter::all().with("subDoc", Value::Null);
    assert_eq!(h.service.count("users", &filter).await.unwrap(), 3);
}
