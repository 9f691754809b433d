//! Plan execution through `find_one` lookups.

use crate::error::StorageResult;
use crate::store::DocumentStore;
use croose_expand::PlanEntry;
use croose_model::{Document, DocumentId, Filter};
use futures::future::BoxFuture;
use serde_json::Value;
use tracing::debug;

/// Applies `entries` to `doc`, replacing reference ids with the documents
/// they name and recursing into each loaded document with the entry's
/// children.
pub fn populate_entries<'a, S>(
    store: &'a S,
    mut doc: Document,
    entries: &'a [PlanEntry],
) -> BoxFuture<'a, StorageResult<Document>>
where
    S: DocumentStore + ?Sized,
{
    Box::pin(async move {
        if entries.is_empty() {
            return Ok(doc);
        }
        let mut root = Value::Object(std::mem::take(&mut doc.fields));
        for entry in entries {
            let segments: Vec<&str> = entry.segments().collect();
            resolve_path(store, &mut root, &segments, entry).await?;
        }
        if let Value::Object(fields) = root {
            doc.fields = fields;
        }
        Ok(doc)
    })
}

/// Walks `segments` down from `slot`, fanning out over arrays of embedded
/// documents, and resolves whatever the last segment holds.
fn resolve_path<'a, S>(
    store: &'a S,
    slot: &'a mut Value,
    segments: &'a [&'a str],
    entry: &'a PlanEntry,
) -> BoxFuture<'a, StorageResult<()>>
where
    S: DocumentStore + ?Sized,
{
    Box::pin(async move {
        let Some((head, rest)) = segments.split_first() else {
            return resolve_slot(store, slot, entry).await;
        };
        match slot {
            Value::Object(map) => {
                if let Some(next) = map.get_mut(*head) {
                    resolve_path(store, next, rest, entry).await?;
                }
            }
            Value::Array(items) => {
                for item in items.iter_mut() {
                    resolve_path(store, item, segments, entry).await?;
                }
            }
            _ => {}
        }
        Ok(())
    })
}

async fn resolve_slot<S>(store: &S, slot: &mut Value, entry: &PlanEntry) -> StorageResult<()>
where
    S: DocumentStore + ?Sized,
{
    match slot {
        Value::String(id) => {
            let id = DocumentId::from(id.as_str());
            *slot = load(store, &id, entry).await?.unwrap_or(Value::Null);
        }
        Value::Array(items) => {
            let mut resolved = Vec::with_capacity(items.len());
            for item in std::mem::take(items) {
                match item {
                    Value::String(id) => {
                        if let Some(loaded) = load(store, &DocumentId::from(id), entry).await? {
                            resolved.push(loaded);
                        }
                    }
                    // Already expanded or not an id.
                    other => resolved.push(other),
                }
            }
            *items = resolved;
        }
        _ => {}
    }
    Ok(())
}

async fn load<S>(store: &S, id: &DocumentId, entry: &PlanEntry) -> StorageResult<Option<Value>>
where
    S: DocumentStore + ?Sized,
{
    let Some(doc) = store.find_one(&entry.target_type, &Filter::by_id(id)).await? else {
        debug!("Dangling reference {} -> {}:{}", entry.path, entry.target_type, id);
        return Ok(None);
    };
    let doc = populate_entries(store, doc, &entry.children).await?;
    Ok(Some(doc.to_value()?))
}
