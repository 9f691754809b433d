use croose_types::DocumentId;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The field values of a document, keyed by top-level field name.
pub type Fields = serde_json::Map<String, Value>;

/// A generic document stored under a document type.
///
/// The serialized form is flat: the bookkeeping keys (`_id`, `_type`,
/// `createdAt`, `updatedAt`) sit beside the user fields, so an expanded
/// reference embeds into its parent exactly as it would be returned on its
/// own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(rename = "_id")]
    pub id: DocumentId,
    #[serde(rename = "_type")]
    pub doc_type: String,
    #[serde(rename = "createdAt", default)]
    pub created_at: i64,
    #[serde(rename = "updatedAt", default)]
    pub updated_at: i64,
    #[serde(flatten)]
    pub fields: Fields,
}

impl Document {
    /// Creates an unsaved document. Timestamps are stamped by the store.
    pub fn new(doc_type: impl Into<String>, id: DocumentId, fields: Fields) -> Self {
        Self {
            id,
            doc_type: doc_type.into(),
            created_at: 0,
            updated_at: 0,
            fields,
        }
    }

    /// Returns a top-level field value.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Resolves a JSON pointer (e.g. `"/subDoc/post"`) against the fields.
    pub fn pointer(&self, pointer: &str) -> Option<&Value> {
        let rest = pointer.strip_prefix('/')?;
        let (head, tail) = match rest.find('/') {
            Some(idx) => (&rest[..idx], &rest[idx..]),
            None => (rest, ""),
        };
        let value = self.fields.get(head)?;
        if tail.is_empty() {
            Some(value)
        } else {
            value.pointer(tail)
        }
    }

    /// Extract a string value using a JSON pointer (e.g., "/name").
    pub fn get_str(&self, pointer: &str) -> Option<&str> {
        self.pointer(pointer).and_then(|v| v.as_str())
    }

    /// Extract a boolean value using a JSON pointer.
    pub fn get_bool(&self, pointer: &str) -> Option<bool> {
        self.pointer(pointer).and_then(|v| v.as_bool())
    }

    /// Extract a numeric value using a JSON pointer.
    pub fn get_number(&self, pointer: &str) -> Option<f64> {
        self.pointer(pointer).and_then(|v| v.as_f64())
    }

    /// Captures the current field values as the "old" side of a diff.
    pub fn snapshot(&self) -> DocumentSnapshot {
        DocumentSnapshot {
            id: self.id.clone(),
            fields: self.fields.clone(),
        }
    }

    /// Converts the document to its flat JSON form.
    pub fn to_value(&self) -> serde_json::Result<Value> {
        serde_json::to_value(self)
    }
}

/// An immutable copy of a document's fields taken just before an update.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentSnapshot {
    id: DocumentId,
    fields: Fields,
}

impl DocumentSnapshot {
    /// Creates a snapshot directly from field values.
    pub fn from_fields(id: DocumentId, fields: Fields) -> Self {
        Self { id, fields }
    }

    pub fn id(&self) -> &DocumentId {
        &self.id
    }

    pub fn fields(&self) -> &Fields {
        &self.fields
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }
}
