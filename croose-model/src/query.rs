//! Query primitives handed to the persistence layer.

use crate::document::{Document, Fields};
use crate::error::{ModelError, ModelResult};
use croose_types::DocumentId;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cmp::Ordering;

/// Field name that addresses the document id in filters and sorts.
const ID_FIELD: &str = "_id";

/// A conjunction of top-level equality constraints.
///
/// `_id` matches the document id. An array field matches a non-array operand
/// when it contains it, so `{"connections": "user2"}` finds every user
/// connected to `user2`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Filter(Fields);

impl Filter {
    /// Matches every document.
    pub fn all() -> Self {
        Self::default()
    }

    /// Matches the single document with this id.
    pub fn by_id(id: &DocumentId) -> Self {
        Self::all().with(ID_FIELD, Value::String(id.to_string()))
    }

    /// Adds an equality constraint.
    pub fn with(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.0.insert(field.into(), value.into());
        self
    }

    pub fn from_fields(fields: Fields) -> Self {
        Self(fields)
    }

    /// The id constraint, if the filter pins one.
    pub fn id(&self) -> Option<&str> {
        self.0.get(ID_FIELD).and_then(Value::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn matches(&self, doc: &Document) -> bool {
        self.0.iter().all(|(field, expected)| {
            if field == ID_FIELD {
                return expected.as_str() == Some(doc.id.as_str());
            }
            match doc.fields.get(field) {
                Some(Value::Array(items)) if !expected.is_array() => items.contains(expected),
                Some(actual) => actual == expected,
                None => expected.is_null(),
            }
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortKey {
    pub field: String,
    pub order: SortOrder,
}

/// An ordered list of sort keys; earlier keys take precedence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Sort(Vec<SortKey>);

impl Sort {
    pub fn by(field: &str, order: SortOrder) -> Self {
        Self(Vec::new()).then(field, order)
    }

    pub fn then(mut self, field: &str, order: SortOrder) -> Self {
        self.0.push(SortKey {
            field: field.into(),
            order,
        });
        self
    }

    /// Parses the compact string form: `"-name,email"` sorts by name
    /// descending, then email ascending.
    pub fn parse(expr: &str) -> ModelResult<Self> {
        let mut keys = Vec::new();
        for part in expr.split([',', ' ']).map(str::trim).filter(|p| !p.is_empty()) {
            let (order, field) = match part.as_bytes()[0] {
                b'-' => (SortOrder::Descending, &part[1..]),
                b'+' => (SortOrder::Ascending, &part[1..]),
                _ => (SortOrder::Ascending, part),
            };
            if field.is_empty() {
                return Err(ModelError::InvalidSort(expr.to_string()));
            }
            keys.push(SortKey {
                field: field.to_string(),
                order,
            });
        }
        if keys.is_empty() {
            return Err(ModelError::InvalidSort(expr.to_string()));
        }
        Ok(Self(keys))
    }

    pub fn keys(&self) -> &[SortKey] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Compares two documents under this sort, using [`collate`] per key.
    pub fn compare(&self, a: &Document, b: &Document) -> Ordering {
        for key in &self.0 {
            let ord = if key.field == ID_FIELD {
                collate_str(a.id.as_str(), b.id.as_str())
            } else {
                collate(a.fields.get(&key.field), b.fields.get(&key.field))
            };
            let ord = match key.order {
                SortOrder::Ascending => ord,
                SortOrder::Descending => ord.reverse(),
            };
            if ord != Ordering::Equal {
                return ord;
            }
        }
        Ordering::Equal
    }
}

/// Locale-aware ordering of field values.
///
/// Values of different kinds order as absent/null, numbers, strings,
/// objects, arrays, booleans. Strings compare case-insensitively first and
/// then put lowercase before uppercase, so `"apple" < "banana" < "Banana"`.
pub fn collate(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    let (a, b) = (a.unwrap_or(&Value::Null), b.unwrap_or(&Value::Null));
    match kind_rank(a).cmp(&kind_rank(b)) {
        Ordering::Equal => {}
        other => return other,
    }
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => {
            let (x, y) = (x.as_f64().unwrap_or(0.0), y.as_f64().unwrap_or(0.0));
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Value::String(x), Value::String(y)) => collate_str(x, y),
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Array(x), Value::Array(y)) => {
            for (l, r) in x.iter().zip(y.iter()) {
                let ord = collate(Some(l), Some(r));
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            x.len().cmp(&y.len())
        }
        (Value::Object(x), Value::Object(y)) => x.len().cmp(&y.len()),
        _ => Ordering::Equal,
    }
}

fn collate_str(a: &str, b: &str) -> Ordering {
    let folded = a
        .chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase));
    folded.then_with(|| b.cmp(a))
}

fn kind_rank(v: &Value) -> u8 {
    match v {
        Value::Null => 0,
        Value::Number(_) => 1,
        Value::String(_) => 2,
        Value::Object(_) => 3,
        Value::Array(_) => 4,
        Value::Bool(_) => 5,
    }
}
