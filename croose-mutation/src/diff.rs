//! Change detection.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// How a single field changed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldChange {
    /// Array elements gained and lost, compared by value.
    Array { added: Vec<Value>, removed: Vec<Value> },
    /// Any other change: the value before and after.
    Replaced { from: Value, to: Value },
}

/// Changed field name to how it changed, in update order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChangeLog(IndexMap<String, FieldChange>);

impl ChangeLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, field: impl Into<String>, change: FieldChange) {
        self.0.insert(field.into(), change);
    }

    pub fn get(&self, field: &str) -> Option<&FieldChange> {
        self.0.get(field)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldChange)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Elements of `new` missing from `old`, and elements of `old` missing from
/// `new`. Order follows the source arrays.
pub fn array_diff(old: &[Value], new: &[Value]) -> (Vec<Value>, Vec<Value>) {
    let added = new
        .iter()
        .filter(|n| !old.iter().any(|o| deep_equal(o, n)))
        .cloned()
        .collect();
    let removed = old
        .iter()
        .filter(|o| !new.iter().any(|n| deep_equal(n, o)))
        .cloned()
        .collect();
    (added, removed)
}

/// Structural equality: object key order is irrelevant and numbers compare
/// by value, so `1` equals `1.0`.
pub fn deep_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => {
            if let (Some(x), Some(y)) = (x.as_i64(), y.as_i64()) {
                x == y
            } else if let (Some(x), Some(y)) = (x.as_u64(), y.as_u64()) {
                x == y
            } else {
                x.as_f64() == y.as_f64()
            }
        }
        (Value::Array(x), Value::Array(y)) => {
            x.len() == y.len() && x.iter().zip(y).all(|(l, r)| deep_equal(l, r))
        }
        (Value::Object(x), Value::Object(y)) => {
            x.len() == y.len()
                && x.iter()
                    .all(|(k, v)| y.get(k).is_some_and(|other| deep_equal(v, other)))
        }
        _ => a == b,
    }
}
