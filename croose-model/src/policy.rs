use crate::error::{ModelError, ModelResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// How array fields are combined with their stored value on update.
///
/// `All(true)` soft-merges every array field (union, old elements first);
/// `All(false)` overwrites every field. `PerField` decides per field name;
/// a field missing from the map is overwritten.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MergePolicy {
    All(bool),
    PerField(HashMap<String, bool>),
}

impl Default for MergePolicy {
    fn default() -> Self {
        Self::soft()
    }
}

impl MergePolicy {
    /// Union every array field with its stored value.
    pub fn soft() -> Self {
        Self::All(true)
    }

    /// Replace every field outright.
    pub fn hard() -> Self {
        Self::All(false)
    }

    /// Per-field policy from `(field, soft)` pairs.
    pub fn per_field<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, bool)>,
        S: Into<String>,
    {
        Self::PerField(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Parses a policy received at an API boundary.
    ///
    /// Accepts a JSON boolean or an object whose values are all booleans.
    pub fn from_value(value: &Value) -> ModelResult<Self> {
        match value {
            Value::Bool(soft) => Ok(Self::All(*soft)),
            Value::Object(map) => {
                let mut fields = HashMap::with_capacity(map.len());
                for (field, flag) in map {
                    let soft = flag.as_bool().ok_or_else(|| {
                        ModelError::InvalidMergePolicy(format!(
                            "field {field:?} must be a boolean, got {flag}"
                        ))
                    })?;
                    fields.insert(field.clone(), soft);
                }
                Ok(Self::PerField(fields))
            }
            other => Err(ModelError::InvalidMergePolicy(format!(
                "expected a boolean or an object of booleans, got {other}"
            ))),
        }
    }

    /// Whether `field` is soft-merged under this policy.
    pub fn is_soft(&self, field: &str) -> bool {
        match self {
            Self::All(soft) => *soft,
            Self::PerField(fields) => fields.get(field).copied().unwrap_or(false),
        }
    }
}
