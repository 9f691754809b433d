//! Merge-policy application.

use crate::diff::deep_equal;
use croose_model::MergePolicy;
use serde_json::Value;

/// Concatenates `old` and `new`, keeping the first occurrence of each value.
///
/// Duplicates already present in `old` are collapsed too, matching a union
/// over the concatenation.
pub fn merge_unique(old: &[Value], new: &[Value]) -> Vec<Value> {
    let mut out: Vec<Value> = Vec::with_capacity(old.len() + new.len());
    for item in old.iter().chain(new) {
        if !out.iter().any(|seen| deep_equal(seen, item)) {
            out.push(item.clone());
        }
    }
    out
}

/// Decides the value to store for one updated field.
///
/// Under `All(true)` a stored array is unioned with the requested value; a
/// non-array request is appended as a single element. Under `PerField` the
/// union needs a `true` flag and an array on both sides. A field the
/// document does not have yet always takes the requested value.
pub fn effective_value(
    field: &str,
    old: Option<&Value>,
    new: &Value,
    policy: &MergePolicy,
) -> Value {
    match (policy, old, new) {
        (MergePolicy::All(true), Some(Value::Array(old_items)), Value::Array(new_items)) => {
            Value::Array(merge_unique(old_items, new_items))
        }
        (MergePolicy::All(true), Some(Value::Array(old_items)), scalar) => {
            Value::Array(merge_unique(old_items, std::slice::from_ref(scalar)))
        }
        (MergePolicy::PerField(_), Some(Value::Array(old_items)), Value::Array(new_items))
            if policy.is_soft(field) =>
        {
            Value::Array(merge_unique(old_items, new_items))
        }
        _ => new.clone(),
    }
}
