use crate::diff::{ChangeLog, FieldChange, array_diff, deep_equal};
use crate::merge::effective_value;
use croose_model::{DocumentSnapshot, Fields, MergePolicy};
use serde_json::Value;
use tracing::debug;

/// Result of merging an update into a snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct MutationOutcome {
    /// The complete field set to persist.
    pub merged: Fields,
    /// Fields whose stored value really changed, in update order.
    pub modified: Vec<String>,
    /// How each modified field changed.
    pub change_log: ChangeLog,
}

impl MutationOutcome {
    /// True when persisting `merged` would change nothing.
    pub fn is_noop(&self) -> bool {
        self.modified.is_empty()
    }
}

/// Merges `update` into `old` under `policy` and records what changed.
///
/// A field counts as modified when its effective value differs from the
/// stored one under [`deep_equal`]. Array fields whose new value is a
/// non-empty array get an `added`/`removed` entry; when both lists come out
/// empty the field is treated as unmodified and left out of both
/// `modified` and the change log. Every other change is logged as
/// `from`/`to`, with a missing stored value reported as `null`.
pub fn apply_update(old: &DocumentSnapshot, update: &Fields, policy: &MergePolicy) -> MutationOutcome {
    let mut merged = old.fields().clone();
    let mut modified = Vec::new();
    let mut change_log = ChangeLog::new();

    for (field, requested) in update {
        let before = old.get(field);
        let after = effective_value(field, before, requested, policy);
        let previous = before.unwrap_or(&Value::Null);

        if !deep_equal(previous, &after) {
            match change_for(previous, &after) {
                Some(change) => {
                    modified.push(field.clone());
                    change_log.record(field.as_str(), change);
                }
                None => debug!("Ignoring {} on {}: same elements, new array", field, old.id()),
            }
        }
        merged.insert(field.clone(), after);
    }

    MutationOutcome {
        merged,
        modified,
        change_log,
    }
}

fn change_for(before: &Value, after: &Value) -> Option<FieldChange> {
    if let Value::Array(new_items) = after {
        if !new_items.is_empty() {
            let old_items: &[Value] = match before {
                Value::Array(items) => items,
                Value::Null => &[],
                _ => return Some(replaced(before, after)),
            };
            let (added, removed) = array_diff(old_items, new_items);
            if added.is_empty() && removed.is_empty() {
                return None;
            }
            return Some(FieldChange::Array { added, removed });
        }
    }
    Some(replaced(before, after))
}

fn replaced(before: &Value, after: &Value) -> FieldChange {
    FieldChange::Replaced {
        from: before.clone(),
        to: after.clone(),
    }
}
