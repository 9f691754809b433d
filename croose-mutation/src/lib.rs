//! Update merging and change tracking for croose.
//!
//! Given the stored state of a document, a partial update and a
//! [`MergePolicy`](croose_model::MergePolicy), [`apply_update`] produces the
//! fields to persist together with the list of fields that really changed
//! and a [`ChangeLog`] describing how.
//!
//! Everything here is a pure function of its inputs: no I/O, no shared
//! state.
//!
//! # Equality
//!
//! Values are compared structurally with [`deep_equal`]: objects ignore key
//! order and numbers compare by value (`1 == 1.0`). Array union and array
//! diff are O(n·m) in the array lengths, which suits relationship lists of a
//! few hundred entries; hashing would change these equality semantics.

mod diff;
mod engine;
mod merge;

pub use diff::{ChangeLog, FieldChange, array_diff, deep_equal};
pub use engine::{MutationOutcome, apply_update};
pub use merge::{effective_value, merge_unique};
