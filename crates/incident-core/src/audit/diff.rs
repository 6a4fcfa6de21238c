//! Field-level diff of two snapshots

use super::snapshot::Snapshot;

/// One changed field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldChange {
    pub field_name: String,
    pub old_value: Option<String>,
    pub new_value: Option<String>,
}

impl FieldChange {
    pub fn new(
        field_name: impl Into<String>,
        old_value: Option<String>,
        new_value: Option<String>,
    ) -> Self {
        Self {
            field_name: field_name.into(),
            old_value,
            new_value,
        }
    }
}

/// Compute the field changes between two states of the same entity
///
/// - `(None, Some(after))` is a create: one change per non-null field of `after`.
/// - `(Some(before), None)` is a delete: one change per field of `before`, new value null.
/// - `(Some, Some)` is an update: only fields whose values differ by raw string
///   equality, in `after` order, then fields that only exist in `before`.
///
/// Null and the empty string are different values.
pub fn compute_diff(before: Option<&Snapshot>, after: Option<&Snapshot>) -> Vec<FieldChange> {
    match (before, after) {
        (None, None) => Vec::new(),
        (None, Some(after)) => after
            .fields()
            .filter_map(|(name, value)| {
                value.map(|value| FieldChange::new(name, None, Some(value.to_owned())))
            })
            .collect(),
        (Some(before), None) => before
            .fields()
            .map(|(name, value)| FieldChange::new(name, value.map(str::to_owned), None))
            .collect(),
        (Some(before), Some(after)) => {
            let mut changes: Vec<FieldChange> = after
                .fields()
                .filter_map(|(name, new_value)| {
                    let old_value = before.get(name).flatten();
                    (old_value != new_value).then(|| {
                        FieldChange::new(
                            name,
                            old_value.map(str::to_owned),
                            new_value.map(str::to_owned),
                        )
                    })
                })
                .collect();

            // Fields dropped from the entity read as null afterwards
            changes.extend(before.fields().filter_map(|(name, old_value)| {
                match (after.get(name), old_value) {
                    (None, Some(old_value)) => {
                        Some(FieldChange::new(name, Some(old_value.to_owned()), None))
                    }
                    _ => None,
                }
            }));

            changes
        }
    }
}
