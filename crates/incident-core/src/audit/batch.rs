//! Audit batches - the unit of write and the unit of timeline display

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::diff::FieldChange;
use super::snapshot::AuditReference;
use crate::value_objects::{ActionType, EntityType};

/// Audit rows of one logical mutation, not yet persisted
///
/// Every row written from this value shares `batch_id`, `changed_utc` and
/// `changed_by_user_id`. Repositories persist it in the same transaction as
/// the entity change it describes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAuditBatch {
    pub batch_id: Uuid,
    pub entity_type: EntityType,
    pub entity_id: Uuid,
    pub reference: Option<AuditReference>,
    pub action_type: ActionType,
    pub changed_utc: DateTime<Utc>,
    pub changed_by_user_id: Uuid,
    pub changes: Vec<FieldChange>,
}

impl NewAuditBatch {
    /// Create a batch with a fresh random batch id
    pub fn new(
        entity_type: EntityType,
        entity_id: Uuid,
        action_type: ActionType,
        changes: Vec<FieldChange>,
        changed_by_user_id: Uuid,
        changed_utc: DateTime<Utc>,
    ) -> Self {
        Self {
            batch_id: Uuid::new_v4(),
            entity_type,
            entity_id,
            reference: None,
            action_type,
            changed_utc,
            changed_by_user_id,
            changes,
        }
    }

    /// Attach the cross-entity reference key
    pub fn with_reference(mut self, reference: Option<AuditReference>) -> Self {
        self.reference = reference;
        self
    }

    /// Bound every old/new value to `max_chars` characters
    pub fn truncate_values(mut self, max_chars: usize) -> Self {
        for change in &mut self.changes {
            truncate_in_place(&mut change.old_value, max_chars);
            truncate_in_place(&mut change.new_value, max_chars);
        }
        self
    }

    /// Number of rows this batch writes
    #[inline]
    pub fn row_count(&self) -> usize {
        self.changes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Expand into stored rows, assigning ids from `first_id` upward
    pub fn into_records(self, first_id: i64) -> Vec<AuditRecord> {
        let Self {
            batch_id,
            entity_type,
            entity_id,
            reference,
            action_type,
            changed_utc,
            changed_by_user_id,
            changes,
        } = self;

        changes
            .into_iter()
            .zip(first_id..)
            .map(|(change, id)| AuditRecord {
                id,
                entity_type,
                entity_id,
                reference,
                field_name: change.field_name,
                old_value: change.old_value,
                new_value: change.new_value,
                changed_utc,
                changed_by_user_id,
                batch_id,
                action_type,
            })
            .collect()
    }
}

fn truncate_in_place(value: &mut Option<String>, max_chars: usize) {
    if let Some(text) = value {
        let kept = truncate_value(text, max_chars).len();
        text.truncate(kept);
    }
}

/// Cut a value to at most `max_chars` characters, never splitting a character
pub fn truncate_value(value: &str, max_chars: usize) -> &str {
    match value.char_indices().nth(max_chars) {
        Some((end, _)) => &value[..end],
        None => value,
    }
}

/// One stored audit row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditRecord {
    pub id: i64,
    pub entity_type: EntityType,
    pub entity_id: Uuid,
    pub reference: Option<AuditReference>,
    pub field_name: String,
    pub old_value: Option<String>,
    pub new_value: Option<String>,
    pub changed_utc: DateTime<Utc>,
    pub changed_by_user_id: Uuid,
    pub batch_id: Uuid,
    pub action_type: ActionType,
}

/// Audit rows of one batch folded into a single timeline entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditBatch {
    pub batch_id: Uuid,
    pub entity_type: EntityType,
    pub entity_id: Uuid,
    pub action_type: ActionType,
    pub changed_utc: DateTime<Utc>,
    pub changed_by_user_id: Uuid,
    pub fields: Vec<FieldChange>,
}

/// Fold rows into batches
///
/// Batches appear in the order their first row appears; field changes keep
/// row order. Callers pass rows already sorted for display.
pub fn group_into_batches(records: impl IntoIterator<Item = AuditRecord>) -> Vec<AuditBatch> {
    let mut batches: Vec<AuditBatch> = Vec::new();

    for record in records {
        let change = FieldChange::new(record.field_name, record.old_value, record.new_value);

        match batches
            .iter_mut()
            .rev()
            .find(|batch| batch.batch_id == record.batch_id)
        {
            Some(batch) => batch.fields.push(change),
            None => batches.push(AuditBatch {
                batch_id: record.batch_id,
                entity_type: record.entity_type,
                entity_id: record.entity_id,
                action_type: record.action_type,
                changed_utc: record.changed_utc,
                changed_by_user_id: record.changed_by_user_id,
                fields: vec![change],
            }),
        }
    }

    batches
}
