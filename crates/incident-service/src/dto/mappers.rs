//! Entity to DTO mappers
//!
//! Implements `From` conversions from domain entities to response DTOs.

use incident_core::audit::{AuditBatch, AuditRecord, FieldChange};
use incident_core::entities::{IncidentComment, IncidentReport};

use super::responses::{
    AuditBatchResponse, AuditLogResponse, CommentResponse, FieldChangeResponse, IncidentResponse,
};

// ============================================================================
// Audit Mappers
// ============================================================================

impl From<FieldChange> for FieldChangeResponse {
    fn from(change: FieldChange) -> Self {
        Self {
            field_name: change.field_name,
            old_value: change.old_value,
            new_value: change.new_value,
        }
    }
}

impl From<AuditBatch> for AuditBatchResponse {
    fn from(batch: AuditBatch) -> Self {
        Self {
            batch_id: batch.batch_id,
            entity_type: batch.entity_type,
            entity_id: batch.entity_id,
            action_type: batch.action_type,
            changed_utc: batch.changed_utc,
            changed_by_user_id: batch.changed_by_user_id,
            fields: batch.fields.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<AuditRecord> for AuditLogResponse {
    fn from(record: AuditRecord) -> Self {
        Self {
            id: record.id,
            entity_type: record.entity_type,
            entity_id: record.entity_id,
            reference_entity_name: record.reference.map(|r| r.entity_type),
            reference_id: record.reference.map(|r| r.id),
            field_name: record.field_name,
            old_value: record.old_value,
            new_value: record.new_value,
            changed_utc: record.changed_utc,
            changed_by_user_id: record.changed_by_user_id,
            batch_id: record.batch_id,
            action_type: record.action_type,
        }
    }
}

// ============================================================================
// Incident Mappers
// ============================================================================

impl From<&IncidentReport> for IncidentResponse {
    fn from(incident: &IncidentReport) -> Self {
        Self {
            id: incident.id,
            title: incident.title.clone(),
            description: incident.description.clone(),
            status: incident.status,
            priority: incident.priority,
            unit_identifier: incident.unit_identifier.clone(),
            location: incident.location.clone(),
            reported_by_user_id: incident.reported_by_user_id,
            assigned_to_user_id: incident.assigned_to_user_id,
            occurred_utc: incident.occurred_utc,
            created_utc: incident.created_utc,
            updated_utc: incident.updated_utc,
            row_version: incident.row_version,
        }
    }
}

impl From<IncidentReport> for IncidentResponse {
    fn from(incident: IncidentReport) -> Self {
        Self::from(&incident)
    }
}

impl From<&IncidentComment> for CommentResponse {
    fn from(comment: &IncidentComment) -> Self {
        Self {
            id: comment.id,
            incident_id: comment.incident_id,
            author_user_id: comment.author_user_id,
            body: comment.body.clone(),
            created_utc: comment.created_utc,
            updated_utc: comment.updated_utc,
            edited: comment.is_edited(),
            row_version: comment.row_version,
        }
    }
}

impl From<IncidentComment> for CommentResponse {
    fn from(comment: IncidentComment) -> Self {
        Self::from(&comment)
    }
}
