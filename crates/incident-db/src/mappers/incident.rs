//! Incident and comment entity <-> model mapper

use incident_core::entities::{IncidentComment, IncidentReport};
use incident_core::error::DomainError;

use crate::models::{CommentModel, IncidentModel};

/// Convert IncidentModel to IncidentReport entity
///
/// Fails when a stored status or priority name is not recognised.
impl TryFrom<IncidentModel> for IncidentReport {
    type Error = DomainError;

    fn try_from(model: IncidentModel) -> Result<Self, Self::Error> {
        Ok(IncidentReport {
            id: model.id,
            title: model.title,
            description: model.description,
            status: model.status.parse()?,
            priority: model.priority.parse()?,
            unit_identifier: model.unit_identifier,
            location: model.location,
            reported_by_user_id: model.reported_by_user_id,
            assigned_to_user_id: model.assigned_to_user_id,
            occurred_utc: model.occurred_utc,
            created_utc: model.created_utc,
            updated_utc: model.updated_utc,
            row_version: model.row_version,
        })
    }
}

/// Convert CommentModel to IncidentComment entity
impl From<CommentModel> for IncidentComment {
    fn from(model: CommentModel) -> Self {
        IncidentComment {
            id: model.id,
            incident_id: model.incident_id,
            author_user_id: model.author_user_id,
            body: model.body,
            created_utc: model.created_utc,
            updated_utc: model.updated_utc,
            row_version: model.row_version,
        }
    }
}
