//! Path parameter extractors
//!
//! Type-safe extraction of UUID path parameters.

use serde::Deserialize;
use uuid::Uuid;

use crate::response::ApiError;

fn parse_uuid(raw: &str, name: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::invalid_path(format!("Invalid {name} format")))
}

/// Path parameters with incident_id
#[derive(Debug, Deserialize)]
pub struct IncidentIdPath {
    pub incident_id: String,
}

impl IncidentIdPath {
    /// Parse incident_id as UUID
    pub fn incident_id(&self) -> Result<Uuid, ApiError> {
        parse_uuid(&self.incident_id, "incidentId")
    }
}

/// Path parameters with incident_id and comment_id
#[derive(Debug, Deserialize)]
pub struct CommentPath {
    pub incident_id: String,
    pub comment_id: String,
}

impl CommentPath {
    /// Parse incident_id as UUID
    pub fn incident_id(&self) -> Result<Uuid, ApiError> {
        parse_uuid(&self.incident_id, "incidentId")
    }

    /// Parse comment_id as UUID
    pub fn comment_id(&self) -> Result<Uuid, ApiError> {
        parse_uuid(&self.comment_id, "commentId")
    }
}

/// Path parameters of the reference timeline
///
/// Both values stay raw; the audit service reports unknown names and
/// malformed ids with domain error codes.
#[derive(Debug, Deserialize)]
pub struct ReferencePath {
    pub reference_entity_name: String,
    pub reference_id: String,
}
