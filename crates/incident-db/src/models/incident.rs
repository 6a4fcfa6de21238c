//! Incident database models

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for incident_reports table
#[derive(Debug, Clone, FromRow)]
pub struct IncidentModel {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    /// Status name, see `IncidentStatus::as_str`
    pub status: String,
    /// Priority name, see `IncidentPriority::as_str`
    pub priority: String,
    pub unit_identifier: String,
    pub location: Option<String>,
    pub reported_by_user_id: Uuid,
    pub assigned_to_user_id: Option<Uuid>,
    pub occurred_utc: DateTime<Utc>,
    pub created_utc: DateTime<Utc>,
    pub updated_utc: DateTime<Utc>,
    pub row_version: i32,
}

/// Database model for incident_comments table
#[derive(Debug, Clone, FromRow)]
pub struct CommentModel {
    pub id: Uuid,
    pub incident_id: Uuid,
    pub author_user_id: Uuid,
    pub body: String,
    pub created_utc: DateTime<Utc>,
    pub updated_utc: DateTime<Utc>,
    pub row_version: i32,
}
