//! Incident comment entity

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::audit::{AuditReference, Auditable, Snapshot};
use crate::value_objects::EntityType;

/// Comment on an incident report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncidentComment {
    pub id: Uuid,
    pub incident_id: Uuid,
    pub author_user_id: Uuid,
    pub body: String,
    pub created_utc: DateTime<Utc>,
    pub updated_utc: DateTime<Utc>,
    pub row_version: i32,
}

impl IncidentComment {
    /// Create a new comment
    pub fn new(incident_id: Uuid, author_user_id: Uuid, body: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            incident_id,
            author_user_id,
            body,
            created_utc: now,
            updated_utc: now,
            row_version: 1,
        }
    }

    /// Check if the comment was edited after creation
    #[inline]
    pub fn is_edited(&self) -> bool {
        self.updated_utc > self.created_utc
    }

    /// Check if the given user wrote this comment
    #[inline]
    pub fn is_author(&self, user_id: Uuid) -> bool {
        self.author_user_id == user_id
    }

    /// Replace the body
    pub fn edit(&mut self, body: String) {
        self.body = body;
        self.updated_utc = Utc::now();
    }
}

impl Auditable for IncidentComment {
    const ENTITY_TYPE: EntityType = EntityType::IncidentComment;

    fn entity_id(&self) -> Uuid {
        self.id
    }

    /// Comment history is filed under the parent incident
    fn audit_reference(&self) -> Option<AuditReference> {
        Some(AuditReference::new(
            EntityType::IncidentReport,
            self.incident_id,
        ))
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot::new()
            .with_id("IncidentId", Some(self.incident_id))
            .with_id("AuthorUserId", Some(self.author_user_id))
            .with_value("Body", &self.body)
            .with_timestamp("CreatedUtc", Some(self.created_utc))
    }
}
