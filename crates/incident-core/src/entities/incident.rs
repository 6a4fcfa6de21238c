//! Incident report entity - a vehicle or equipment fault report

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::audit::{AuditReference, Auditable, Snapshot};
use crate::error::DomainError;
use crate::value_objects::EntityType;

/// Workflow state of an incident
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum IncidentStatus {
    #[default]
    Open,
    InProgress,
    Closed,
}

impl IncidentStatus {
    pub const ALL: [IncidentStatus; 3] = [Self::Open, Self::InProgress, Self::Closed];

    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "Open",
            Self::InProgress => "InProgress",
            Self::Closed => "Closed",
        }
    }
}

impl fmt::Display for IncidentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IncidentStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| DomainError::ValidationError(format!("unknown incident status: {s}")))
    }
}

/// Urgency of an incident
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum IncidentPriority {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

impl IncidentPriority {
    pub const ALL: [IncidentPriority; 4] = [Self::Low, Self::Medium, Self::High, Self::Critical];

    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
            Self::Critical => "Critical",
        }
    }
}

impl fmt::Display for IncidentPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IncidentPriority {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|priority| priority.as_str() == s)
            .ok_or_else(|| DomainError::ValidationError(format!("unknown incident priority: {s}")))
    }
}

/// Incident report entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncidentReport {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub status: IncidentStatus,
    pub priority: IncidentPriority,
    /// Call sign or fleet number of the affected unit
    pub unit_identifier: String,
    pub location: Option<String>,
    pub reported_by_user_id: Uuid,
    pub assigned_to_user_id: Option<Uuid>,
    pub occurred_utc: DateTime<Utc>,
    pub created_utc: DateTime<Utc>,
    pub updated_utc: DateTime<Utc>,
    /// Optimistic concurrency token, bumped on every successful update
    pub row_version: i32,
}

impl IncidentReport {
    /// Create a new open incident
    pub fn new(
        title: String,
        description: String,
        priority: IncidentPriority,
        unit_identifier: String,
        reported_by_user_id: Uuid,
        occurred_utc: DateTime<Utc>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title,
            description,
            status: IncidentStatus::Open,
            priority,
            unit_identifier,
            location: None,
            reported_by_user_id,
            assigned_to_user_id: None,
            occurred_utc,
            created_utc: now,
            updated_utc: now,
            row_version: 1,
        }
    }

    /// Set the location
    pub fn with_location(mut self, location: Option<String>) -> Self {
        self.location = location;
        self
    }

    /// Check if the incident is closed
    #[inline]
    pub fn is_closed(&self) -> bool {
        self.status == IncidentStatus::Closed
    }

    /// Check if someone is assigned
    #[inline]
    pub fn is_assigned(&self) -> bool {
        self.assigned_to_user_id.is_some()
    }

    /// Mark as modified
    pub fn touch(&mut self) {
        self.updated_utc = Utc::now();
    }
}

impl Auditable for IncidentReport {
    const ENTITY_TYPE: EntityType = EntityType::IncidentReport;

    fn entity_id(&self) -> Uuid {
        self.id
    }

    /// Incidents are the reference root of their own case history
    fn audit_reference(&self) -> Option<AuditReference> {
        Some(AuditReference::new(EntityType::IncidentReport, self.id))
    }

    // UpdatedUtc and RowVersion are bookkeeping and change on every write
    fn snapshot(&self) -> Snapshot {
        Snapshot::new()
            .with_value("Title", &self.title)
            .with_value("Description", &self.description)
            .with_value("Status", self.status)
            .with_value("Priority", self.priority)
            .with_value("UnitIdentifier", &self.unit_identifier)
            .with("Location", self.location.clone())
            .with_id("ReportedByUserId", Some(self.reported_by_user_id))
            .with_id("AssignedToUserId", self.assigned_to_user_id)
            .with_timestamp("OccurredUtc", Some(self.occurred_utc))
            .with_timestamp("CreatedUtc", Some(self.created_utc))
    }
}
