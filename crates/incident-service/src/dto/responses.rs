//! Response DTOs for API endpoints
//!
//! All response DTOs implement `Serialize` with camelCase field names.

use chrono::{DateTime, Utc};
use incident_core::{ActionType, EntityType, IncidentPriority, IncidentStatus, Page};
use serde::Serialize;
use uuid::Uuid;

// ============================================================================
// Common Response Wrappers
// ============================================================================

/// Page-number paginated response
#[derive(Debug, Clone, Serialize)]
pub struct PageResponse<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub limit: u32,
}

impl<T> PageResponse<T> {
    /// Convert a domain page, mapping every item
    pub fn from_page<U>(page: Page<U>, f: impl FnMut(U) -> T) -> Self {
        let page = page.map(f);
        Self {
            items: page.items,
            total: page.total,
            page: page.page,
            limit: page.limit,
        }
    }
}

// ============================================================================
// Audit Responses
// ============================================================================

/// One field change inside a timeline entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldChangeResponse {
    pub field_name: String,
    pub old_value: Option<String>,
    pub new_value: Option<String>,
}

/// Timeline entry: every field change of one audit batch
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditBatchResponse {
    pub batch_id: Uuid,
    pub entity_type: EntityType,
    pub entity_id: Uuid,
    pub action_type: ActionType,
    pub changed_utc: DateTime<Utc>,
    pub changed_by_user_id: Uuid,
    pub fields: Vec<FieldChangeResponse>,
}

/// Raw audit row, as returned by batch detail
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditLogResponse {
    pub id: i64,
    pub entity_type: EntityType,
    pub entity_id: Uuid,
    pub reference_entity_name: Option<EntityType>,
    pub reference_id: Option<Uuid>,
    pub field_name: String,
    pub old_value: Option<String>,
    pub new_value: Option<String>,
    pub changed_utc: DateTime<Utc>,
    pub changed_by_user_id: Uuid,
    pub batch_id: Uuid,
    pub action_type: ActionType,
}

// ============================================================================
// Incident Responses
// ============================================================================

/// Incident report response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IncidentResponse {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub status: IncidentStatus,
    pub priority: IncidentPriority,
    pub unit_identifier: String,
    pub location: Option<String>,
    pub reported_by_user_id: Uuid,
    pub assigned_to_user_id: Option<Uuid>,
    pub occurred_utc: DateTime<Utc>,
    pub created_utc: DateTime<Utc>,
    pub updated_utc: DateTime<Utc>,
    pub row_version: i32,
}

/// Incident comment response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentResponse {
    pub id: Uuid,
    pub incident_id: Uuid,
    pub author_user_id: Uuid,
    pub body: String,
    pub created_utc: DateTime<Utc>,
    pub updated_utc: DateTime<Utc>,
    pub edited: bool,
    pub row_version: i32,
}

// ============================================================================
// Health Responses
// ============================================================================

/// Basic health check response
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: Utc::now(),
        }
    }
}

/// Readiness check response
#[derive(Debug, Clone, Serialize)]
pub struct ReadinessResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub checks: HealthChecks,
}

/// Health check status for each dependency
#[derive(Debug, Clone, Serialize)]
pub struct HealthChecks {
    pub database: String,
}

impl ReadinessResponse {
    pub fn ready(database_healthy: bool) -> Self {
        Self {
            status: if database_healthy { "ready" } else { "not_ready" }.to_string(),
            timestamp: Utc::now(),
            checks: HealthChecks {
                database: if database_healthy { "healthy" } else { "unhealthy" }.to_string(),
            },
        }
    }

    pub fn is_ready(&self) -> bool {
        self.status == "ready"
    }
}
