//! Audit log database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for audit_logs table
#[derive(Debug, Clone, FromRow)]
pub struct AuditLogModel {
    pub id: i64,
    /// Entity type name, see `EntityType::as_str`
    pub entity_type: String,
    pub entity_id: Uuid,
    pub reference_entity_name: Option<String>,
    pub reference_id: Option<Uuid>,
    pub field_name: String,
    pub old_value: Option<String>,
    pub new_value: Option<String>,
    pub changed_utc: DateTime<Utc>,
    pub changed_by_user_id: Uuid,
    pub batch_id: Uuid,
    /// Action name, see `ActionType::as_str`
    pub action_type: String,
}

/// Row count of a `COUNT(*)` query
#[derive(Debug, Clone, Copy, FromRow)]
pub struct CountModel {
    pub total: i64,
}
