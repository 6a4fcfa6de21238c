//! Test fixtures and data generators
//!
//! Request bodies and response shapes used by the end-to-end tests.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Incident creation payload
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateIncidentFixture {
    pub title: String,
    pub description: String,
    pub unit_identifier: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl CreateIncidentFixture {
    /// A valid incident with a unique title
    pub fn unique() -> Self {
        let suffix = &Uuid::new_v4().to_string()[..8];
        Self {
            title: format!("Pump failure {suffix}"),
            description: "Pressure dropped on the main line".to_string(),
            unit_identifier: "ENG-7".to_string(),
            location: Some("North yard".to_string()),
        }
    }
}

/// Incident update payload carrying only the status change
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdateFixture {
    pub row_version: i32,
    pub status: String,
}

impl StatusUpdateFixture {
    pub fn new(row_version: i32, status: &str) -> Self {
        Self {
            row_version,
            status: status.to_string(),
        }
    }
}

/// Comment creation payload
#[derive(Debug, Serialize)]
pub struct CommentFixture {
    pub body: String,
}

impl CommentFixture {
    pub fn new(body: &str) -> Self {
        Self {
            body: body.to_string(),
        }
    }
}

/// Incident as returned by the API
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncidentBody {
    pub id: Uuid,
    pub title: String,
    pub status: String,
    pub location: Option<String>,
    pub row_version: i32,
}

/// Comment as returned by the API
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentBody {
    pub id: Uuid,
    pub incident_id: Uuid,
    pub body: String,
    pub row_version: i32,
}

/// One field change inside an audit batch
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldChangeBody {
    pub field_name: String,
    pub old_value: Option<String>,
    pub new_value: Option<String>,
}

/// Audit batch as returned by the timeline endpoints
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditBatchBody {
    pub batch_id: Uuid,
    pub entity_type: String,
    pub entity_id: Uuid,
    pub action_type: String,
    pub changed_by_user_id: Uuid,
    pub fields: Vec<FieldChangeBody>,
}

impl AuditBatchBody {
    /// Find a field change by name
    pub fn field(&self, name: &str) -> Option<&FieldChangeBody> {
        self.fields.iter().find(|f| f.field_name == name)
    }
}

/// Single audit row as returned by the batch detail endpoint
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditLogBody {
    pub entity_type: String,
    pub entity_id: Uuid,
    pub reference_entity_name: Option<String>,
    pub reference_id: Option<Uuid>,
    pub field_name: String,
    pub old_value: Option<String>,
    pub new_value: Option<String>,
    pub batch_id: Uuid,
    pub action_type: String,
}

/// Paginated response envelope
#[derive(Debug, Deserialize)]
pub struct PageBody<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub limit: u32,
}

/// Error response envelope
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}
