//! Request DTOs for API endpoints
//!
//! All request DTOs implement `Deserialize` and `Validate` for input validation.
//! Field names are camelCase on the wire.

use chrono::{DateTime, Utc};
use incident_core::{IncidentPriority, IncidentStatus};
use serde::{Deserialize, Deserializer};
use uuid::Uuid;
use validator::Validate;

/// Deserialize a present field, keeping an explicit `null` as `Some(None)`
///
/// Paired with `#[serde(default)]` so a missing field stays `None`.
fn deserialize_some<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}

// ============================================================================
// Incident Requests
// ============================================================================

/// Create incident request
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateIncidentRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,

    #[validate(length(max = 4000, message = "Description must be at most 4000 characters"))]
    #[serde(default)]
    pub description: String,

    /// Defaults to Medium
    pub priority: Option<IncidentPriority>,

    #[validate(length(min = 1, max = 50, message = "Unit identifier must be 1-50 characters"))]
    pub unit_identifier: String,

    #[validate(length(max = 200, message = "Location must be at most 200 characters"))]
    pub location: Option<String>,

    pub assigned_to_user_id: Option<Uuid>,

    /// Defaults to the time of the request
    pub occurred_utc: Option<DateTime<Utc>>,
}

/// Partial incident update
///
/// Absent fields are left unchanged. For nullable columns an explicit `null`
/// clears the value.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateIncidentRequest {
    /// Version the client last read
    #[validate(range(min = 1, message = "rowVersion must be 1 or greater"))]
    pub row_version: i32,

    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: Option<String>,

    #[validate(length(max = 4000, message = "Description must be at most 4000 characters"))]
    pub description: Option<String>,

    pub status: Option<IncidentStatus>,

    pub priority: Option<IncidentPriority>,

    #[validate(length(min = 1, max = 50, message = "Unit identifier must be 1-50 characters"))]
    pub unit_identifier: Option<String>,

    #[validate(length(max = 200, message = "Location must be at most 200 characters"))]
    #[serde(default, deserialize_with = "deserialize_some")]
    pub location: Option<Option<String>>,

    #[serde(default, deserialize_with = "deserialize_some")]
    pub assigned_to_user_id: Option<Option<Uuid>>,

    pub occurred_utc: Option<DateTime<Utc>>,
}

// ============================================================================
// Comment Requests
// ============================================================================

/// Create comment request
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentRequest {
    #[validate(length(min = 1, max = 4000, message = "Comment must be 1-4000 characters"))]
    pub body: String,
}

/// Edit comment request
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCommentRequest {
    #[validate(range(min = 1, message = "rowVersion must be 1 or greater"))]
    pub row_version: i32,

    #[validate(length(min = 1, max = 4000, message = "Comment must be 1-4000 characters"))]
    pub body: String,
}

// ============================================================================
// Query Parameters
// ============================================================================

/// Optional version guard for deletes (`?rowVersion=`)
///
/// Without it the delete applies to whatever version is current.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RowVersionQuery {
    pub row_version: Option<i32>,
}

/// Entity timeline filter (`?entityId=&entityType=`)
///
/// Kept as raw strings so malformed values surface as domain errors.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineQuery {
    pub entity_id: String,
    pub entity_type: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_incident_validation() {
        let request: CreateIncidentRequest = serde_json::from_value(serde_json::json!({
            "title": "Stretcher latch broken",
            "unitIdentifier": "MEDIC-12",
        }))
        .unwrap();
        assert!(request.validate().is_ok());
        assert!(request.priority.is_none());
        assert_eq!(request.description, "");

        let request: CreateIncidentRequest = serde_json::from_value(serde_json::json!({
            "title": "",
            "unitIdentifier": "MEDIC-12",
        }))
        .unwrap();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_update_distinguishes_absent_and_null() {
        let request: UpdateIncidentRequest = serde_json::from_value(serde_json::json!({
            "rowVersion": 2,
            "location": null,
        }))
        .unwrap();
        assert_eq!(request.location, Some(None));
        assert_eq!(request.assigned_to_user_id, None);

        let request: UpdateIncidentRequest = serde_json::from_value(serde_json::json!({
            "rowVersion": 2,
            "location": "Bay 3",
            "status": "InProgress",
        }))
        .unwrap();
        assert_eq!(request.location, Some(Some("Bay 3".to_string())));
        assert_eq!(request.status, Some(IncidentStatus::InProgress));
    }

    #[test]
    fn test_update_rejects_unknown_status() {
        let result = serde_json::from_value::<UpdateIncidentRequest>(serde_json::json!({
            "rowVersion": 1,
            "status": "Archived",
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_update_requires_positive_row_version() {
        let request = UpdateIncidentRequest {
            row_version: 0,
            ..Default::default()
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_comment_validation() {
        let request = CreateCommentRequest {
            body: String::new(),
        };
        assert!(request.validate().is_err());

        let request = UpdateCommentRequest {
            row_version: 1,
            body: "Replaced the latch".to_string(),
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_timeline_query() {
        let query: TimelineQuery = serde_json::from_value(serde_json::json!({
            "entityId": "not-a-uuid",
        }))
        .unwrap();
        assert_eq!(query.entity_id, "not-a-uuid");
        assert!(query.entity_type.is_none());
    }
}
