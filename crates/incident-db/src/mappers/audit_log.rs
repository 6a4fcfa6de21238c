//! Audit record <-> model mapper

use incident_core::audit::{AuditRecord, AuditReference};
use incident_core::error::DomainError;
use incident_core::value_objects::EntityType;

use crate::models::AuditLogModel;

fn corrupt(e: impl std::fmt::Display) -> DomainError {
    DomainError::DatabaseError(format!("corrupt audit row: {e}"))
}

/// Convert AuditLogModel to AuditRecord
impl TryFrom<AuditLogModel> for AuditRecord {
    type Error = DomainError;

    fn try_from(model: AuditLogModel) -> Result<Self, Self::Error> {
        let reference = match (model.reference_entity_name, model.reference_id) {
            (Some(name), Some(id)) => Some(AuditReference::new(
                name.parse::<EntityType>().map_err(corrupt)?,
                id,
            )),
            _ => None,
        };

        Ok(AuditRecord {
            id: model.id,
            entity_type: model.entity_type.parse().map_err(corrupt)?,
            entity_id: model.entity_id,
            reference,
            field_name: model.field_name,
            old_value: model.old_value,
            new_value: model.new_value,
            changed_utc: model.changed_utc,
            changed_by_user_id: model.changed_by_user_id,
            batch_id: model.batch_id,
            action_type: model.action_type.parse().map_err(corrupt)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use incident_core::value_objects::ActionType;
    use uuid::Uuid;

    fn model() -> AuditLogModel {
        AuditLogModel {
            id: 1,
            entity_type: "IncidentComment".to_string(),
            entity_id: Uuid::new_v4(),
            reference_entity_name: Some("IncidentReport".to_string()),
            reference_id: Some(Uuid::new_v4()),
            field_name: "Body".to_string(),
            old_value: None,
            new_value: Some("Checked wiring".to_string()),
            changed_utc: Utc::now(),
            changed_by_user_id: Uuid::new_v4(),
            batch_id: Uuid::new_v4(),
            action_type: "Create".to_string(),
        }
    }

    #[test]
    fn test_record_from_model() {
        let model = model();
        let reference_id = model.reference_id;

        let record = AuditRecord::try_from(model).unwrap();
        assert_eq!(record.entity_type, EntityType::IncidentComment);
        assert_eq!(record.action_type, ActionType::Create);
        assert_eq!(record.reference.map(|r| r.id), reference_id);
    }

    #[test]
    fn test_missing_reference() {
        let mut model = model();
        model.reference_entity_name = None;
        model.reference_id = None;

        assert!(AuditRecord::try_from(model).unwrap().reference.is_none());
    }

    #[test]
    fn test_unknown_action_is_corrupt() {
        let mut model = model();
        model.action_type = "Purge".to_string();

        let err = AuditRecord::try_from(model).unwrap_err();
        assert_eq!(err.code(), "DATABASE_ERROR");
    }
}
