//! Domain errors - error types for the domain layer

use thiserror::Error;
use uuid::Uuid;

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("Incident not found: {0}")]
    IncidentNotFound(Uuid),

    #[error("Comment not found: {0}")]
    CommentNotFound(Uuid),

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Unknown entity type: {0}")]
    UnknownEntityType(String),

    #[error("Invalid reference id: {0}")]
    InvalidReference(String),

    // =========================================================================
    // Conflict Errors
    // =========================================================================
    #[error("Stale row version: expected {expected}, found {actual}")]
    StaleVersion { expected: i32, actual: i32 },

    #[error("Incident still has comments")]
    IncidentHasComments,

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Migration error: {0}")]
    MigrationError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Get an error code string for API responses
    pub fn code(&self) -> &'static str {
        match self {
            // Not Found
            Self::IncidentNotFound(_) => "UNKNOWN_INCIDENT",
            Self::CommentNotFound(_) => "UNKNOWN_COMMENT",

            // Validation
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::UnknownEntityType(_) => "UNKNOWN_ENTITY_TYPE",
            Self::InvalidReference(_) => "INVALID_REFERENCE",

            // Conflict
            Self::StaleVersion { .. } => "STALE_ROW_VERSION",
            Self::IncidentHasComments => "INCIDENT_HAS_COMMENTS",

            // Infrastructure
            Self::DatabaseError(_) => "DATABASE_ERROR",
            Self::MigrationError(_) => "MIGRATION_ERROR",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::IncidentNotFound(_) | Self::CommentNotFound(_))
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::ValidationError(_) | Self::UnknownEntityType(_) | Self::InvalidReference(_)
        )
    }

    /// Check if this is a conflict error
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::StaleVersion { .. } | Self::IncidentHasComments)
    }

    /// HTTP status class of this error
    ///
    /// Infrastructure failures are 500.
    pub fn status_code(&self) -> u16 {
        if self.is_not_found() {
            404
        } else if self.is_validation() {
            400
        } else if self.is_conflict() {
            409
        } else {
            500
        }
    }
}
