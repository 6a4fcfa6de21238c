//! Error handling utilities for repositories

use incident_core::error::DomainError;
use sqlx::Error as SqlxError;
use uuid::Uuid;

/// Convert SQLx error to DomainError
pub fn map_db_error(e: SqlxError) -> DomainError {
    DomainError::DatabaseError(e.to_string())
}

/// Check for a foreign key violation and return the given error or fallback
pub fn map_foreign_key_violation<F>(e: SqlxError, on_violation: F) -> DomainError
where
    F: FnOnce() -> DomainError,
{
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_foreign_key_violation() {
            return on_violation();
        }
    }
    DomainError::DatabaseError(e.to_string())
}

/// Decide why a version-guarded write touched no row
///
/// `current` is the stored version, if the row still exists.
pub fn version_conflict<F>(current: Option<i32>, expected: i32, not_found: F) -> DomainError
where
    F: FnOnce() -> DomainError,
{
    match current {
        Some(actual) => DomainError::StaleVersion { expected, actual },
        None => not_found(),
    }
}

/// Create an "incident not found" error
pub fn incident_not_found(id: Uuid) -> DomainError {
    DomainError::IncidentNotFound(id)
}

/// Create a "comment not found" error
pub fn comment_not_found(id: Uuid) -> DomainError {
    DomainError::CommentNotFound(id)
}

/// Convert a page offset or limit to a bind value
pub fn to_bind(value: impl Into<u64>) -> i64 {
    i64::try_from(value.into()).unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_conflict() {
        let id = Uuid::new_v4();

        let err = version_conflict(Some(5), 3, || incident_not_found(id));
        assert!(matches!(
            err,
            DomainError::StaleVersion {
                expected: 3,
                actual: 5
            }
        ));

        let err = version_conflict(None, 3, || incident_not_found(id));
        assert!(err.is_not_found());
    }

    #[test]
    fn test_non_database_error_falls_back() {
        let err = map_foreign_key_violation(SqlxError::RowNotFound, || {
            DomainError::IncidentHasComments
        });
        assert_eq!(err.code(), "DATABASE_ERROR");
    }

    #[test]
    fn test_to_bind_saturates() {
        assert_eq!(to_bind(20u32), 20);
        assert_eq!(to_bind(u64::MAX), i64::MAX);
    }
}
