//! Application error types
//!
//! Errors raised outside the request path of a single service: token
//! handling, startup and configuration.

use incident_core::DomainError;

/// Application-wide error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid token")]
    InvalidToken,

    #[error("Token expired")]
    TokenExpired,

    #[error("Could not issue token: {0}")]
    TokenIssue(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Server error: {0}")]
    Server(String),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl AppError {
    /// Get HTTP status code for this error
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidToken | Self::TokenExpired => 401,
            Self::TokenIssue(_) | Self::Database(_) | Self::Config(_) | Self::Server(_) => 500,
            Self::Domain(e) => e.status_code(),
        }
    }

    /// Get error code for API responses
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidToken => "INVALID_TOKEN",
            Self::TokenExpired => "TOKEN_EXPIRED",
            Self::TokenIssue(_) => "TOKEN_ISSUE_FAILED",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Config(_) => "CONFIG_ERROR",
            Self::Server(_) => "SERVER_ERROR",
            Self::Domain(e) => e.code(),
        }
    }

    /// Whether the caller, not the server, is at fault
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status_code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_token_errors_are_unauthorized() {
        assert_eq!(AppError::InvalidToken.status_code(), 401);
        assert_eq!(AppError::TokenExpired.status_code(), 401);
        assert!(AppError::TokenExpired.is_client_error());
        assert_eq!(AppError::TokenIssue("hs256".to_string()).status_code(), 500);
    }

    #[test]
    fn test_startup_errors() {
        let err = AppError::Config("rate limit must be positive".to_string());
        assert_eq!(err.status_code(), 500);
        assert_eq!(err.error_code(), "CONFIG_ERROR");
        assert!(!err.is_client_error());
        assert_eq!(
            err.to_string(),
            "Configuration error: rate limit must be positive"
        );
    }

    #[test]
    fn test_domain_errors_keep_their_code() {
        let err = AppError::from(DomainError::IncidentNotFound(Uuid::nil()));
        assert_eq!(err.status_code(), 404);
        assert_eq!(err.error_code(), "UNKNOWN_INCIDENT");

        let err = AppError::from(DomainError::StaleVersion {
            expected: 1,
            actual: 2,
        });
        assert_eq!(err.status_code(), 409);

        let err = AppError::from(DomainError::MigrationError("lock".to_string()));
        assert_eq!(err.status_code(), 500);
    }
}
