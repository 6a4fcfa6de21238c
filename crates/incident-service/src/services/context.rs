//! Service context - dependency container for services
//!
//! Holds the repositories and the JWT service needed by services.

use std::sync::Arc;

use incident_common::auth::JwtService;
use incident_common::AuditConfig;
use incident_core::traits::{AuditLogRepository, CommentRepository, IncidentRepository};

use super::audit::AuditRecorder;
use super::error::{ServiceError, ServiceResult};

/// Service context containing all dependencies
///
/// Repositories are trait objects so tests can swap in in-memory stores.
#[derive(Clone)]
pub struct ServiceContext {
    // Repositories
    incident_repo: Arc<dyn IncidentRepository>,
    comment_repo: Arc<dyn CommentRepository>,
    audit_repo: Arc<dyn AuditLogRepository>,

    // Services
    jwt_service: Arc<JwtService>,
    audit_recorder: AuditRecorder,
}

impl ServiceContext {
    /// Create a new service context with all dependencies
    pub fn new(
        incident_repo: Arc<dyn IncidentRepository>,
        comment_repo: Arc<dyn CommentRepository>,
        audit_repo: Arc<dyn AuditLogRepository>,
        jwt_service: Arc<JwtService>,
        audit_config: &AuditConfig,
    ) -> Self {
        Self {
            incident_repo,
            comment_repo,
            audit_repo,
            jwt_service,
            audit_recorder: AuditRecorder::new(audit_config.max_value_length),
        }
    }

    // === Repositories ===

    /// Get the incident repository
    pub fn incident_repo(&self) -> &dyn IncidentRepository {
        self.incident_repo.as_ref()
    }

    /// Get the comment repository
    pub fn comment_repo(&self) -> &dyn CommentRepository {
        self.comment_repo.as_ref()
    }

    /// Get the audit log repository
    pub fn audit_repo(&self) -> &dyn AuditLogRepository {
        self.audit_repo.as_ref()
    }

    // === Services ===

    /// Get the JWT service
    pub fn jwt_service(&self) -> &JwtService {
        self.jwt_service.as_ref()
    }

    /// Get the audit batch builder
    pub fn audit_recorder(&self) -> &AuditRecorder {
        &self.audit_recorder
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("repositories", &"...")
            .field("audit_recorder", &self.audit_recorder)
            .finish_non_exhaustive()
    }
}

/// Builder for creating ServiceContext with custom configuration
#[derive(Default)]
pub struct ServiceContextBuilder {
    incident_repo: Option<Arc<dyn IncidentRepository>>,
    comment_repo: Option<Arc<dyn CommentRepository>>,
    audit_repo: Option<Arc<dyn AuditLogRepository>>,
    jwt_service: Option<Arc<JwtService>>,
    audit_config: AuditConfig,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn incident_repo(mut self, repo: Arc<dyn IncidentRepository>) -> Self {
        self.incident_repo = Some(repo);
        self
    }

    pub fn comment_repo(mut self, repo: Arc<dyn CommentRepository>) -> Self {
        self.comment_repo = Some(repo);
        self
    }

    pub fn audit_repo(mut self, repo: Arc<dyn AuditLogRepository>) -> Self {
        self.audit_repo = Some(repo);
        self
    }

    pub fn jwt_service(mut self, service: Arc<JwtService>) -> Self {
        self.jwt_service = Some(service);
        self
    }

    pub fn audit_config(mut self, config: AuditConfig) -> Self {
        self.audit_config = config;
        self
    }

    /// Build the ServiceContext
    ///
    /// # Errors
    /// Returns `ServiceError::MissingDependency` naming the first unset dependency
    pub fn build(self) -> ServiceResult<ServiceContext> {
        Ok(ServiceContext::new(
            self.incident_repo
                .ok_or(ServiceError::MissingDependency("incident_repo"))?,
            self.comment_repo
                .ok_or(ServiceError::MissingDependency("comment_repo"))?,
            self.audit_repo
                .ok_or(ServiceError::MissingDependency("audit_repo"))?,
            self.jwt_service
                .ok_or(ServiceError::MissingDependency("jwt_service"))?,
            &self.audit_config,
        ))
    }
}
