//! Repository traits (ports) - define the interface for data access
//!
//! Mutating operations take the [`NewAuditBatch`] describing the change and
//! must persist it in the same transaction as the entity write: either both
//! become visible or neither does.

use async_trait::async_trait;
use uuid::Uuid;

use crate::audit::{AuditBatch, AuditRecord, AuditReference, NewAuditBatch};
use crate::entities::{IncidentComment, IncidentReport};
use crate::error::DomainError;
use crate::value_objects::{EntityType, Page, PageRequest};

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// Incident Repository
// ============================================================================

#[async_trait]
pub trait IncidentRepository: Send + Sync {
    /// Find incident by ID
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<IncidentReport>>;

    /// List incidents, most recently occurred first
    async fn list(&self, page: PageRequest) -> RepoResult<Page<IncidentReport>>;

    /// Insert an incident together with its Create batch
    async fn create(&self, incident: &IncidentReport, audit: &NewAuditBatch) -> RepoResult<()>;

    /// Update an incident together with its Update batch
    ///
    /// Fails with `StaleVersion` unless the stored row version equals
    /// `expected_version`. The stored version is incremented on success.
    async fn update(
        &self,
        incident: &IncidentReport,
        expected_version: i32,
        audit: &NewAuditBatch,
    ) -> RepoResult<()>;

    /// Delete an incident together with its Delete batch
    ///
    /// Fails with `IncidentHasComments` while comments reference it.
    async fn delete(&self, id: Uuid, expected_version: i32, audit: &NewAuditBatch)
        -> RepoResult<()>;
}

// ============================================================================
// Comment Repository
// ============================================================================

#[async_trait]
pub trait CommentRepository: Send + Sync {
    /// Find comment by ID
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<IncidentComment>>;

    /// List comments of an incident, oldest first
    async fn list_by_incident(
        &self,
        incident_id: Uuid,
        page: PageRequest,
    ) -> RepoResult<Page<IncidentComment>>;

    /// Insert a comment together with its Create batch
    async fn create(&self, comment: &IncidentComment, audit: &NewAuditBatch) -> RepoResult<()>;

    /// Update a comment together with its Update batch
    async fn update(
        &self,
        comment: &IncidentComment,
        expected_version: i32,
        audit: &NewAuditBatch,
    ) -> RepoResult<()>;

    /// Delete a comment together with its Delete batch
    async fn delete(&self, id: Uuid, expected_version: i32, audit: &NewAuditBatch)
        -> RepoResult<()>;
}

// ============================================================================
// Audit Log Repository
// ============================================================================

/// Read side of the audit trail
///
/// Rows are append-only and only written through the entity repositories, so
/// this port has no write operations. Unknown ids yield empty results.
#[async_trait]
pub trait AuditLogRepository: Send + Sync {
    /// Batches recorded for one entity, newest first
    ///
    /// `entity_type` narrows the match when ids could collide across kinds.
    async fn timeline_by_entity(
        &self,
        entity_id: Uuid,
        entity_type: Option<EntityType>,
        page: PageRequest,
    ) -> RepoResult<Page<AuditBatch>>;

    /// Batches filed under a reference key, newest first
    async fn timeline_by_reference(
        &self,
        reference: &AuditReference,
        page: PageRequest,
    ) -> RepoResult<Page<AuditBatch>>;

    /// Every row of one batch in write order
    async fn batch_detail(&self, batch_id: Uuid) -> RepoResult<Vec<AuditRecord>>;
}

// ============================================================================
// Schema Migrator
// ============================================================================

/// Migration runner guarded by a named, process-external lock
///
/// The lock is held by the migrator itself (e.g. a dedicated database
/// session), which is why every operation takes `&mut self`.
#[async_trait]
pub trait SchemaMigrator: Send {
    /// Try to take the lock without blocking
    async fn try_lock(&mut self) -> RepoResult<bool>;

    /// Apply pending migrations; applying twice is a no-op
    async fn apply(&mut self) -> RepoResult<()>;

    /// Release the lock
    async fn unlock(&mut self) -> RepoResult<()>;
}
