//! Audit service
//!
//! [`AuditRecorder`] turns before/after entity states into the batch a
//! repository persists with the write. [`AuditService`] serves the timeline
//! and batch detail reads.

use chrono::Utc;
use incident_core::audit::{compute_diff, AuditReference, Auditable, NewAuditBatch};
use incident_core::{ActionType, DomainError, EntityType, PageRequest};
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::dto::{AuditBatchResponse, AuditLogResponse, PageResponse, TimelineQuery};

use super::context::ServiceContext;
use super::error::ServiceResult;

// ============================================================================
// Recording
// ============================================================================

/// Builds audit batches from entity snapshots
#[derive(Debug, Clone, Copy)]
pub struct AuditRecorder {
    /// Characters kept per value, 0 keeps everything
    max_value_length: usize,
}

impl AuditRecorder {
    pub fn new(max_value_length: usize) -> Self {
        Self { max_value_length }
    }

    pub fn max_value_length(&self) -> usize {
        self.max_value_length
    }

    /// Batch for a newly inserted entity
    pub fn created<T: Auditable>(&self, entity: &T, user_id: Uuid) -> NewAuditBatch {
        self.record(ActionType::Create, entity, None, Some(entity), user_id)
    }

    /// Batch for a modified entity, `None` when no audited field changed
    pub fn updated<T: Auditable>(
        &self,
        before: &T,
        after: &T,
        user_id: Uuid,
    ) -> Option<NewAuditBatch> {
        let batch = self.record(ActionType::Update, after, Some(before), Some(after), user_id);
        (!batch.is_empty()).then_some(batch)
    }

    /// Batch for a removed entity, old values are its last state
    pub fn deleted<T: Auditable>(&self, entity: &T, user_id: Uuid) -> NewAuditBatch {
        self.record(ActionType::Delete, entity, Some(entity), None, user_id)
    }

    fn record<T: Auditable>(
        &self,
        action: ActionType,
        entity: &T,
        before: Option<&T>,
        after: Option<&T>,
        user_id: Uuid,
    ) -> NewAuditBatch {
        let before = before.map(T::snapshot);
        let after = after.map(T::snapshot);
        let changes = compute_diff(before.as_ref(), after.as_ref());

        let batch = NewAuditBatch::new(
            T::ENTITY_TYPE,
            entity.entity_id(),
            action,
            changes,
            user_id,
            Utc::now(),
        )
        .with_reference(entity.audit_reference());

        if self.max_value_length == 0 {
            batch
        } else {
            batch.truncate_values(self.max_value_length)
        }
    }
}

// ============================================================================
// Reading
// ============================================================================

fn parse_entity_type(name: &str) -> Result<EntityType, DomainError> {
    name.parse()
        .map_err(|_| DomainError::UnknownEntityType(name.to_string()))
}

fn parse_id(raw: &str) -> Result<Uuid, DomainError> {
    Uuid::parse_str(raw).map_err(|_| DomainError::InvalidReference(raw.to_string()))
}

/// Audit timeline service
pub struct AuditService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> AuditService<'a> {
    /// Create a new AuditService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Batches recorded for one entity, newest first
    #[instrument(skip(self))]
    pub async fn entity_timeline(
        &self,
        query: TimelineQuery,
        page: PageRequest,
    ) -> ServiceResult<PageResponse<AuditBatchResponse>> {
        let entity_id = parse_id(&query.entity_id)?;
        let entity_type = query
            .entity_type
            .as_deref()
            .map(parse_entity_type)
            .transpose()?;

        let batches = self
            .ctx
            .audit_repo()
            .timeline_by_entity(entity_id, entity_type, page)
            .await?;

        debug!(batches = batches.items.len(), total = batches.total, "entity timeline");
        Ok(PageResponse::from_page(batches, Into::into))
    }

    /// Batches filed under a reference, e.g. an incident and all its comments
    #[instrument(skip(self))]
    pub async fn reference_timeline(
        &self,
        reference_entity_name: &str,
        reference_id: &str,
        page: PageRequest,
    ) -> ServiceResult<PageResponse<AuditBatchResponse>> {
        let reference = AuditReference::new(
            parse_entity_type(reference_entity_name)?,
            parse_id(reference_id)?,
        );

        let batches = self
            .ctx
            .audit_repo()
            .timeline_by_reference(&reference, page)
            .await?;

        debug!(batches = batches.items.len(), total = batches.total, "reference timeline");
        Ok(PageResponse::from_page(batches, Into::into))
    }

    /// Every row of one batch; an unknown batch id has no rows
    #[instrument(skip(self))]
    pub async fn batch_detail(&self, batch_id: &str) -> ServiceResult<Vec<AuditLogResponse>> {
        let batch_id = parse_id(batch_id)?;

        let records = self.ctx.audit_repo().batch_detail(batch_id).await?;

        Ok(records.into_iter().map(Into::into).collect())
    }
}
