//! Incident service
//!
//! Handles incident creation, updates, deletion, and queries. Every mutation
//! is persisted together with its audit batch.

use chrono::Utc;
use incident_core::entities::IncidentReport;
use incident_core::{DomainError, PageRequest};
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::dto::{CreateIncidentRequest, IncidentResponse, PageResponse, UpdateIncidentRequest};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Incident service
pub struct IncidentService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> IncidentService<'a> {
    /// Create a new IncidentService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Report a new incident
    #[instrument(skip(self, request))]
    pub async fn create_incident(
        &self,
        user_id: Uuid,
        request: CreateIncidentRequest,
    ) -> ServiceResult<IncidentResponse> {
        let title = request.title.trim().to_string();
        if title.is_empty() {
            return Err(ServiceError::validation("Title must not be blank"));
        }

        let mut incident = IncidentReport::new(
            title,
            request.description,
            request.priority.unwrap_or_default(),
            request.unit_identifier,
            user_id,
            request.occurred_utc.unwrap_or_else(Utc::now),
        )
        .with_location(request.location);
        incident.assigned_to_user_id = request.assigned_to_user_id;

        let audit = self.ctx.audit_recorder().created(&incident, user_id);
        self.ctx.incident_repo().create(&incident, &audit).await?;

        info!(
            incident_id = %incident.id,
            batch_id = %audit.batch_id,
            rows = audit.row_count(),
            "Incident created"
        );

        Ok(IncidentResponse::from(incident))
    }

    /// Get an incident by ID
    #[instrument(skip(self))]
    pub async fn get_incident(&self, incident_id: Uuid) -> ServiceResult<IncidentResponse> {
        let incident = self.find(incident_id).await?;
        Ok(IncidentResponse::from(incident))
    }

    /// List incidents, most recently occurred first
    #[instrument(skip(self))]
    pub async fn list_incidents(
        &self,
        page: PageRequest,
    ) -> ServiceResult<PageResponse<IncidentResponse>> {
        let incidents = self.ctx.incident_repo().list(page).await?;
        Ok(PageResponse::from_page(incidents, IncidentResponse::from))
    }

    /// Apply a partial update
    ///
    /// Fails with a conflict when `rowVersion` is not the stored version. An
    /// update that changes no audited field writes nothing.
    #[instrument(skip(self, request))]
    pub async fn update_incident(
        &self,
        incident_id: Uuid,
        user_id: Uuid,
        request: UpdateIncidentRequest,
    ) -> ServiceResult<IncidentResponse> {
        let before = self.find(incident_id).await?;
        if before.row_version != request.row_version {
            return Err(DomainError::StaleVersion {
                expected: request.row_version,
                actual: before.row_version,
            }
            .into());
        }

        let mut after = before.clone();
        apply_update(&mut after, request)?;

        let Some(audit) = self.ctx.audit_recorder().updated(&before, &after, user_id) else {
            debug!(incident_id = %incident_id, "Incident update changed nothing");
            return Ok(IncidentResponse::from(before));
        };

        after.touch();
        self.ctx
            .incident_repo()
            .update(&after, before.row_version, &audit)
            .await?;
        after.row_version = before.row_version + 1;

        info!(
            incident_id = %incident_id,
            batch_id = %audit.batch_id,
            rows = audit.row_count(),
            "Incident updated"
        );

        Ok(IncidentResponse::from(after))
    }

    /// Delete an incident
    ///
    /// `expected_version` guards against deleting a version the caller has
    /// not seen. Incidents with comments cannot be deleted.
    #[instrument(skip(self))]
    pub async fn delete_incident(
        &self,
        incident_id: Uuid,
        user_id: Uuid,
        expected_version: Option<i32>,
    ) -> ServiceResult<()> {
        let incident = self.find(incident_id).await?;
        let expected_version = expected_version.unwrap_or(incident.row_version);

        let audit = self.ctx.audit_recorder().deleted(&incident, user_id);
        self.ctx
            .incident_repo()
            .delete(incident_id, expected_version, &audit)
            .await?;

        info!(incident_id = %incident_id, batch_id = %audit.batch_id, "Incident deleted");

        Ok(())
    }

    async fn find(&self, incident_id: Uuid) -> ServiceResult<IncidentReport> {
        self.ctx
            .incident_repo()
            .find_by_id(incident_id)
            .await?
            .ok_or_else(|| DomainError::IncidentNotFound(incident_id).into())
    }
}

fn apply_update(incident: &mut IncidentReport, request: UpdateIncidentRequest) -> ServiceResult<()> {
    if let Some(title) = request.title {
        let title = title.trim().to_string();
        if title.is_empty() {
            return Err(ServiceError::validation("Title must not be blank"));
        }
        incident.title = title;
    }
    if let Some(description) = request.description {
        incident.description = description;
    }
    if let Some(status) = request.status {
        incident.status = status;
    }
    if let Some(priority) = request.priority {
        incident.priority = priority;
    }
    if let Some(unit_identifier) = request.unit_identifier {
        incident.unit_identifier = unit_identifier;
    }
    if let Some(location) = request.location {
        incident.location = location;
    }
    if let Some(assigned_to_user_id) = request.assigned_to_user_id {
        incident.assigned_to_user_id = assigned_to_user_id;
    }
    if let Some(occurred_utc) = request.occurred_utc {
        incident.occurred_utc = occurred_utc;
    }
    Ok(())
}
