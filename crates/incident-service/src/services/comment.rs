//! Comment service
//!
//! Handles comments on incidents. Comment audit rows are filed under the
//! parent incident so its timeline shows them.

use incident_core::entities::IncidentComment;
use incident_core::{DomainError, PageRequest};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::dto::{CommentResponse, CreateCommentRequest, PageResponse, UpdateCommentRequest};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Comment service
pub struct CommentService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> CommentService<'a> {
    /// Create a new CommentService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Add a comment to an incident
    #[instrument(skip(self, request))]
    pub async fn create_comment(
        &self,
        incident_id: Uuid,
        user_id: Uuid,
        request: CreateCommentRequest,
    ) -> ServiceResult<CommentResponse> {
        self.require_incident(incident_id).await?;

        let comment = IncidentComment::new(incident_id, user_id, request.body);

        let audit = self.ctx.audit_recorder().created(&comment, user_id);
        self.ctx.comment_repo().create(&comment, &audit).await?;

        info!(
            comment_id = %comment.id,
            incident_id = %incident_id,
            batch_id = %audit.batch_id,
            "Comment created"
        );

        Ok(CommentResponse::from(comment))
    }

    /// List comments of an incident, oldest first
    #[instrument(skip(self))]
    pub async fn list_comments(
        &self,
        incident_id: Uuid,
        page: PageRequest,
    ) -> ServiceResult<PageResponse<CommentResponse>> {
        self.require_incident(incident_id).await?;

        let comments = self
            .ctx
            .comment_repo()
            .list_by_incident(incident_id, page)
            .await?;

        Ok(PageResponse::from_page(comments, CommentResponse::from))
    }

    /// Replace the body of a comment
    #[instrument(skip(self, request))]
    pub async fn update_comment(
        &self,
        incident_id: Uuid,
        comment_id: Uuid,
        user_id: Uuid,
        request: UpdateCommentRequest,
    ) -> ServiceResult<CommentResponse> {
        let before = self.find(incident_id, comment_id).await?;
        if before.row_version != request.row_version {
            return Err(DomainError::StaleVersion {
                expected: request.row_version,
                actual: before.row_version,
            }
            .into());
        }

        let mut after = before.clone();
        after.edit(request.body);

        let Some(audit) = self.ctx.audit_recorder().updated(&before, &after, user_id) else {
            return Ok(CommentResponse::from(before));
        };

        self.ctx
            .comment_repo()
            .update(&after, before.row_version, &audit)
            .await?;
        after.row_version = before.row_version + 1;

        info!(comment_id = %comment_id, batch_id = %audit.batch_id, "Comment updated");

        Ok(CommentResponse::from(after))
    }

    /// Delete a comment
    #[instrument(skip(self))]
    pub async fn delete_comment(
        &self,
        incident_id: Uuid,
        comment_id: Uuid,
        user_id: Uuid,
        expected_version: Option<i32>,
    ) -> ServiceResult<()> {
        let comment = self.find(incident_id, comment_id).await?;
        let expected_version = expected_version.unwrap_or(comment.row_version);

        let audit = self.ctx.audit_recorder().deleted(&comment, user_id);
        self.ctx
            .comment_repo()
            .delete(comment_id, expected_version, &audit)
            .await?;

        info!(comment_id = %comment_id, batch_id = %audit.batch_id, "Comment deleted");

        Ok(())
    }

    async fn require_incident(&self, incident_id: Uuid) -> ServiceResult<()> {
        self.ctx
            .incident_repo()
            .find_by_id(incident_id)
            .await?
            .map(|_| ())
            .ok_or_else(|| DomainError::IncidentNotFound(incident_id).into())
    }

    /// Find a comment, treating a comment of another incident as missing
    async fn find(&self, incident_id: Uuid, comment_id: Uuid) -> ServiceResult<IncidentComment> {
        match self.ctx.comment_repo().find_by_id(comment_id).await? {
            Some(comment) if comment.incident_id == incident_id => Ok(comment),
            _ => Err(ServiceError::Domain(DomainError::CommentNotFound(comment_id))),
        }
    }
}
