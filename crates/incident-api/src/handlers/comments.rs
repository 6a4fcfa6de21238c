//! Comment handlers
//!
//! Endpoints for comments on incidents.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use incident_service::dto::{
    CommentResponse, CreateCommentRequest, PageResponse, RowVersionQuery, UpdateCommentRequest,
};
use incident_service::CommentService;

use crate::extractors::{AuthUser, CommentPath, IncidentIdPath, Pagination, ValidatedJson};
use crate::response::{ApiResult, Created, NoContent};
use crate::state::AppState;

/// Comment on an incident
///
/// POST /incidents/{incident_id}/comments
pub async fn create_comment(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<IncidentIdPath>,
    ValidatedJson(request): ValidatedJson<CreateCommentRequest>,
) -> ApiResult<Created<Json<CommentResponse>>> {
    let incident_id = path.incident_id()?;

    let service = CommentService::new(state.service_context());
    let response = service
        .create_comment(incident_id, auth.user_id, request)
        .await?;
    Ok(Created(Json(response)))
}

/// List comments of an incident
///
/// GET /incidents/{incident_id}/comments
pub async fn list_comments(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(path): Path<IncidentIdPath>,
    Pagination(page): Pagination,
) -> ApiResult<Json<PageResponse<CommentResponse>>> {
    let incident_id = path.incident_id()?;

    let service = CommentService::new(state.service_context());
    let comments = service.list_comments(incident_id, page).await?;
    Ok(Json(comments))
}

/// Edit a comment
///
/// PATCH /incidents/{incident_id}/comments/{comment_id}
pub async fn update_comment(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<CommentPath>,
    ValidatedJson(request): ValidatedJson<UpdateCommentRequest>,
) -> ApiResult<Json<CommentResponse>> {
    let incident_id = path.incident_id()?;
    let comment_id = path.comment_id()?;

    let service = CommentService::new(state.service_context());
    let response = service
        .update_comment(incident_id, comment_id, auth.user_id, request)
        .await?;
    Ok(Json(response))
}

/// Delete a comment
///
/// DELETE /incidents/{incident_id}/comments/{comment_id}?rowVersion={version}
pub async fn delete_comment(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<CommentPath>,
    Query(query): Query<RowVersionQuery>,
) -> ApiResult<NoContent> {
    let incident_id = path.incident_id()?;
    let comment_id = path.comment_id()?;

    let service = CommentService::new(state.service_context());
    service
        .delete_comment(incident_id, comment_id, auth.user_id, query.row_version)
        .await?;
    Ok(NoContent)
}
