//! Audit timeline handlers
//!
//! Read-only endpoints over the audit trail. Unknown ids give empty results.

use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    Json,
};
use incident_service::dto::{AuditBatchResponse, AuditLogResponse, PageResponse, TimelineQuery};
use incident_service::AuditService;

use crate::extractors::{AuthUser, Pagination, ReferencePath};
use crate::response::{ApiError, ApiResult};
use crate::state::AppState;

/// Timeline of one entity
///
/// GET /audit/timeline?entityId={id}&entityType={name}
pub async fn entity_timeline(
    State(state): State<AppState>,
    _auth: AuthUser,
    query: Result<Query<TimelineQuery>, QueryRejection>,
    Pagination(page): Pagination,
) -> ApiResult<Json<PageResponse<AuditBatchResponse>>> {
    let Query(query) = query.map_err(|e| ApiError::invalid_query(e.body_text()))?;

    let service = AuditService::new(state.service_context());
    let timeline = service.entity_timeline(query, page).await?;
    Ok(Json(timeline))
}

/// Timeline of everything filed under a reference
///
/// GET /audit/{reference_entity_name}/{reference_id}/timeline
pub async fn reference_timeline(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(path): Path<ReferencePath>,
    Pagination(page): Pagination,
) -> ApiResult<Json<PageResponse<AuditBatchResponse>>> {
    let service = AuditService::new(state.service_context());
    let timeline = service
        .reference_timeline(&path.reference_entity_name, &path.reference_id, page)
        .await?;
    Ok(Json(timeline))
}

/// Every row of one batch
///
/// GET /audit/batch/{batch_id}
pub async fn batch_detail(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(batch_id): Path<String>,
) -> ApiResult<Json<Vec<AuditLogResponse>>> {
    let service = AuditService::new(state.service_context());
    let rows = service.batch_detail(&batch_id).await?;
    Ok(Json(rows))
}
