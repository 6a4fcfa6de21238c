//! Incident handlers
//!
//! Endpoints for incident report operations.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use incident_service::dto::{
    CreateIncidentRequest, IncidentResponse, PageResponse, RowVersionQuery, UpdateIncidentRequest,
};
use incident_service::IncidentService;

use crate::extractors::{AuthUser, IncidentIdPath, Pagination, ValidatedJson};
use crate::response::{ApiResult, Created, NoContent};
use crate::state::AppState;

/// Report an incident
///
/// POST /incidents
pub async fn create_incident(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(request): ValidatedJson<CreateIncidentRequest>,
) -> ApiResult<Created<Json<IncidentResponse>>> {
    let service = IncidentService::new(state.service_context());
    let response = service.create_incident(auth.user_id, request).await?;
    Ok(Created(Json(response)))
}

/// List incidents
///
/// GET /incidents
pub async fn list_incidents(
    State(state): State<AppState>,
    _auth: AuthUser,
    Pagination(page): Pagination,
) -> ApiResult<Json<PageResponse<IncidentResponse>>> {
    let service = IncidentService::new(state.service_context());
    let incidents = service.list_incidents(page).await?;
    Ok(Json(incidents))
}

/// Get incident by ID
///
/// GET /incidents/{incident_id}
pub async fn get_incident(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(path): Path<IncidentIdPath>,
) -> ApiResult<Json<IncidentResponse>> {
    let incident_id = path.incident_id()?;

    let service = IncidentService::new(state.service_context());
    let response = service.get_incident(incident_id).await?;
    Ok(Json(response))
}

/// Update incident
///
/// PATCH /incidents/{incident_id}
pub async fn update_incident(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<IncidentIdPath>,
    ValidatedJson(request): ValidatedJson<UpdateIncidentRequest>,
) -> ApiResult<Json<IncidentResponse>> {
    let incident_id = path.incident_id()?;

    let service = IncidentService::new(state.service_context());
    let response = service
        .update_incident(incident_id, auth.user_id, request)
        .await?;
    Ok(Json(response))
}

/// Delete incident
///
/// DELETE /incidents/{incident_id}?rowVersion={version}
pub async fn delete_incident(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<IncidentIdPath>,
    Query(query): Query<RowVersionQuery>,
) -> ApiResult<NoContent> {
    let incident_id = path.incident_id()?;

    let service = IncidentService::new(state.service_context());
    service
        .delete_incident(incident_id, auth.user_id, query.row_version)
        .await?;
    Ok(NoContent)
}
