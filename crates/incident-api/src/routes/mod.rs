//! Route definitions
//!
//! All API routes organized by domain and mounted under /api/v1.

use axum::{
    routing::{get, patch, post},
    Router,
};

use crate::handlers::{audit, comments, health, incidents};
use crate::state::AppState;

/// Create the main API router with all routes (excluding health for separate middleware handling)
pub fn create_router() -> Router<AppState> {
    Router::new()
        // API v1 endpoints
        .nest("/api/v1", api_v1_routes())
}

/// Health check routes (exported separately to bypass rate limiting)
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
}

/// API v1 routes
fn api_v1_routes() -> Router<AppState> {
    Router::new()
        .merge(audit_routes())
        .merge(incident_routes())
        .merge(comment_routes())
}

/// Audit timeline routes
fn audit_routes() -> Router<AppState> {
    Router::new()
        .route("/audit/timeline", get(audit::entity_timeline))
        .route("/audit/batch/:batch_id", get(audit::batch_detail))
        .route(
            "/audit/:reference_entity_name/:reference_id/timeline",
            get(audit::reference_timeline),
        )
}

/// Incident routes
fn incident_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/incidents",
            post(incidents::create_incident).get(incidents::list_incidents),
        )
        .route(
            "/incidents/:incident_id",
            get(incidents::get_incident)
                .patch(incidents::update_incident)
                .delete(incidents::delete_incident),
        )
}

/// Comment routes
fn comment_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/incidents/:incident_id/comments",
            post(comments::create_comment).get(comments::list_comments),
        )
        .route(
            "/incidents/:incident_id/comments/:comment_id",
            patch(comments::update_comment).delete(comments::delete_comment),
        )
}
