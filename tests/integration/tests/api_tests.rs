//! API Integration Tests
//!
//! These tests require:
//! - Running PostgreSQL instance
//! - Environment variable: DATABASE_URL
//!
//! Run with: cargo test -p integration-tests --test api_tests

use integration_tests::{assert_json, assert_status, check_test_env, fixtures::*, TestServer};
use reqwest::StatusCode;
use uuid::Uuid;

async fn create_incident(server: &TestServer, token: &str) -> IncidentBody {
    let response = server
        .post_auth("/api/v1/incidents", token, &CreateIncidentFixture::unique())
        .await
        .expect("Request failed");
    assert_json(response, StatusCode::CREATED).await.unwrap()
}

async fn entity_timeline(
    server: &TestServer,
    token: &str,
    query: &str,
) -> PageBody<AuditBatchBody> {
    let response = server
        .get_auth(&format!("/api/v1/audit/timeline?{query}"), token)
        .await
        .expect("Request failed");
    assert_json(response, StatusCode::OK).await.unwrap()
}

// ============================================================================
// Health Check Tests
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/health").await.expect("Request failed");
    assert_status(response, StatusCode::OK).await.unwrap();
}

#[tokio::test]
async fn test_health_ready() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/health/ready").await.expect("Request failed");
    assert_status(response, StatusCode::OK).await.unwrap();
}

// ============================================================================
// Auth Tests
// ============================================================================

#[tokio::test]
async fn test_requires_bearer_token() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/api/v1/incidents").await.unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();
}

// ============================================================================
// Incident + Timeline Tests
// ============================================================================

#[tokio::test]
async fn test_create_records_one_batch() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let user_id = Uuid::new_v4();
    let token = server.token_for(user_id).unwrap();
    let incident = create_incident(&server, &token).await;

    assert_eq!(incident.status, "Open");
    assert_eq!(incident.row_version, 1);

    let page = entity_timeline(&server, &token, &format!("entityId={}", incident.id)).await;
    assert_eq!(page.total, 1);
    assert_eq!(page.items.len(), 1);

    let batch = &page.items[0];
    assert_eq!(batch.action_type, "Create");
    assert_eq!(batch.entity_type, "IncidentReport");
    assert_eq!(batch.entity_id, incident.id);
    assert_eq!(batch.changed_by_user_id, user_id);

    let status = batch.field("Status").expect("Status change recorded");
    assert_eq!(status.old_value, None);
    assert_eq!(status.new_value.as_deref(), Some("Open"));
    assert!(batch.fields.iter().all(|f| f.old_value.is_none()));
}

#[tokio::test]
async fn test_status_change_detail() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let token = server.token().unwrap();
    let incident = create_incident(&server, &token).await;

    let response = server
        .patch_auth(
            &format!("/api/v1/incidents/{}", incident.id),
            &token,
            &StatusUpdateFixture::new(incident.row_version, "InProgress"),
        )
        .await
        .unwrap();
    let updated: IncidentBody = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(updated.status, "InProgress");
    assert_eq!(updated.row_version, incident.row_version + 1);

    let page = entity_timeline(&server, &token, &format!("entityId={}", incident.id)).await;
    assert_eq!(page.total, 2);
    // Newest batch first
    assert_eq!(page.items[0].action_type, "Update");
    assert_eq!(page.items[1].action_type, "Create");

    let response = server
        .get_auth(
            &format!("/api/v1/audit/batch/{}", page.items[0].batch_id),
            &token,
        )
        .await
        .unwrap();
    let rows: Vec<AuditLogBody> = assert_json(response, StatusCode::OK).await.unwrap();

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].field_name, "Status");
    assert_eq!(rows[0].old_value.as_deref(), Some("Open"));
    assert_eq!(rows[0].new_value.as_deref(), Some("InProgress"));
    assert_eq!(rows[0].action_type, "Update");
    assert_eq!(rows[0].entity_id, incident.id);
    assert_eq!(rows[0].reference_entity_name.as_deref(), Some("IncidentReport"));
    assert_eq!(rows[0].reference_id, Some(incident.id));
}

#[tokio::test]
async fn test_full_lifecycle() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let token = server.token().unwrap();
    let incident = create_incident(&server, &token).await;

    let response = server
        .patch_auth(
            &format!("/api/v1/incidents/{}", incident.id),
            &token,
            &StatusUpdateFixture::new(incident.row_version, "Closed"),
        )
        .await
        .unwrap();
    let updated: IncidentBody = assert_json(response, StatusCode::OK).await.unwrap();

    let response = server
        .delete_auth(
            &format!(
                "/api/v1/incidents/{}?rowVersion={}",
                incident.id, updated.row_version
            ),
            &token,
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::NO_CONTENT).await.unwrap();

    let response = server
        .get_auth(&format!("/api/v1/incidents/{}", incident.id), &token)
        .await
        .unwrap();
    assert_status(response, StatusCode::NOT_FOUND).await.unwrap();

    let page = entity_timeline(&server, &token, &format!("entityId={}", incident.id)).await;
    let actions: Vec<&str> = page.items.iter().map(|b| b.action_type.as_str()).collect();
    assert_eq!(actions, vec!["Delete", "Update", "Create"]);

    let delete = &page.items[0];
    assert!(delete.fields.iter().all(|f| f.new_value.is_none()));
    assert_eq!(
        delete.field("Status").and_then(|f| f.old_value.as_deref()),
        Some("Closed")
    );
}

#[tokio::test]
async fn test_noop_update_writes_nothing() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let token = server.token().unwrap();
    let incident = create_incident(&server, &token).await;

    let response = server
        .patch_auth(
            &format!("/api/v1/incidents/{}", incident.id),
            &token,
            &StatusUpdateFixture::new(incident.row_version, "Open"),
        )
        .await
        .unwrap();
    let unchanged: IncidentBody = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(unchanged.row_version, incident.row_version);

    let page = entity_timeline(&server, &token, &format!("entityId={}", incident.id)).await;
    assert_eq!(page.total, 1);
}

#[tokio::test]
async fn test_stale_row_version_conflicts() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let token = server.token().unwrap();
    let incident = create_incident(&server, &token).await;
    let path = format!("/api/v1/incidents/{}", incident.id);

    let response = server
        .patch_auth(
            &path,
            &token,
            &StatusUpdateFixture::new(incident.row_version, "InProgress"),
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();

    // Second writer still holds the original version
    let response = server
        .patch_auth(
            &path,
            &token,
            &StatusUpdateFixture::new(incident.row_version, "Closed"),
        )
        .await
        .unwrap();
    let error: ErrorBody = assert_json(response, StatusCode::CONFLICT).await.unwrap();
    assert_eq!(error.error.code, "STALE_ROW_VERSION");

    let page = entity_timeline(&server, &token, &format!("entityId={}", incident.id)).await;
    assert_eq!(page.total, 2);
}

// ============================================================================
// Timeline Query Tests
// ============================================================================

#[tokio::test]
async fn test_unknown_entity_type_rejected() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let token = server.token().unwrap();

    let response = server
        .get_auth(
            &format!(
                "/api/v1/audit/timeline?entityId={}&entityType=Vehicle",
                Uuid::new_v4()
            ),
            &token,
        )
        .await
        .unwrap();
    let error: ErrorBody = assert_json(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(error.error.code, "UNKNOWN_ENTITY_TYPE");

    let response = server
        .get_auth(
            &format!("/api/v1/audit/Vehicle/{}/timeline", Uuid::new_v4()),
            &token,
        )
        .await
        .unwrap();
    let error: ErrorBody = assert_json(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(error.error.code, "UNKNOWN_ENTITY_TYPE");
}

#[tokio::test]
async fn test_malformed_ids_rejected() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let token = server.token().unwrap();

    for path in [
        "/api/v1/audit/timeline?entityId=not-a-uuid",
        "/api/v1/audit/batch/not-a-uuid",
        "/api/v1/audit/IncidentReport/not-a-uuid/timeline",
    ] {
        let response = server.get_auth(path, &token).await.unwrap();
        let error: ErrorBody = assert_json(response, StatusCode::BAD_REQUEST)
            .await
            .unwrap();
        assert_eq!(error.error.code, "INVALID_REFERENCE", "path {path}");
    }
}

#[tokio::test]
async fn test_unknown_batch_is_empty() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let token = server.token().unwrap();

    let response = server
        .get_auth(&format!("/api/v1/audit/batch/{}", Uuid::new_v4()), &token)
        .await
        .unwrap();
    let rows: Vec<AuditLogBody> = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(rows.is_empty());
}

#[tokio::test]
async fn test_pagination_past_last_batch() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let token = server.token().unwrap();
    let incident = create_incident(&server, &token).await;

    let page = entity_timeline(
        &server,
        &token,
        &format!("entityId={}&page=2&limit=1", incident.id),
    )
    .await;
    assert!(page.items.is_empty());
    assert_eq!(page.total, 1);
    assert_eq!(page.page, 2);
    assert_eq!(page.limit, 1);

    let response = server
        .get_auth(
            &format!("/api/v1/audit/timeline?entityId={}&page=0", incident.id),
            &token,
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::BAD_REQUEST).await.unwrap();
}

// ============================================================================
// Comment Tests
// ============================================================================

#[tokio::test]
async fn test_reference_timeline_includes_comments() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let token = server.token().unwrap();
    let incident = create_incident(&server, &token).await;

    let response = server
        .post_auth(
            &format!("/api/v1/incidents/{}/comments", incident.id),
            &token,
            &CommentFixture::new("Crew dispatched"),
        )
        .await
        .unwrap();
    let comment: CommentBody = assert_json(response, StatusCode::CREATED).await.unwrap();
    assert_eq!(comment.incident_id, incident.id);
    assert_eq!(comment.body, "Crew dispatched");
    assert_eq!(comment.row_version, 1);

    // The comment's own timeline is keyed by the comment id
    let page = entity_timeline(
        &server,
        &token,
        &format!("entityId={}&entityType=IncidentComment", comment.id),
    )
    .await;
    assert_eq!(page.total, 1);

    let response = server
        .get_auth(
            &format!("/api/v1/audit/IncidentReport/{}/timeline", incident.id),
            &token,
        )
        .await
        .unwrap();
    let page: PageBody<AuditBatchBody> = assert_json(response, StatusCode::OK).await.unwrap();

    assert_eq!(page.total, 2);
    assert_eq!(page.items[0].entity_type, "IncidentComment");
    assert_eq!(page.items[0].entity_id, comment.id);
    assert_eq!(page.items[1].entity_type, "IncidentReport");
    assert_eq!(page.items[1].entity_id, incident.id);
}

#[tokio::test]
async fn test_delete_incident_with_comments_conflicts() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let token = server.token().unwrap();
    let incident = create_incident(&server, &token).await;

    let response = server
        .post_auth(
            &format!("/api/v1/incidents/{}/comments", incident.id),
            &token,
            &CommentFixture::new("Holding for parts"),
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::CREATED).await.unwrap();

    let response = server
        .delete_auth(&format!("/api/v1/incidents/{}", incident.id), &token)
        .await
        .unwrap();
    let error: ErrorBody = assert_json(response, StatusCode::CONFLICT).await.unwrap();
    assert_eq!(error.error.code, "INCIDENT_HAS_COMMENTS");

    // The failed delete left no batch behind
    let page = entity_timeline(&server, &token, &format!("entityId={}", incident.id)).await;
    assert_eq!(page.total, 1);
}
