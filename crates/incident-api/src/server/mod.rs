//! Server setup and initialization
//!
//! Provides the main application builder and server runner.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use incident_common::{AppConfig, AppError, JwtService, MigrationConfig};
use incident_db::{
    create_pool, PgAuditLogRepository, PgCommentRepository, PgIncidentRepository, PgPool,
    PgSchemaMigrator, PoolConfig,
};
use incident_service::{run_guarded_migration, MigrationOutcome, ServiceContextBuilder};
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::middleware::apply_middleware_with_config;
use crate::routes::{create_router, health_routes};
use crate::state::AppState;

/// Build the complete Axum application with all routes and middleware
///
/// Health routes sit outside the rate limiter.
pub fn create_app(state: AppState) -> Result<Router, AppError> {
    let config = state.config();
    let api = apply_middleware_with_config(
        create_router(),
        &config.rate_limit,
        &config.cors,
        config.app.env.is_production(),
    )?;

    Ok(api.merge(health_routes()).with_state(state))
}

/// Apply pending migrations under the cross-instance lock
///
/// Never fails: problems are logged and startup continues.
pub async fn migrate_on_startup(pool: &PgPool, config: &MigrationConfig) -> MigrationOutcome {
    let mut migrator = match PgSchemaMigrator::connect(pool, &config.dir, &config.lock_name).await
    {
        Ok(migrator) => migrator,
        Err(e) => {
            warn!(error = %e, dir = %config.dir.display(), "could not prepare migrations, skipping");
            return MigrationOutcome::Failed;
        }
    };

    let outcome = run_guarded_migration(
        &mut migrator,
        config.lock_timeout(),
        config.lock_poll_interval(),
    )
    .await;

    if let Err(e) = migrator.close().await {
        warn!(error = %e, "could not close migration session");
    }

    outcome
}

/// Initialize all dependencies and create AppState
pub async fn create_app_state(config: AppConfig) -> Result<AppState, AppError> {
    // Create database pool
    info!("Connecting to PostgreSQL...");
    let pool = create_pool(&PoolConfig::from(&config.database))
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    info!("PostgreSQL connection established");

    // Migrate before serving
    if config.migrations.enabled {
        let outcome = migrate_on_startup(&pool, &config.migrations).await;
        info!(outcome = ?outcome, "Startup migration finished");
    } else {
        info!("Startup migration disabled");
    }

    // Create JWT service
    let jwt_service = Arc::new(JwtService::new(
        &config.jwt.secret,
        config.jwt.access_token_expiry,
    ));

    // Create repositories
    let incident_repo = Arc::new(PgIncidentRepository::new(pool.clone()));
    let comment_repo = Arc::new(PgCommentRepository::new(pool.clone()));
    let audit_repo = Arc::new(PgAuditLogRepository::new(pool.clone()));

    // Build service context
    let service_context = ServiceContextBuilder::new()
        .incident_repo(incident_repo)
        .comment_repo(comment_repo)
        .audit_repo(audit_repo)
        .jwt_service(jwt_service)
        .audit_config(config.audit.clone())
        .build()
        .map_err(|e| AppError::Config(e.to_string()))?;

    Ok(AppState::new(service_context, pool, config))
}

/// Run the HTTP server
pub async fn run_server(app: Router, addr: SocketAddr) -> Result<(), AppError> {
    info!(%addr, "Starting HTTP server");

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::Server(format!("Failed to bind to {addr}: {e}")))?;

    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .await
        .map_err(|e| AppError::Server(e.to_string()))?;

    Ok(())
}

/// Run the complete server with configuration
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let addr: SocketAddr = config
        .api
        .address()
        .parse()
        .map_err(|e| AppError::Config(format!("Invalid listen address: {e}")))?;

    // Create app state
    let state = create_app_state(config).await?;

    // Build application
    let app = create_app(state)?;

    // Run server
    run_server(app, addr).await
}
