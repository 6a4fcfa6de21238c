//! PostgreSQL implementation of IncidentRepository

use async_trait::async_trait;
use sqlx::{PgConnection, PgPool};
use tracing::instrument;
use uuid::Uuid;

use incident_core::audit::NewAuditBatch;
use incident_core::entities::IncidentReport;
use incident_core::error::DomainError;
use incident_core::traits::{IncidentRepository, RepoResult};
use incident_core::value_objects::{Page, PageRequest};

use crate::models::{CountModel, IncidentModel};

use super::audit_log::insert_batch;
use super::error::{
    incident_not_found, map_db_error, map_foreign_key_violation, to_bind, version_conflict,
};

/// PostgreSQL implementation of IncidentRepository
#[derive(Clone)]
pub struct PgIncidentRepository {
    pool: PgPool,
}

impl PgIncidentRepository {
    /// Create a new PgIncidentRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Stored row version of an incident, if the incident exists
async fn current_version(conn: &mut PgConnection, id: Uuid) -> RepoResult<Option<i32>> {
    sqlx::query_scalar::<_, i32>("SELECT row_version FROM incident_reports WHERE id = $1")
        .bind(id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(map_db_error)
}

#[async_trait]
impl IncidentRepository for PgIncidentRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<IncidentReport>> {
        let result = sqlx::query_as::<_, IncidentModel>(
            r#"
            SELECT id, title, description, status, priority, unit_identifier, location,
                   reported_by_user_id, assigned_to_user_id, occurred_utc, created_utc,
                   updated_utc, row_version
            FROM incident_reports
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(IncidentReport::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn list(&self, page: PageRequest) -> RepoResult<Page<IncidentReport>> {
        let count = sqlx::query_as::<_, CountModel>(
            "SELECT COUNT(*) AS total FROM incident_reports",
        )
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;
        let total = u64::try_from(count.total).unwrap_or(0);

        if page.offset() >= total {
            return Ok(Page::empty(total, page));
        }

        let rows = sqlx::query_as::<_, IncidentModel>(
            r#"
            SELECT id, title, description, status, priority, unit_identifier, location,
                   reported_by_user_id, assigned_to_user_id, occurred_utc, created_utc,
                   updated_utc, row_version
            FROM incident_reports
            ORDER BY occurred_utc DESC, id
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(to_bind(page.limit()))
        .bind(to_bind(page.offset()))
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        let items = rows
            .into_iter()
            .map(IncidentReport::try_from)
            .collect::<RepoResult<Vec<_>>>()?;

        Ok(Page::new(items, total, page))
    }

    #[instrument(skip(self, incident, audit), fields(incident_id = %incident.id, batch_id = %audit.batch_id))]
    async fn create(&self, incident: &IncidentReport, audit: &NewAuditBatch) -> RepoResult<()> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        sqlx::query(
            r#"
            INSERT INTO incident_reports (
                id, title, description, status, priority, unit_identifier, location,
                reported_by_user_id, assigned_to_user_id, occurred_utc, created_utc,
                updated_utc, row_version
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            "#,
        )
        .bind(incident.id)
        .bind(&incident.title)
        .bind(&incident.description)
        .bind(incident.status.as_str())
        .bind(incident.priority.as_str())
        .bind(&incident.unit_identifier)
        .bind(incident.location.as_deref())
        .bind(incident.reported_by_user_id)
        .bind(incident.assigned_to_user_id)
        .bind(incident.occurred_utc)
        .bind(incident.created_utc)
        .bind(incident.updated_utc)
        .bind(incident.row_version)
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        insert_batch(&mut tx, audit).await?;

        tx.commit().await.map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self, incident, audit), fields(incident_id = %incident.id, batch_id = %audit.batch_id))]
    async fn update(
        &self,
        incident: &IncidentReport,
        expected_version: i32,
        audit: &NewAuditBatch,
    ) -> RepoResult<()> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        let result = sqlx::query(
            r#"
            UPDATE incident_reports
            SET title = $3, description = $4, status = $5, priority = $6,
                unit_identifier = $7, location = $8, assigned_to_user_id = $9,
                occurred_utc = $10, updated_utc = $11, row_version = row_version + 1
            WHERE id = $1 AND row_version = $2
            "#,
        )
        .bind(incident.id)
        .bind(expected_version)
        .bind(&incident.title)
        .bind(&incident.description)
        .bind(incident.status.as_str())
        .bind(incident.priority.as_str())
        .bind(&incident.unit_identifier)
        .bind(incident.location.as_deref())
        .bind(incident.assigned_to_user_id)
        .bind(incident.occurred_utc)
        .bind(incident.updated_utc)
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            let current = current_version(&mut tx, incident.id).await?;
            return Err(version_conflict(current, expected_version, || {
                incident_not_found(incident.id)
            }));
        }

        insert_batch(&mut tx, audit).await?;

        tx.commit().await.map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self, audit), fields(batch_id = %audit.batch_id))]
    async fn delete(
        &self,
        id: Uuid,
        expected_version: i32,
        audit: &NewAuditBatch,
    ) -> RepoResult<()> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        let result = sqlx::query("DELETE FROM incident_reports WHERE id = $1 AND row_version = $2")
            .bind(id)
            .bind(expected_version)
            .execute(&mut *tx)
            .await
            .map_err(|e| map_foreign_key_violation(e, || DomainError::IncidentHasComments))?;

        if result.rows_affected() == 0 {
            let current = current_version(&mut tx, id).await?;
            return Err(version_conflict(current, expected_version, || {
                incident_not_found(id)
            }));
        }

        insert_batch(&mut tx, audit).await?;

        tx.commit().await.map_err(map_db_error)?;

        Ok(())
    }
}
