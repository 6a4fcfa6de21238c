//! PostgreSQL implementation of CommentRepository

use async_trait::async_trait;
use sqlx::{PgConnection, PgPool};
use tracing::instrument;
use uuid::Uuid;

use incident_core::audit::NewAuditBatch;
use incident_core::entities::IncidentComment;
use incident_core::traits::{CommentRepository, RepoResult};
use incident_core::value_objects::{Page, PageRequest};

use crate::models::{CommentModel, CountModel};

use super::audit_log::insert_batch;
use super::error::{
    comment_not_found, incident_not_found, map_db_error, map_foreign_key_violation, to_bind,
    version_conflict,
};

/// PostgreSQL implementation of CommentRepository
#[derive(Clone)]
pub struct PgCommentRepository {
    pool: PgPool,
}

impl PgCommentRepository {
    /// Create a new PgCommentRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

async fn current_version(conn: &mut PgConnection, id: Uuid) -> RepoResult<Option<i32>> {
    sqlx::query_scalar::<_, i32>("SELECT row_version FROM incident_comments WHERE id = $1")
        .bind(id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(map_db_error)
}

#[async_trait]
impl CommentRepository for PgCommentRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<IncidentComment>> {
        let result = sqlx::query_as::<_, CommentModel>(
            r#"
            SELECT id, incident_id, author_user_id, body, created_utc, updated_utc, row_version
            FROM incident_comments
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(IncidentComment::from))
    }

    #[instrument(skip(self))]
    async fn list_by_incident(
        &self,
        incident_id: Uuid,
        page: PageRequest,
    ) -> RepoResult<Page<IncidentComment>> {
        let count = sqlx::query_as::<_, CountModel>(
            "SELECT COUNT(*) AS total FROM incident_comments WHERE incident_id = $1",
        )
        .bind(incident_id)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;
        let total = u64::try_from(count.total).unwrap_or(0);

        if page.offset() >= total {
            return Ok(Page::empty(total, page));
        }

        let rows = sqlx::query_as::<_, CommentModel>(
            r#"
            SELECT id, incident_id, author_user_id, body, created_utc, updated_utc, row_version
            FROM incident_comments
            WHERE incident_id = $1
            ORDER BY created_utc ASC, id
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(incident_id)
        .bind(to_bind(page.limit()))
        .bind(to_bind(page.offset()))
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(Page::new(
            rows.into_iter().map(IncidentComment::from).collect(),
            total,
            page,
        ))
    }

    #[instrument(skip(self, comment, audit), fields(comment_id = %comment.id, batch_id = %audit.batch_id))]
    async fn create(&self, comment: &IncidentComment, audit: &NewAuditBatch) -> RepoResult<()> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        sqlx::query(
            r#"
            INSERT INTO incident_comments (
                id, incident_id, author_user_id, body, created_utc, updated_utc, row_version
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(comment.id)
        .bind(comment.incident_id)
        .bind(comment.author_user_id)
        .bind(&comment.body)
        .bind(comment.created_utc)
        .bind(comment.updated_utc)
        .bind(comment.row_version)
        .execute(&mut *tx)
        .await
        .map_err(|e| map_foreign_key_violation(e, || incident_not_found(comment.incident_id)))?;

        insert_batch(&mut tx, audit).await?;

        tx.commit().await.map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self, comment, audit), fields(comment_id = %comment.id, batch_id = %audit.batch_id))]
    async fn update(
        &self,
        comment: &IncidentComment,
        expected_version: i32,
        audit: &NewAuditBatch,
    ) -> RepoResult<()> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        let result = sqlx::query(
            r#"
            UPDATE incident_comments
            SET body = $3, updated_utc = $4, row_version = row_version + 1
            WHERE id = $1 AND row_version = $2
            "#,
        )
        .bind(comment.id)
        .bind(expected_version)
        .bind(&comment.body)
        .bind(comment.updated_utc)
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            let current = current_version(&mut tx, comment.id).await?;
            return Err(version_conflict(current, expected_version, || {
                comment_not_found(comment.id)
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

        let result =
            sqlx::query("DELETE FROM incident_comments WHERE id = $1 AND row_version = $2")
                .bind(id)
                .bind(expected_version)
                .execute(&mut *tx)
                .await
                .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            let current = current_version(&mut tx, id).await?;
            return Err(version_conflict(current, expected_version, || {
                comment_not_found(id)
            }));
        }

        insert_batch(&mut tx, audit).await?;

        tx.commit().await.map_err(map_db_error)?;

        Ok(())
    }
}
