//! PostgreSQL audit trail: batch writer and timeline reader

use async_trait::async_trait;
use sqlx::{PgConnection, PgPool, Postgres, QueryBuilder};
use tracing::{debug, instrument};
use uuid::Uuid;

use incident_core::audit::{
    group_into_batches, AuditBatch, AuditRecord, AuditReference, NewAuditBatch,
};
use incident_core::traits::{AuditLogRepository, RepoResult};
use incident_core::value_objects::{EntityType, Page, PageRequest};

use crate::models::{AuditLogModel, CountModel};

use super::error::{map_db_error, to_bind};

const AUDIT_COLUMNS: &str = "a.id, a.entity_type, a.entity_id, a.reference_entity_name, \
     a.reference_id, a.field_name, a.old_value, a.new_value, a.changed_utc, \
     a.changed_by_user_id, a.batch_id, a.action_type";

/// Write every row of one batch with a single statement
///
/// Runs on the caller's connection, which is expected to be inside the
/// transaction of the entity write the batch describes.
#[instrument(skip_all, fields(batch_id = %batch.batch_id, entity_id = %batch.entity_id, rows = batch.row_count()))]
pub async fn insert_batch(conn: &mut PgConnection, batch: &NewAuditBatch) -> RepoResult<u64> {
    if batch.is_empty() {
        return Ok(0);
    }

    let reference_name = batch.reference.map(|r| r.entity_type.as_str());
    let reference_id = batch.reference.map(|r| r.id);

    let mut builder: QueryBuilder<'_, Postgres> = QueryBuilder::new(
        "INSERT INTO audit_logs (entity_type, entity_id, reference_entity_name, reference_id, \
         field_name, old_value, new_value, changed_utc, changed_by_user_id, batch_id, action_type) ",
    );
    builder.push_values(&batch.changes, |mut row, change| {
        row.push_bind(batch.entity_type.as_str())
            .push_bind(batch.entity_id)
            .push_bind(reference_name)
            .push_bind(reference_id)
            .push_bind(change.field_name.as_str())
            .push_bind(change.old_value.as_deref())
            .push_bind(change.new_value.as_deref())
            .push_bind(batch.changed_utc)
            .push_bind(batch.changed_by_user_id)
            .push_bind(batch.batch_id)
            .push_bind(batch.action_type.as_str());
    });

    let result = builder
        .build()
        .execute(&mut *conn)
        .await
        .map_err(map_db_error)?;

    debug!(action = %batch.action_type, "audit batch written");
    Ok(result.rows_affected())
}

/// Row selection of a timeline query
#[derive(Debug, Clone, Copy)]
enum TimelineFilter<'a> {
    Entity {
        entity_id: Uuid,
        entity_type: Option<EntityType>,
    },
    Reference(&'a AuditReference),
}

impl TimelineFilter<'_> {
    fn push_where(&self, builder: &mut QueryBuilder<'_, Postgres>) {
        match *self {
            Self::Entity {
                entity_id,
                entity_type,
            } => {
                builder.push(" WHERE entity_id = ");
                builder.push_bind(entity_id);
                if let Some(entity_type) = entity_type {
                    builder.push(" AND entity_type = ");
                    builder.push_bind(entity_type.as_str());
                }
            }
            Self::Reference(reference) => {
                builder.push(" WHERE reference_entity_name = ");
                builder.push_bind(reference.entity_type.as_str());
                builder.push(" AND reference_id = ");
                builder.push_bind(reference.id);
            }
        }
    }
}

/// PostgreSQL implementation of AuditLogRepository
#[derive(Clone)]
pub struct PgAuditLogRepository {
    pool: PgPool,
}

impl PgAuditLogRepository {
    /// Create a new PgAuditLogRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn count_batches(&self, filter: TimelineFilter<'_>) -> RepoResult<u64> {
        let mut builder: QueryBuilder<'_, Postgres> =
            QueryBuilder::new("SELECT COUNT(DISTINCT batch_id) AS total FROM audit_logs");
        filter.push_where(&mut builder);

        let count = builder
            .build_query_as::<CountModel>()
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(u64::try_from(count.total).unwrap_or(0))
    }

    /// Page through whole batches, newest first
    ///
    /// Batches are ranked by their latest timestamp, ties broken by the
    /// latest row id, and only then joined back to their rows, so LIMIT and
    /// OFFSET never cut a batch in half.
    async fn timeline(
        &self,
        filter: TimelineFilter<'_>,
        page: PageRequest,
    ) -> RepoResult<Page<AuditBatch>> {
        let total = self.count_batches(filter).await?;
        if page.offset() >= total {
            return Ok(Page::empty(total, page));
        }

        let mut builder: QueryBuilder<'_, Postgres> = QueryBuilder::new(
            "WITH batches AS (\
             SELECT batch_id, MAX(changed_utc) AS last_changed_utc, MAX(id) AS last_id \
             FROM audit_logs",
        );
        filter.push_where(&mut builder);
        builder.push(" GROUP BY batch_id ORDER BY last_changed_utc DESC, last_id DESC LIMIT ");
        builder.push_bind(to_bind(page.limit()));
        builder.push(" OFFSET ");
        builder.push_bind(to_bind(page.offset()));
        builder.push(") SELECT ");
        builder.push(AUDIT_COLUMNS);
        builder.push(
            " FROM audit_logs a JOIN batches b ON b.batch_id = a.batch_id \
             ORDER BY b.last_changed_utc DESC, b.last_id DESC, a.id ASC",
        );

        let rows = builder
            .build_query_as::<AuditLogModel>()
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

        let records = rows
            .into_iter()
            .map(AuditRecord::try_from)
            .collect::<RepoResult<Vec<_>>>()?;

        Ok(Page::new(group_into_batches(records), total, page))
    }
}

#[async_trait]
impl AuditLogRepository for PgAuditLogRepository {
    #[instrument(skip(self))]
    async fn timeline_by_entity(
        &self,
        entity_id: Uuid,
        entity_type: Option<EntityType>,
        page: PageRequest,
    ) -> RepoResult<Page<AuditBatch>> {
        self.timeline(
            TimelineFilter::Entity {
                entity_id,
                entity_type,
            },
            page,
        )
        .await
    }

    #[instrument(skip(self))]
    async fn timeline_by_reference(
        &self,
        reference: &AuditReference,
        page: PageRequest,
    ) -> RepoResult<Page<AuditBatch>> {
        self.timeline(TimelineFilter::Reference(reference), page)
            .await
    }

    #[instrument(skip(self))]
    async fn batch_detail(&self, batch_id: Uuid) -> RepoResult<Vec<AuditRecord>> {
        let query = format!(
            "SELECT {AUDIT_COLUMNS} FROM audit_logs a WHERE a.batch_id = $1 ORDER BY a.id ASC"
        );
        let rows = sqlx::query_as::<_, AuditLogModel>(&query)
            .bind(batch_id)
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

        rows.into_iter().map(AuditRecord::try_from).collect()
    }
}
