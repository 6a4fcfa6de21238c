//! Schema migrations guarded by a PostgreSQL session advisory lock

use async_trait::async_trait;
use sqlx::migrate::{MigrateError, Migrator};
use sqlx::{Connection, PgConnection, PgPool};
use std::path::Path;
use tracing::{debug, info, instrument, warn};

use incident_core::error::DomainError;
use incident_core::traits::{RepoResult, SchemaMigrator};

use crate::repositories::map_db_error;

/// Derive the 64-bit advisory lock key from a lock name (FNV-1a)
///
/// Every instance must compute the same key for the same name, so this is a
/// fixed hash rather than the randomly seeded std hasher.
pub fn advisory_lock_key(name: &str) -> i64 {
    const OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01b3;

    let hash = name
        .bytes()
        .fold(OFFSET_BASIS, |hash, byte| {
            (hash ^ u64::from(byte)).wrapping_mul(PRIME)
        });
    hash as i64
}

fn map_migrate_error(e: MigrateError) -> DomainError {
    DomainError::MigrationError(e.to_string())
}

/// Migration runner owning a dedicated database session
///
/// Advisory locks belong to a session, so the lock and the migrations share
/// one connection detached from the pool. Dropping the runner closes the
/// session, which releases a lock that was never unlocked.
pub struct PgSchemaMigrator {
    conn: PgConnection,
    migrator: Migrator,
    lock_key: i64,
    locked: bool,
}

impl PgSchemaMigrator {
    /// Load migrations from `dir` and open a dedicated session
    pub async fn connect(pool: &PgPool, dir: &Path, lock_name: &str) -> RepoResult<Self> {
        let mut migrator = Migrator::new(dir).await.map_err(map_migrate_error)?;
        // Mutual exclusion comes from our own named lock
        migrator.set_locking(false);

        let conn = pool.acquire().await.map_err(map_db_error)?.detach();

        Ok(Self {
            conn,
            migrator,
            lock_key: advisory_lock_key(lock_name),
            locked: false,
        })
    }

    /// Number of migrations found on disk
    pub fn migration_count(&self) -> usize {
        self.migrator.iter().count()
    }

    /// Close the session gracefully
    pub async fn close(self) -> RepoResult<()> {
        self.conn.close().await.map_err(map_db_error)
    }
}

#[async_trait]
impl SchemaMigrator for PgSchemaMigrator {
    #[instrument(skip(self), fields(lock_key = self.lock_key))]
    async fn try_lock(&mut self) -> RepoResult<bool> {
        let acquired = sqlx::query_scalar::<_, bool>("SELECT pg_try_advisory_lock($1)")
            .bind(self.lock_key)
            .fetch_one(&mut self.conn)
            .await
            .map_err(map_db_error)?;

        self.locked = acquired;
        debug!(acquired, "migration lock attempt");
        Ok(acquired)
    }

    #[instrument(skip(self))]
    async fn apply(&mut self) -> RepoResult<()> {
        if !self.locked {
            return Err(DomainError::MigrationError(
                "migration lock is not held".to_string(),
            ));
        }

        self.migrator
            .run_direct(&mut self.conn)
            .await
            .map_err(map_migrate_error)?;

        info!(migrations = self.migration_count(), "schema is up to date");
        Ok(())
    }

    #[instrument(skip(self), fields(lock_key = self.lock_key))]
    async fn unlock(&mut self) -> RepoResult<()> {
        if !self.locked {
            return Ok(());
        }

        let released = sqlx::query_scalar::<_, bool>("SELECT pg_advisory_unlock($1)")
            .bind(self.lock_key)
            .fetch_one(&mut self.conn)
            .await
            .map_err(map_db_error)?;

        self.locked = false;
        if !released {
            warn!("migration lock was not held by this session");
        }
        Ok(())
    }
}
