//! Startup schema migration
//!
//! Instances race for one named lock. The winner applies pending migrations,
//! the others wait for it up to a bounded timeout and then start anyway.
//! Nothing in here fails startup.

use std::time::Duration;

use incident_core::traits::SchemaMigrator;
use tokio::time::{sleep, Instant};
use tracing::{debug, info, instrument, warn};

/// How the startup migration ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MigrationOutcome {
    /// Lock taken and every pending migration applied
    Applied,
    /// Lock still held elsewhere when the timeout ran out
    LockTimedOut,
    /// Lock or migration error, logged and skipped
    Failed,
}

impl MigrationOutcome {
    #[inline]
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied)
    }
}

/// Shortest wait between two lock attempts
pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(1);

/// Take the migration lock, apply migrations, release the lock
///
/// Polls `try_lock` every `poll_interval` (at least [`MIN_POLL_INTERVAL`])
/// until `timeout` has passed. A timeout too large to represent waits
/// without a deadline. The lock is released whether or not applying
/// succeeded.
#[instrument(skip(migrator))]
pub async fn run_guarded_migration<M>(
    migrator: &mut M,
    timeout: Duration,
    poll_interval: Duration,
) -> MigrationOutcome
where
    M: SchemaMigrator + ?Sized,
{
    let deadline = Instant::now().checked_add(timeout);
    let poll_interval = poll_interval.max(MIN_POLL_INTERVAL);
    let mut attempts: u32 = 0;

    loop {
        attempts += 1;
        match migrator.try_lock().await {
            Ok(true) => break,
            Ok(false) => debug!(attempts, "migration lock is held by another instance"),
            Err(e) => {
                warn!(error = %e, "could not take migration lock, skipping migrations");
                return MigrationOutcome::Failed;
            }
        }

        let wait = match deadline {
            Some(deadline) => {
                let now = Instant::now();
                if now >= deadline {
                    warn!(
                        attempts,
                        timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
                        "timed out waiting for migration lock, skipping migrations"
                    );
                    return MigrationOutcome::LockTimedOut;
                }
                poll_interval.min(deadline - now)
            }
            None => poll_interval,
        };
        sleep(wait).await;
    }

    let applied = migrator.apply().await;

    if let Err(e) = migrator.unlock().await {
        warn!(error = %e, "could not release migration lock");
    }

    match applied {
        Ok(()) => {
            info!(attempts, "migrations applied");
            MigrationOutcome::Applied
        }
        Err(e) => {
            warn!(error = %e, "migrations failed, continuing startup");
            MigrationOutcome::Failed
        }
    }
}
