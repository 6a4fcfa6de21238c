//! Repository implementations
//!
//! PostgreSQL implementations of the repository traits defined in incident-core.
//! Entity writes and their audit batches share one transaction.

mod audit_log;
mod comment;
mod error;
mod incident;

pub use audit_log::{insert_batch, PgAuditLogRepository};
pub(crate) use error::map_db_error;
pub use comment::PgCommentRepository;
pub use incident::PgIncidentRepository;
