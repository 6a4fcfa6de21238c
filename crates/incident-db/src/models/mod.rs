//! Database models - SQLx-compatible structs for PostgreSQL tables

mod audit_log;
mod incident;

pub use audit_log::{AuditLogModel, CountModel};
pub use incident::{CommentModel, IncidentModel};
