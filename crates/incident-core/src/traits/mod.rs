//! Ports implemented by the infrastructure layer

mod repositories;

pub use repositories::{
    AuditLogRepository, CommentRepository, IncidentRepository, RepoResult, SchemaMigrator,
};
