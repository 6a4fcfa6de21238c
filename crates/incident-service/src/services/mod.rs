//! Business logic services
//!
//! This module contains all service layer implementations that handle
//! business logic, validation, and orchestration of domain operations.

pub mod audit;
pub mod comment;
pub mod context;
pub mod error;
pub mod incident;
pub mod migration;

#[cfg(test)]
pub(crate) mod testing;

// Re-export all services for convenience
pub use audit::{AuditRecorder, AuditService};
pub use comment::CommentService;
pub use context::{ServiceContext, ServiceContextBuilder};
pub use error::{ServiceError, ServiceResult};
pub use incident::IncidentService;
pub use migration::{run_guarded_migration, MigrationOutcome};
