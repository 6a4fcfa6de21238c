//! # incident-core
//!
//! Domain layer for the incident tracker: audited entities, snapshot diffing,
//! audit batch grouping, and the repository traits the infrastructure implements.
//! This crate has zero dependencies on infrastructure (database, web framework, etc.).

pub mod audit;
pub mod entities;
pub mod error;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use audit::{
    compute_diff, group_into_batches, truncate_value, AuditBatch, AuditRecord, AuditReference,
    Auditable, FieldChange, NewAuditBatch, Snapshot,
};
pub use entities::{IncidentComment, IncidentPriority, IncidentReport, IncidentStatus};
pub use error::DomainError;
pub use traits::{
    AuditLogRepository, CommentRepository, IncidentRepository, RepoResult, SchemaMigrator,
};
pub use value_objects::{
    ActionType, EntityType, Page, PageRequest, TagParseError, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE,
};
