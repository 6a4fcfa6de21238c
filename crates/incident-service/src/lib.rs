//! # incident-service
//!
//! Application layer containing business logic, services, and DTOs.

pub mod dto;
pub mod services;

pub use services::{
    run_guarded_migration, AuditRecorder, AuditService, CommentService, IncidentService,
    MigrationOutcome, ServiceContext, ServiceContextBuilder, ServiceError, ServiceResult,
};
