//! # incident-db
//!
//! Database layer implementing repository traits with PostgreSQL via SQLx.
//!
//! ## Overview
//!
//! This crate provides PostgreSQL implementations for the ports defined in
//! `incident-core`. It handles:
//!
//! - Connection pool management
//! - Database models with SQLx `FromRow` derives
//! - Model → entity mappers
//! - Repository implementations, each entity write sharing its transaction
//!   with the audit batch that describes it
//! - Advisory-lock guarded schema migration
//!
//! ## Usage
//!
//! ```rust,ignore
//! use incident_db::pool::{create_pool, PoolConfig};
//! use incident_db::PgAuditLogRepository;
//! use incident_core::traits::AuditLogRepository;
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let pool = create_pool(&PoolConfig::default()).await?;
//!     let audit = PgAuditLogRepository::new(pool);
//!
//!     let detail = audit.batch_detail(batch_id).await?;
//!     Ok(())
//! }
//! ```

pub mod mappers;
pub mod migrations;
pub mod models;
pub mod pool;
pub mod repositories;

// Re-export commonly used types
pub use migrations::{advisory_lock_key, PgSchemaMigrator};
pub use pool::{create_pool, ping, PgPool, PoolConfig};
pub use repositories::{
    insert_batch, PgAuditLogRepository, PgCommentRepository, PgIncidentRepository,
};
