//! Startup schema migration

mod advisory;

pub use advisory::{advisory_lock_key, PgSchemaMigrator};
