//! Entity to model mappers
//!
//! Conversions from database rows to domain objects. Text-encoded tags are
//! parsed here, so a row holding an unknown tag surfaces as an error instead
//! of a panic.

mod audit_log;
mod incident;
