//! Change audit recording
//!
//! Tracked entities expose an explicit [`Snapshot`] of their persisted fields.
//! A mutation captures the snapshot before and after, [`compute_diff`] reduces
//! the pair to field-level changes, and the changes are persisted as one
//! [`NewAuditBatch`] in the same transaction as the entity write. Readers fold
//! stored [`AuditRecord`] rows back into [`AuditBatch`] timeline entries.

mod batch;
mod diff;
mod snapshot;

pub use batch::{group_into_batches, truncate_value, AuditBatch, AuditRecord, NewAuditBatch};
pub use diff::{compute_diff, FieldChange};
pub use snapshot::{format_timestamp, AuditReference, Auditable, Snapshot};
