//! Domain entities - audited business objects

mod comment;
mod incident;

pub use comment::IncidentComment;
pub use incident::{IncidentPriority, IncidentReport, IncidentStatus};
