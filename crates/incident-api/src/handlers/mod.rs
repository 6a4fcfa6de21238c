//! Route handlers
//!
//! All HTTP request handlers organized by domain.

pub mod audit;
pub mod comments;
pub mod health;
pub mod incidents;
