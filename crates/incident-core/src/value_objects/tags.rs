//! Audit tags - which kind of entity changed and how
//!
//! Both enums are persisted as text. The string forms returned by `as_str`
//! are part of the storage format and must never change.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of tracked entity an audit row belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityType {
    IncidentReport,
    IncidentComment,
}

impl EntityType {
    /// Every tracked entity type, in declaration order
    pub const ALL: [EntityType; 2] = [Self::IncidentReport, Self::IncidentComment];

    /// Stable storage name
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::IncidentReport => "IncidentReport",
            Self::IncidentComment => "IncidentComment",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityType {
    type Err = TagParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|tag| tag.as_str() == s)
            .ok_or_else(|| TagParseError::UnknownEntityType(s.to_string()))
    }
}

/// Kind of mutation that produced an audit batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionType {
    Create,
    Update,
    Delete,
}

impl ActionType {
    pub const ALL: [ActionType; 3] = [Self::Create, Self::Update, Self::Delete];

    /// Stable storage name
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "Create",
            Self::Update => "Update",
            Self::Delete => "Delete",
        }
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActionType {
    type Err = TagParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|tag| tag.as_str() == s)
            .ok_or_else(|| TagParseError::UnknownActionType(s.to_string()))
    }
}

/// Error when decoding a stored tag
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TagParseError {
    #[error("unknown entity type: {0}")]
    UnknownEntityType(String),

    #[error("unknown action type: {0}")]
    UnknownActionType(String),
}
