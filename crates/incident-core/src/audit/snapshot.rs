//! Entity snapshots in canonical string form

use chrono::{DateTime, SecondsFormat, Utc};
use std::fmt;
use uuid::Uuid;

use crate::value_objects::EntityType;

/// Ordered field name → canonical value mapping of one entity state
///
/// Field order is the order fields were added (declaration order of the
/// entity), which keeps diffs reproducible. `None` is a null column and is
/// distinct from `Some("")`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    fields: Vec<(String, Option<String>)>,
}

impl Snapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a nullable field, replacing an earlier value of the same name in place
    pub fn with(mut self, name: impl Into<String>, value: Option<String>) -> Self {
        self.set(name, value);
        self
    }

    /// Add a non-null field using its `Display` form
    pub fn with_value(self, name: impl Into<String>, value: impl fmt::Display) -> Self {
        self.with(name, Some(value.to_string()))
    }

    /// Add a nullable timestamp field
    pub fn with_timestamp(self, name: impl Into<String>, value: Option<DateTime<Utc>>) -> Self {
        self.with(name, value.as_ref().map(format_timestamp))
    }

    /// Add a nullable id field
    pub fn with_id(self, name: impl Into<String>, value: Option<Uuid>) -> Self {
        self.with(name, value.map(|id| id.to_string()))
    }

    /// Set a field value in place
    pub fn set(&mut self, name: impl Into<String>, value: Option<String>) {
        let name = name.into();
        match self.fields.iter_mut().find(|(existing, _)| *existing == name) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((name, value)),
        }
    }

    /// Look up a field
    ///
    /// The outer `Option` is field presence, the inner one is nullability.
    pub fn get(&self, name: &str) -> Option<Option<&str>> {
        self.fields
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, value)| value.as_deref())
    }

    /// Iterate fields in declaration order
    pub fn fields(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.fields
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_deref()))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Canonical timestamp form used in snapshots: RFC 3339, millisecond precision, `Z` suffix
pub fn format_timestamp(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Secondary grouping key of an audit row
///
/// Lets one timeline collect history across entity kinds, e.g. an incident
/// together with all of its comments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AuditReference {
    pub entity_type: EntityType,
    pub id: Uuid,
}

impl AuditReference {
    pub fn new(entity_type: EntityType, id: Uuid) -> Self {
        Self { entity_type, id }
    }
}

/// An entity whose mutations are recorded in the audit trail
pub trait Auditable {
    /// Tag stored with every audit row of this entity
    const ENTITY_TYPE: EntityType;

    /// Primary key of the entity
    fn entity_id(&self) -> Uuid;

    /// Reference key the audit rows are grouped under
    fn audit_reference(&self) -> Option<AuditReference>;

    /// Persisted business fields in canonical string form
    ///
    /// Bookkeeping columns (`UpdatedUtc`, `RowVersion`) change on every
    /// write and are left out, so Create and Delete batches carry every
    /// other column and an Update batch only the fields a caller changed.
    fn snapshot(&self) -> Snapshot;
}
