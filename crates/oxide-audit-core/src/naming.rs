//! Fixed naming of audit tables and triggers.
//!
//! Names are derived from the base table only: the audit table defaults to
//! `audit_<table>` and the triggers are always `audit_<table>_inserts`,
//! `audit_<table>_updates` and `audit_<table>_deletes`, even when the audit
//! table name is overridden.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Prefix shared by default audit table names and trigger names.
pub const AUDIT_PREFIX: &str = "audit_";

/// Returns the default audit table name for `table`.
#[must_use]
pub fn audit_table_name(table: &str) -> String {
    format!("{AUDIT_PREFIX}{table}")
}

/// Returns the name of the audit trigger of `kind` on `table`.
#[must_use]
pub fn trigger_name(table: &str, kind: TriggerKind) -> String {
    format!("{AUDIT_PREFIX}{table}_{}", kind.suffix())
}

/// The row event an audit trigger fires on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TriggerKind {
    /// `INSERT` on the base table.
    Insert,
    /// `UPDATE` on the base table.
    Update,
    /// `DELETE` on the base table.
    Delete,
}

impl TriggerKind {
    /// Triggers in the order they are emitted by a plan.
    pub const EMISSION_ORDER: [Self; 3] = [Self::Insert, Self::Delete, Self::Update];

    /// Triggers in the order strict mode reports them.
    pub const STRICT_CHECK_ORDER: [Self; 3] = [Self::Delete, Self::Insert, Self::Update];

    /// Value stored in the `audit_event` column.
    #[must_use]
    pub const fn event(self) -> &'static str {
        match self {
            Self::Insert => "insert",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }

    /// SQL keyword of the event.
    #[must_use]
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Insert => "INSERT",
            Self::Update => "UPDATE",
            Self::Delete => "DELETE",
        }
    }

    /// Suffix of the trigger name.
    #[must_use]
    pub const fn suffix(self) -> &'static str {
        match self {
            Self::Insert => "inserts",
            Self::Update => "updates",
            Self::Delete => "deletes",
        }
    }

    /// Noun used in messages ("insertions", "updates", "deletions").
    #[must_use]
    pub const fn noun(self) -> &'static str {
        match self {
            Self::Insert => "insertions",
            Self::Update => "updates",
            Self::Delete => "deletions",
        }
    }

    /// When the trigger fires relative to the row change.
    ///
    /// Inserts are recorded after the fact so that auto-increment values
    /// are known; updates and deletes before.
    #[must_use]
    pub const fn timing(self) -> TriggerTiming {
        match self {
            Self::Insert => TriggerTiming::After,
            Self::Update | Self::Delete => TriggerTiming::Before,
        }
    }

    /// Row whose values are copied into the audit row.
    #[must_use]
    pub const fn field_source(self) -> RowSource {
        match self {
            Self::Insert | Self::Update => RowSource::New,
            Self::Delete => RowSource::Old,
        }
    }

    /// Row whose primary key scopes the version lookup.
    ///
    /// Updates correlate on the pre-update key, so a row whose primary key
    /// changes keeps being versioned under its old identity.
    #[must_use]
    pub const fn version_source(self) -> RowSource {
        match self {
            Self::Insert => RowSource::New,
            Self::Update | Self::Delete => RowSource::Old,
        }
    }
}

impl fmt::Display for TriggerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.event())
    }
}

/// `BEFORE` or `AFTER`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TriggerTiming {
    /// Fires before the row change.
    Before,
    /// Fires after the row change.
    After,
}

impl TriggerTiming {
    /// SQL keyword.
    #[must_use]
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::Before => "BEFORE",
            Self::After => "AFTER",
        }
    }
}

/// Row reference available inside a row-level trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RowSource {
    /// The row as written by the statement.
    New,
    /// The row as it was before the statement.
    Old,
}

impl RowSource {
    /// SQL keyword.
    #[must_use]
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::New => "NEW",
            Self::Old => "OLD",
        }
    }
}

/// A base table together with the audit table that records it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AuditTarget {
    /// The audited table.
    pub table: String,
    /// The table receiving audit rows.
    pub audit_table: String,
}

impl AuditTarget {
    /// Creates a target with the default audit table name.
    #[must_use]
    pub fn new(table: impl Into<String>) -> Self {
        let table = table.into();
        let audit_table = audit_table_name(&table);
        Self { table, audit_table }
    }

    /// Overrides the audit table name.
    #[must_use]
    pub fn with_audit_table(mut self, audit_table: impl Into<String>) -> Self {
        self.audit_table = audit_table.into();
        self
    }

    /// Returns the name of the trigger of `kind` for this target.
    #[must_use]
    pub fn trigger_name(&self, kind: TriggerKind) -> String {
        trigger_name(&self.table, kind)
    }

    /// Returns which audit trigger `name` is, if any.
    #[must_use]
    pub fn trigger_kind(&self, name: &str) -> Option<TriggerKind> {
        [TriggerKind::Insert, TriggerKind::Update, TriggerKind::Delete]
            .into_iter()
            .find(|kind| self.trigger_name(*kind) == name)
    }
}
