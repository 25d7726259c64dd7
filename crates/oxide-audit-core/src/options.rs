//! Audit configuration.

use serde::{Deserialize, Serialize};

use crate::naming::AuditTarget;

/// Options controlling how an audit setup is reconciled.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditOptions {
    /// Audit table name; `audit_<table>` when unset.
    pub audit_table: Option<String>,
    /// Fail instead of skipping when the audit table already exists.
    pub strict_if_audit_table_exists: bool,
    /// Fail instead of skipping when any audit trigger already exists.
    pub strict_if_triggers_exist: bool,
}

impl AuditOptions {
    /// Creates default options (no override, nothing strict).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the audit table name.
    #[must_use]
    pub fn audit_table(mut self, name: impl Into<String>) -> Self {
        self.audit_table = Some(name.into());
        self
    }

    /// Sets strict mode for an existing audit table.
    #[must_use]
    pub const fn strict_if_audit_table_exists(mut self, strict: bool) -> Self {
        self.strict_if_audit_table_exists = strict;
        self
    }

    /// Sets strict mode for existing triggers.
    #[must_use]
    pub const fn strict_if_triggers_exist(mut self, strict: bool) -> Self {
        self.strict_if_triggers_exist = strict;
        self
    }

    /// Resolves the audit target for `table`.
    #[must_use]
    pub fn target(&self, table: &str) -> AuditTarget {
        let target = AuditTarget::new(table);
        match &self.audit_table {
            Some(name) if !name.is_empty() => target.with_audit_table(name.clone()),
            _ => target,
        }
    }
}
