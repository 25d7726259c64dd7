//! Live database state relevant to an audit setup.

use serde::{Deserialize, Serialize};

use crate::naming::TriggerKind;

/// Which parts of an audit setup already exist.
///
/// Probed fresh on every run and never cached.
#[allow(clippy::struct_excessive_bools, clippy::struct_field_names)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStatus {
    /// The audited table exists.
    pub base_table_exists: bool,
    /// The audit table exists.
    pub audit_table_exists: bool,
    /// `audit_<table>_inserts` exists.
    pub insert_trigger_exists: bool,
    /// `audit_<table>_updates` exists.
    pub update_trigger_exists: bool,
    /// `audit_<table>_deletes` exists.
    pub delete_trigger_exists: bool,
}

impl AuditStatus {
    /// Creates a status where nothing exists.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Status of a base table that has never been audited.
    #[must_use]
    pub fn base_only() -> Self {
        Self {
            base_table_exists: true,
            ..Self::default()
        }
    }

    /// Status of a fully audited base table.
    #[must_use]
    pub fn fully_audited() -> Self {
        Self {
            base_table_exists: true,
            audit_table_exists: true,
            insert_trigger_exists: true,
            update_trigger_exists: true,
            delete_trigger_exists: true,
        }
    }

    /// Returns whether the trigger of `kind` exists.
    #[must_use]
    pub const fn trigger_exists(&self, kind: TriggerKind) -> bool {
        match kind {
            TriggerKind::Insert => self.insert_trigger_exists,
            TriggerKind::Update => self.update_trigger_exists,
            TriggerKind::Delete => self.delete_trigger_exists,
        }
    }

    /// Marks the trigger of `kind` as present.
    pub fn set_trigger_exists(&mut self, kind: TriggerKind) {
        match kind {
            TriggerKind::Insert => self.insert_trigger_exists = true,
            TriggerKind::Update => self.update_trigger_exists = true,
            TriggerKind::Delete => self.delete_trigger_exists = true,
        }
    }

    /// Returns whether nothing remains to be created.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.audit_table_exists
            && TriggerKind::EMISSION_ORDER
                .iter()
                .all(|kind| self.trigger_exists(*kind))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_trigger_exists() {
        let mut status = AuditStatus::base_only();
        assert!(!status.trigger_exists(TriggerKind::Update));

        status.set_trigger_exists(TriggerKind::Update);
        assert!(status.update_trigger_exists);
        assert!(!status.insert_trigger_exists);
        assert!(!status.is_complete());
    }

    #[test]
    fn test_fully_audited_is_complete() {
        assert!(AuditStatus::fully_audited().is_complete());
    }
}
