//! Error types for schema parsing and audit planning.

use crate::naming::TriggerKind;

/// Errors raised while turning a table definition into a [`TableSchema`].
///
/// [`TableSchema`]: crate::schema::TableSchema
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// The definition text contained no quoted column declarations.
    #[error("Table definition declares no columns")]
    NoColumns,

    /// A primary key column list could not be split into column names.
    #[error("Unreadable primary key column list: {0}")]
    InvalidPrimaryKey(String),
}

/// Errors raised while reconciling the audit setup with the live database.
///
/// All of these abort planning before any statement is produced.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlanError {
    /// The table to audit does not exist.
    #[error("Base table {0} does not exist")]
    BaseTableMissing(String),

    /// The audit table name resolves to the base table itself.
    #[error("Audit table for {0} cannot be the base table itself")]
    AuditTableIsBaseTable(String),

    /// Strict mode is on and the audit table is already present.
    #[error("Audit table {0} already exists")]
    AuditTableExists(String),

    /// Strict mode is on and one of the audit triggers is already present.
    #[error("Audit trigger for {} on table {table} already exists", kind.noun())]
    TriggerExists {
        /// The base table.
        table: String,
        /// Which trigger was found.
        kind: TriggerKind,
    },
}

/// Result type for audit planning.
pub type Result<T> = std::result::Result<T, PlanError>;
