//! Error types for probing and executing audit setups.

use std::path::PathBuf;

use oxide_audit_core::{ParseError, PlanError};

use crate::connection::DatabaseError;

/// Errors that can occur while auditing a table.
#[derive(Debug, thiserror::Error)]
pub enum AuditError {
    /// The live state rules out the requested setup (missing base table,
    /// or an existing audit table/trigger in strict mode).
    #[error(transparent)]
    Plan(#[from] PlanError),

    /// The base table definition could not be parsed.
    #[error("Failed to parse definition of table '{table}': {source}")]
    Parse {
        /// The base table.
        table: String,
        /// Parser error.
        source: ParseError,
    },

    /// A probe result did not have the shape the connection contract promises.
    #[error("Connection capability error: {0}")]
    ConnectionCapability(String),

    /// Query results support neither row-retrieval convention.
    #[error("Query result does not support fetch or fetch_array")]
    UnsupportedCursor,

    /// A probe query was rejected by the database.
    #[error("Probe query '{sql}' failed: {source}")]
    Probe {
        /// The probe query.
        sql: String,
        /// The database's error.
        source: DatabaseError,
    },

    /// A generated statement was rejected by the database.
    ///
    /// Statements that ran before it stay applied.
    #[error("{}", .source.report(.sql))]
    StatementExecution {
        /// The offending statement.
        sql: String,
        /// The database's error.
        source: DatabaseError,
    },

    /// The execution log path contains parent-directory components.
    #[error("Refusing execution log path outside a plain directory tree: {0}")]
    InvalidLogPath(PathBuf),

    /// IO error while writing the execution log.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for audit operations.
pub type Result<T> = std::result::Result<T, AuditError>;
