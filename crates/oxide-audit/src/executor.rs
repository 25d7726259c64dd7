//! Statement execution.
//!
//! This module runs planned statements one by one and stops at the first
//! failure. No rollback is attempted: DDL is not transactional on the
//! target databases, so statements that succeeded stay applied and a later
//! run picks up where this one stopped.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Component, Path, PathBuf};

use tracing::{debug, error, info};

use crate::connection::{Connection, DatabaseError};
use crate::error::{AuditError, Result};

/// Append-only plain-text log of executed statements.
#[derive(Debug)]
pub struct ExecutionLog {
    path: PathBuf,
    file: File,
}

impl ExecutionLog {
    /// Opens `path` for appending, creating it if needed.
    ///
    /// # Errors
    ///
    /// Returns [`AuditError::InvalidLogPath`] for paths with `..` components
    /// and [`AuditError::Io`] if the file cannot be opened.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if path.components().any(|c| matches!(c, Component::ParentDir)) {
            return Err(AuditError::InvalidLogPath(path.to_path_buf()));
        }
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            file,
        })
    }

    /// Returns the log file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Records a statement about to run.
    ///
    /// # Errors
    ///
    /// Returns [`AuditError::Io`] if the write fails.
    pub fn statement(&mut self, sql: &str) -> Result<()> {
        writeln!(self.file, "Executing SQL:\n{sql}")?;
        Ok(())
    }

    /// Records the failure of a statement.
    ///
    /// # Errors
    ///
    /// Returns [`AuditError::Io`] if the write fails.
    pub fn failure(&mut self, sql: &str, err: &DatabaseError) -> Result<()> {
        writeln!(self.file, "{}", err.report(sql))?;
        Ok(())
    }
}

/// Runs statements against a connection, optionally logging them.
pub struct StatementExecutor<'c, C: Connection> {
    connection: &'c mut C,
    log: Option<ExecutionLog>,
}

impl<'c, C: Connection> StatementExecutor<'c, C> {
    /// Creates an executor without a log.
    pub const fn new(connection: &'c mut C) -> Self {
        Self {
            connection,
            log: None,
        }
    }

    /// Streams every statement (and any failure) to `log`.
    #[must_use]
    pub fn with_log(mut self, log: ExecutionLog) -> Self {
        self.log = Some(log);
        self
    }

    /// Runs one statement.
    ///
    /// # Errors
    ///
    /// Returns [`AuditError::StatementExecution`] if the database rejects
    /// `sql`, or [`AuditError::Io`] if the log cannot be written.
    pub async fn execute(&mut self, sql: &str) -> Result<()> {
        if let Some(log) = self.log.as_mut() {
            log.statement(sql)?;
        }
        debug!(sql = %sql, "Executing SQL");

        if let Err(source) = self.connection.query(sql).await {
            error!(
                sql_state = ?source.sql_state,
                code = ?source.code,
                message = %source.message,
                "Statement failed"
            );
            if let Some(log) = self.log.as_mut() {
                log.failure(sql, &source)?;
            }
            return Err(AuditError::StatementExecution {
                sql: sql.to_string(),
                source,
            });
        }
        Ok(())
    }

    /// Runs `statements` in order, stopping at the first failure.
    ///
    /// Returns the number of statements run.
    ///
    /// # Errors
    ///
    /// Returns the error of the first failing statement.
    pub async fn execute_all<S: AsRef<str>>(&mut self, statements: &[S]) -> Result<usize> {
        for sql in statements {
            self.execute(sql.as_ref()).await?;
        }
        info!(count = statements.len(), "Statements executed");
        Ok(statements.len())
    }
}
