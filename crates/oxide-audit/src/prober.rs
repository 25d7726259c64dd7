//! Probing of live database state.
//!
//! The prober lists tables and triggers to fill an [`AuditStatus`] and
//! fetches the base table definition for parsing. It only reads.

use oxide_audit_core::{AuditDialect, AuditStatus, AuditTarget, PlanError};
use tracing::debug;

use crate::connection::{Connection, Cursor, FetchStyle, detect_fetch_style};
use crate::error::{AuditError, Result};

/// Reads audit-relevant state through a [`Connection`].
#[derive(Debug)]
pub struct StateProber<'a, D: AuditDialect> {
    dialect: &'a D,
    style: FetchStyle,
}

impl<'a, D: AuditDialect> StateProber<'a, D> {
    /// Creates a prober using a known fetch convention.
    #[must_use]
    pub const fn new(dialect: &'a D, style: FetchStyle) -> Self {
        Self { dialect, style }
    }

    /// Creates a prober, detecting the fetch convention of `connection`.
    ///
    /// # Errors
    ///
    /// See [`detect_fetch_style`].
    pub async fn detect<C: Connection>(dialect: &'a D, connection: &mut C) -> Result<Self> {
        let style = detect_fetch_style(connection).await?;
        debug!(style = %style, "Detected fetch style");
        Ok(Self::new(dialect, style))
    }

    /// Collects which parts of the audit setup for `target` exist.
    ///
    /// Never fails because something is missing.
    ///
    /// # Errors
    ///
    /// Returns [`AuditError::Probe`] if a listing query fails.
    pub async fn status<C: Connection>(
        &self,
        connection: &mut C,
        target: &AuditTarget,
    ) -> Result<AuditStatus> {
        let mut status = AuditStatus::new();

        for table in self.first_fields(connection, self.dialect.list_tables_sql()).await? {
            if table == target.table {
                status.base_table_exists = true;
            } else if table == target.audit_table {
                status.audit_table_exists = true;
            }
        }

        for trigger in self.first_fields(connection, self.dialect.list_triggers_sql()).await? {
            if let Some(kind) = target.trigger_kind(&trigger) {
                status.set_trigger_exists(kind);
            }
        }

        debug!(table = %target.table, ?status, "Probed audit state");
        Ok(status)
    }

    /// Like [`StateProber::status`], but fails when the base table is missing.
    ///
    /// # Errors
    ///
    /// Returns [`PlanError::BaseTableMissing`] (wrapped) if the base table
    /// is absent, or any error of [`StateProber::status`].
    pub async fn probe<C: Connection>(
        &self,
        connection: &mut C,
        target: &AuditTarget,
    ) -> Result<AuditStatus> {
        let status = self.status(connection, target).await?;
        if !status.base_table_exists {
            return Err(PlanError::BaseTableMissing(target.table.clone()).into());
        }
        Ok(status)
    }

    /// Fetches the `CREATE TABLE` text of `table`.
    ///
    /// # Errors
    ///
    /// Returns [`AuditError::Probe`] if the query fails and
    /// [`AuditError::ConnectionCapability`] if it returns no definition.
    pub async fn table_definition<C: Connection>(
        &self,
        connection: &mut C,
        table: &str,
    ) -> Result<String> {
        let sql = self.dialect.show_create_table_sql(table);
        let mut cursor = self.query(connection, &sql).await?;
        let row = cursor.next_row(self.style).ok_or_else(|| {
            AuditError::ConnectionCapability(format!("'{sql}' returned no rows"))
        })?;
        row.field(1).map(str::to_string).ok_or_else(|| {
            AuditError::ConnectionCapability(format!("'{sql}' returned no table definition"))
        })
    }

    async fn query<C: Connection>(&self, connection: &mut C, sql: &str) -> Result<C::Cursor> {
        debug!(sql = %sql, "Probing");
        connection
            .query(sql)
            .await
            .map_err(|source| AuditError::Probe {
                sql: sql.to_string(),
                source,
            })
    }

    async fn first_fields<C: Connection>(
        &self,
        connection: &mut C,
        sql: &str,
    ) -> Result<Vec<String>> {
        let mut cursor = self.query(connection, sql).await?;
        let mut names = Vec::new();
        while let Some(row) = cursor.next_row(self.style) {
            if let Some(name) = row.field(0) {
                names.push(name.to_string());
            }
        }
        Ok(names)
    }
}
