//! Dialect-specific SQL for audit tables and triggers.
//!
//! A dialect knows how to probe for existing tables and triggers and how to
//! spell the audit table and trigger DDL for its database.

mod mysql;

pub use mysql::MySqlDialect;

use crate::naming::{AuditTarget, RowSource, TriggerKind};
use crate::schema::{KeyPart, TableSchema};

/// Alias under which the version subquery reads prior audit rows.
pub const VERSION_SOURCE_ALIAS: &str = "source";

/// Trait for database-specific audit SQL generation.
pub trait AuditDialect: Send + Sync {
    /// Returns the dialect name.
    fn name(&self) -> &'static str;

    /// Query listing all tables; the first field of each row is a table name.
    fn list_tables_sql(&self) -> &'static str;

    /// Query listing all triggers; the first field of each row is a trigger name.
    fn list_triggers_sql(&self) -> &'static str;

    /// Query returning the definition of `table` in its second field.
    fn show_create_table_sql(&self, table: &str) -> String;

    /// Generates the statement creating the audit table as a copy of the base table.
    fn create_audit_table(&self, target: &AuditTarget, if_not_exists: bool) -> String;

    /// Generates the single alteration turning the copied table into an audit table.
    fn adjust_audit_table(&self, target: &AuditTarget, schema: &TableSchema) -> String;

    /// Generates the trigger recording events of `kind`.
    fn create_trigger(&self, target: &AuditTarget, schema: &TableSchema, kind: TriggerKind)
        -> String;

    /// Quote an identifier (table name, column name, etc.).
    #[must_use]
    fn quote_identifier(&self, name: &str) -> String {
        format!("`{}`", name.replace('`', "``"))
    }

    /// Renders a key part, keeping its prefix length.
    #[must_use]
    fn key_part(&self, part: &KeyPart) -> String {
        match part.prefix_length {
            Some(length) => format!("{}({})", self.quote_identifier(&part.column), length),
            None => self.quote_identifier(&part.column),
        }
    }

    /// Copies every column from `source`, in declaration order:
    /// `` `col` = NEW.`col` ``.
    #[must_use]
    fn field_assignments(&self, schema: &TableSchema, source: RowSource) -> Vec<String> {
        schema
            .columns
            .iter()
            .map(|column| {
                let quoted = self.quote_identifier(column);
                format!("{quoted} = {}.{quoted}", source.as_sql())
            })
            .collect()
    }

    /// Correlates prior audit rows with the row in `source` on every
    /// primary key column, joined with `AND` in key order.
    ///
    /// Returns `None` for tables without a primary key.
    #[must_use]
    fn version_condition(&self, schema: &TableSchema, source: RowSource) -> Option<String> {
        if !schema.is_versioned() {
            return None;
        }
        let alias = self.quote_identifier(VERSION_SOURCE_ALIAS);
        let conditions: Vec<String> = schema
            .primary_key_columns()
            .map(|column| {
                let quoted = self.quote_identifier(column);
                format!("{alias}.{quoted} = {}.{quoted}", source.as_sql())
            })
            .collect();
        Some(conditions.join(" AND "))
    }
}
