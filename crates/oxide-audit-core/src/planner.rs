//! Reconciliation of candidate audit statements with live state.
//!
//! The planner decides which statements an audit setup still needs:
//!
//! - missing base table: fail
//! - audit table named like the base table: fail
//! - audit table present: fail in strict mode, otherwise skip create/adjust
//! - audit table absent: create it, then adjust it
//! - each trigger: fail in strict mode if present, skip if present,
//!   create if absent
//!
//! All checks run against the complete [`AuditStatus`] before any
//! statement is produced, so a failed plan never yields partial output.

use serde::{Deserialize, Serialize};

use crate::dialect::AuditDialect;
use crate::error::{PlanError, Result};
use crate::naming::{AuditTarget, TriggerKind};
use crate::options::AuditOptions;
use crate::schema::TableSchema;
use crate::status::AuditStatus;

/// What a planned statement does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "event")]
pub enum StatementKind {
    /// `CREATE TABLE ... LIKE`.
    CreateAuditTable,
    /// `ALTER TABLE` adding audit columns and demoting keys.
    AdjustAuditTable,
    /// `CREATE TRIGGER` for one event.
    Trigger(TriggerKind),
}

/// A statement of a plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannedStatement {
    /// What the statement does.
    pub kind: StatementKind,
    /// SQL text.
    pub sql: String,
}

/// Ordered statements needed to set up or complete auditing of a table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditPlan {
    /// The table and its audit table.
    pub target: AuditTarget,
    /// Statements to run, in order.
    pub statements: Vec<PlannedStatement>,
    /// Parts skipped because they already exist.
    pub skipped: Vec<StatementKind>,
}

impl AuditPlan {
    /// Returns the number of statements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.statements.len()
    }

    /// Returns whether nothing needs to run.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    /// Iterates over the SQL text of each statement.
    pub fn sql(&self) -> impl Iterator<Item = &str> {
        self.statements.iter().map(|s| s.sql.as_str())
    }

    /// Renders the plan as a script for the `mysql` command-line client.
    ///
    /// Trigger bodies contain `;`, so each trigger is wrapped in a
    /// `DELIMITER $$` block.
    #[must_use]
    pub fn to_script(&self) -> String {
        let mut script = String::new();
        for statement in &self.statements {
            if matches!(statement.kind, StatementKind::Trigger(_)) {
                script.push_str(&format!("DELIMITER $$\n{}$$\nDELIMITER ;\n\n", statement.sql));
            } else {
                script.push_str(&format!("{};\n\n", statement.sql));
            }
        }
        script
    }

    /// Consumes the plan, returning the SQL text of each statement.
    #[must_use]
    pub fn into_sql(self) -> Vec<String> {
        self.statements.into_iter().map(|s| s.sql).collect()
    }
}

/// Builds [`AuditPlan`]s with a dialect and a set of options.
#[derive(Debug)]
pub struct AuditPlanner<'a, D: AuditDialect> {
    dialect: &'a D,
    options: &'a AuditOptions,
}

impl<'a, D: AuditDialect> AuditPlanner<'a, D> {
    /// Creates a planner.
    #[must_use]
    pub const fn new(dialect: &'a D, options: &'a AuditOptions) -> Self {
        Self { dialect, options }
    }

    /// Fails if `status` rules out auditing `table` under the current options.
    ///
    /// # Errors
    ///
    /// Returns a [`PlanError`] if the base table is missing, the audit table
    /// would be the base table itself, or a strict-mode check trips.
    pub fn check(&self, table: &str, status: &AuditStatus) -> Result<()> {
        let target = self.options.target(table);

        if !status.base_table_exists {
            return Err(PlanError::BaseTableMissing(target.table));
        }
        if target.audit_table == target.table {
            return Err(PlanError::AuditTableIsBaseTable(target.table));
        }
        if status.audit_table_exists && self.options.strict_if_audit_table_exists {
            return Err(PlanError::AuditTableExists(target.audit_table));
        }
        if self.options.strict_if_triggers_exist {
            if let Some(kind) = TriggerKind::STRICT_CHECK_ORDER
                .into_iter()
                .find(|kind| status.trigger_exists(*kind))
            {
                return Err(PlanError::TriggerExists {
                    table: target.table,
                    kind,
                });
            }
        }
        Ok(())
    }

    /// Plans the statements still needed to audit `table`.
    ///
    /// # Errors
    ///
    /// Returns the same errors as [`AuditPlanner::check`].
    pub fn plan(&self, table: &str, schema: &TableSchema, status: &AuditStatus) -> Result<AuditPlan> {
        self.check(table, status)?;

        let target = self.options.target(table);
        let mut statements = Vec::new();
        let mut skipped = Vec::new();

        if status.audit_table_exists {
            skipped.push(StatementKind::CreateAuditTable);
            skipped.push(StatementKind::AdjustAuditTable);
        } else {
            let if_not_exists = !self.options.strict_if_audit_table_exists;
            statements.push(PlannedStatement {
                kind: StatementKind::CreateAuditTable,
                sql: self.dialect.create_audit_table(&target, if_not_exists),
            });
            statements.push(PlannedStatement {
                kind: StatementKind::AdjustAuditTable,
                sql: self.dialect.adjust_audit_table(&target, schema),
            });
        }

        for kind in TriggerKind::EMISSION_ORDER {
            if status.trigger_exists(kind) {
                skipped.push(StatementKind::Trigger(kind));
            } else {
                statements.push(PlannedStatement {
                    kind: StatementKind::Trigger(kind),
                    sql: self.dialect.create_trigger(&target, schema, kind),
                });
            }
        }

        Ok(AuditPlan {
            target,
            statements,
            skipped,
        })
    }
}
