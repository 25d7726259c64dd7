//! Entry points for auditing one table.
//!
//! [`AuditTableCreator`] ties the pieces together for a single pass:
//!
//! 1. detect the cursor fetch convention
//! 2. probe tables and triggers into an [`AuditStatus`]
//! 3. fetch and parse the base table definition
//! 4. plan the statements still needed
//! 5. optionally execute them
//!
//! Nothing is cached between passes. Concurrent passes against the same
//! table are not coordinated; run one pass per table at a time.

use std::path::Path;

use oxide_audit_core::{
    AuditDialect, AuditOptions, AuditPlan, AuditPlanner, AuditStatus, LineParser, MySqlDialect,
    SchemaParser, TableSchema,
};
use tracing::{info, warn};

use crate::connection::Connection;
use crate::error::{AuditError, Result};
use crate::executor::{ExecutionLog, StatementExecutor};
use crate::prober::StateProber;

/// Creates (or completes) the audit table and triggers for one base table.
pub struct AuditTableCreator<C: Connection, P: SchemaParser = LineParser> {
    table: String,
    connection: C,
    options: AuditOptions,
    dialect: MySqlDialect,
    parser: P,
}

impl<C: Connection> AuditTableCreator<C> {
    /// Creates a creator for `table` with default options, the MySQL
    /// dialect and the line-based definition parser.
    pub fn new(table: impl Into<String>, connection: C) -> Self {
        Self {
            table: table.into(),
            connection,
            options: AuditOptions::default(),
            dialect: MySqlDialect::new(),
            parser: LineParser::new(),
        }
    }
}

impl<C: Connection, P: SchemaParser> AuditTableCreator<C, P> {
    /// Replaces all options.
    #[must_use]
    pub fn options(mut self, options: AuditOptions) -> Self {
        self.options = options;
        self
    }

    /// Overrides the audit table name (default `audit_<table>`).
    #[must_use]
    pub fn audit_table(mut self, name: impl Into<String>) -> Self {
        self.options.audit_table = Some(name.into());
        self
    }

    /// Fails instead of skipping when the audit table already exists.
    #[must_use]
    pub const fn strict_if_audit_table_exists(mut self, strict: bool) -> Self {
        self.options.strict_if_audit_table_exists = strict;
        self
    }

    /// Fails instead of skipping when any audit trigger already exists.
    #[must_use]
    pub const fn strict_if_triggers_exist(mut self, strict: bool) -> Self {
        self.options.strict_if_triggers_exist = strict;
        self
    }

    /// Swaps the table definition parser.
    #[must_use]
    pub fn with_parser<Q: SchemaParser>(self, parser: Q) -> AuditTableCreator<C, Q> {
        AuditTableCreator {
            table: self.table,
            connection: self.connection,
            options: self.options,
            dialect: self.dialect,
            parser,
        }
    }

    /// Returns the base table name.
    #[must_use]
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Returns the audit table name.
    #[must_use]
    pub fn audit_table_name(&self) -> String {
        self.options.target(&self.table).audit_table
    }

    /// Returns the connection.
    pub fn connection_mut(&mut self) -> &mut C {
        &mut self.connection
    }

    /// Consumes the creator, returning the connection.
    pub fn into_connection(self) -> C {
        self.connection
    }

    /// Probes which parts of the audit setup exist, without failing on
    /// missing ones.
    ///
    /// # Errors
    ///
    /// Returns an error if a probe query fails or the cursor convention is
    /// unsupported.
    pub async fn status(&mut self) -> Result<AuditStatus> {
        let target = self.options.target(&self.table);
        let prober = StateProber::detect(&self.dialect, &mut self.connection).await?;
        prober.status(&mut self.connection, &target).await
    }

    /// Reads and parses the base table definition.
    ///
    /// # Errors
    ///
    /// Returns an error if the definition cannot be fetched or parsed.
    pub async fn schema(&mut self) -> Result<TableSchema> {
        let prober = StateProber::detect(&self.dialect, &mut self.connection).await?;
        Self::read_schema(&prober, &mut self.connection, &self.parser, &self.table).await
    }

    /// Plans the statements still needed to audit the table.
    ///
    /// Fails without producing statements if the base table is missing or a
    /// strict-mode check trips.
    ///
    /// # Errors
    ///
    /// Returns [`AuditError::Plan`] for a missing base table or a strict-mode
    /// violation, [`AuditError::Parse`] for an unreadable definition, and
    /// probe errors as they occur.
    pub async fn plan(&mut self) -> Result<AuditPlan> {
        let target = self.options.target(&self.table);
        let prober = StateProber::detect(&self.dialect, &mut self.connection).await?;
        let status = prober.probe(&mut self.connection, &target).await?;

        let planner = AuditPlanner::new(&self.dialect, &self.options);
        planner.check(&self.table, &status)?;

        let schema =
            Self::read_schema(&prober, &mut self.connection, &self.parser, &self.table).await?;
        let plan = planner.plan(&self.table, &schema, &status)?;

        for kind in &plan.skipped {
            warn!(table = %self.table, ?kind, "Already present, skipping");
        }
        info!(
            table = %plan.target.table,
            audit_table = %plan.target.audit_table,
            dialect = self.dialect.name(),
            statements = plan.len(),
            "Planned audit setup"
        );
        Ok(plan)
    }

    /// Returns the SQL statements still needed to audit the table, in
    /// execution order.
    ///
    /// # Errors
    ///
    /// See [`AuditTableCreator::plan`].
    pub async fn generate_sql_statements(&mut self) -> Result<Vec<String>> {
        Ok(self.plan().await?.into_sql())
    }

    /// Plans and executes the audit setup, stopping at the first failing
    /// statement.
    ///
    /// With `log_file`, every statement and any failure is appended to it.
    ///
    /// # Errors
    ///
    /// Returns any planning error, [`AuditError::InvalidLogPath`] or
    /// [`AuditError::Io`] for the log, and
    /// [`AuditError::StatementExecution`] for the first rejected statement.
    pub async fn execute(&mut self, log_file: Option<&Path>) -> Result<AuditPlan> {
        let plan = self.plan().await?;

        let mut executor = StatementExecutor::new(&mut self.connection);
        if let Some(path) = log_file {
            let log = ExecutionLog::open(path)?;
            info!(path = %log.path().display(), "Logging executed statements");
            executor = executor.with_log(log);
        }

        let statements: Vec<&str> = plan.sql().collect();
        executor.execute_all(statements.as_slice()).await?;

        info!(
            table = %plan.target.table,
            audit_table = %plan.target.audit_table,
            "Audit setup complete"
        );
        Ok(plan)
    }

    async fn read_schema(
        prober: &StateProber<'_, MySqlDialect>,
        connection: &mut C,
        parser: &P,
        table: &str,
    ) -> Result<TableSchema> {
        let definition = prober.table_definition(connection, table).await?;
        parser.parse(&definition).map_err(|source| AuditError::Parse {
            table: table.to_string(),
            source,
        })
    }
}
