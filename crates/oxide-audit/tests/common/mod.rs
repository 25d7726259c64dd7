#![allow(dead_code)]

//! In-memory stand-in for a MySQL connection.
//!
//! Answers the probe queries from a small table/trigger catalogue, applies
//! the effects of `CREATE TABLE` and `CREATE TRIGGER`, and records every
//! statement it receives.

use std::collections::BTreeMap;

use oxide_audit::prelude::*;

pub const USERS: &str = "CREATE TABLE `users` (
  `id` int NOT NULL AUTO_INCREMENT,
  `email` varchar(255) NOT NULL,
  `name` varchar(100) DEFAULT NULL,
  PRIMARY KEY (`id`),
  UNIQUE KEY `users_email` (`email`)
) ENGINE=InnoDB AUTO_INCREMENT=42 DEFAULT CHARSET=utf8mb4 COLLATE=utf8mb4_0900_ai_ci";

pub const EVENTS: &str = "CREATE TABLE `events` (
  `kind` varchar(20) NOT NULL,
  `payload` text
) ENGINE=InnoDB DEFAULT CHARSET=utf8mb4";

#[derive(Debug, Default)]
pub struct ScriptedConnection {
    /// Table name to `SHOW CREATE TABLE` text.
    pub tables: BTreeMap<String, String>,
    pub triggers: Vec<String>,
    /// Every query received, probes included.
    pub queries: Vec<String>,
    /// Statements that are not probes.
    pub executed: Vec<String>,
    /// Fetch conventions supported by returned cursors.
    pub styles: Vec<FetchStyle>,
    /// Fails the first statement containing this text.
    pub fail_on: Option<String>,
}

impl ScriptedConnection {
    pub fn new() -> Self {
        Self {
            styles: vec![FetchStyle::Fetch],
            ..Default::default()
        }
    }

    pub fn with_table(mut self, name: &str, definition: &str) -> Self {
        self.tables.insert(name.to_string(), definition.to_string());
        self
    }

    pub fn with_trigger(mut self, name: &str) -> Self {
        self.triggers.push(name.to_string());
        self
    }

    pub fn with_styles(mut self, styles: &[FetchStyle]) -> Self {
        self.styles = styles.to_vec();
        self
    }

    pub fn failing_on(mut self, marker: &str) -> Self {
        self.fail_on = Some(marker.to_string());
        self
    }

    pub fn has_table(&self, name: &str) -> bool {
        self.tables.contains_key(name)
    }

    pub fn has_trigger(&self, name: &str) -> bool {
        self.triggers.iter().any(|t| t == name)
    }

    fn cursor(&self, rows: Vec<Row>) -> RowCursor {
        RowCursor::new(rows).with_styles(&self.styles)
    }

    fn apply(&mut self, sql: &str) -> std::result::Result<(), DatabaseError> {
        if sql.starts_with("CREATE TABLE") {
            let mut names = backticked(sql);
            let (Some(audit), Some(base)) = (names.next(), names.next()) else {
                return Err(DatabaseError::new("You have an error in your SQL syntax"));
            };
            let definition = self
                .tables
                .get(base)
                .ok_or_else(|| missing_table(base))?
                .replacen(&format!("`{base}`"), &format!("`{audit}`"), 1);
            self.tables.entry(audit.to_string()).or_insert(definition);
        } else if sql.starts_with("CREATE TRIGGER") {
            let name = backticked(sql).next().unwrap_or_default().to_string();
            if self.has_trigger(&name) {
                return Err(DatabaseError::new("Trigger already exists")
                    .sql_state("HY000")
                    .code(1359));
            }
            self.triggers.push(name);
        }
        Ok(())
    }
}

impl Connection for ScriptedConnection {
    type Cursor = RowCursor;

    async fn query(&mut self, sql: &str) -> std::result::Result<RowCursor, DatabaseError> {
        self.queries.push(sql.to_string());

        if sql == "SELECT 1" {
            return Ok(self.cursor(vec![Row::from_iter(["1"])]));
        }
        if sql == "SHOW TABLES" {
            let rows = self.tables.keys().map(|t| Row::from_iter([t.as_str()])).collect();
            return Ok(self.cursor(rows));
        }
        if sql == "SHOW TRIGGERS" {
            let rows = self
                .triggers
                .iter()
                .map(|t| Row::from_iter([t.as_str(), "INSERT", "t"]))
                .collect();
            return Ok(self.cursor(rows));
        }
        if let Some(rest) = sql.strip_prefix("SHOW CREATE TABLE ") {
            let name = rest.trim_matches('`');
            let definition = self.tables.get(name).ok_or_else(|| missing_table(name))?;
            return Ok(self.cursor(vec![Row::from_iter([name, definition.as_str()])]));
        }

        if self.fail_on.as_deref().is_some_and(|marker| sql.contains(marker)) {
            return Err(DatabaseError::new("Duplicate column name 'audit_id'")
                .sql_state("42S21")
                .code(1060));
        }
        self.executed.push(sql.to_string());
        self.apply(sql)?;
        Ok(self.cursor(Vec::new()))
    }
}

fn backticked(sql: &str) -> impl Iterator<Item = &str> {
    sql.split('`').skip(1).step_by(2)
}

fn missing_table(name: &str) -> DatabaseError {
    DatabaseError::new(format!("Table 'app.{name}' doesn't exist"))
        .sql_state("42S02")
        .code(1146)
}
