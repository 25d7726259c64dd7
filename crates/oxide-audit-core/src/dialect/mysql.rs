//! MySQL/MariaDB dialect for audit tables.
//!
//! The audit table is created with `CREATE TABLE ... LIKE`, which copies
//! the base table verbatim including its primary key, unique keys and
//! `AUTO_INCREMENT` property. One `ALTER TABLE` then demotes all of those
//! and adds the audit columns. Triggers insert with the `INSERT ... SET`
//! form so that the field list does not have to repeat column order.

use std::sync::LazyLock;

use regex::Regex;

use crate::naming::{AuditTarget, TriggerKind};
use crate::schema::{AutoIncrementColumn, TableSchema};

use super::AuditDialect;

static AUTO_INCREMENT_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\s+AUTO_INCREMENT\b").expect("Invalid auto-increment marker regex")
});

/// Name of the plain key mirroring the base table's primary key.
pub const REAL_PRIMARY_KEY: &str = "real_primary_key";

/// MySQL/MariaDB audit dialect.
#[derive(Debug, Clone, Default)]
pub struct MySqlDialect;

impl MySqlDialect {
    /// Creates a new MySQL dialect.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Returns the column definition with the auto-increment marker stripped,
    /// leaving the base integer type and its other attributes intact.
    #[must_use]
    pub fn demote_auto_increment(&self, column: &AutoIncrementColumn) -> String {
        AUTO_INCREMENT_MARKER
            .replace_all(&column.definition, "")
            .into_owned()
    }

    fn version_assignment(&self, target: &AuditTarget, condition: &str) -> String {
        format!(
            "`audit_item_version` = IFNULL(
                (
                    SELECT MAX(`audit_item_version`) + 1
                    FROM {} {}
                    WHERE {condition}
                ),
                1)",
            self.quote_identifier(&target.audit_table),
            self.quote_identifier(super::VERSION_SOURCE_ALIAS),
        )
    }
}

impl AuditDialect for MySqlDialect {
    fn name(&self) -> &'static str {
        "mysql"
    }

    fn list_tables_sql(&self) -> &'static str {
        "SHOW TABLES"
    }

    fn list_triggers_sql(&self) -> &'static str {
        "SHOW TRIGGERS"
    }

    fn show_create_table_sql(&self, table: &str) -> String {
        format!("SHOW CREATE TABLE {}", self.quote_identifier(table))
    }

    fn create_audit_table(&self, target: &AuditTarget, if_not_exists: bool) -> String {
        let mut sql = String::from("CREATE TABLE ");
        if if_not_exists {
            sql.push_str("IF NOT EXISTS ");
        }
        sql.push_str(&self.quote_identifier(&target.audit_table));
        sql.push_str(" LIKE ");
        sql.push_str(&self.quote_identifier(&target.table));
        sql
    }

    fn adjust_audit_table(&self, target: &AuditTarget, schema: &TableSchema) -> String {
        let mut clauses = Vec::new();

        if let Some(column) = &schema.auto_increment {
            clauses.push(format!(
                "CHANGE COLUMN {} {}",
                self.quote_identifier(&column.name),
                self.demote_auto_increment(column)
            ));
        }
        if schema.is_versioned() {
            clauses.push("DROP PRIMARY KEY".to_string());
        }

        clauses.push("ADD COLUMN `audit_id` INT AUTO_INCREMENT NOT NULL FIRST".to_string());
        clauses.push("ADD PRIMARY KEY (`audit_id`)".to_string());
        clauses.push("ADD COLUMN `audit_datetime` DATETIME NOT NULL AFTER `audit_id`".to_string());
        clauses.push(
            "ADD COLUMN `audit_event` CHAR(7) NOT NULL DEFAULT 'insert' AFTER `audit_datetime`"
                .to_string(),
        );

        if schema.is_versioned() {
            clauses
                .push("ADD COLUMN `audit_item_version` INT NULL AFTER `audit_event`".to_string());
            let parts: Vec<String> = schema.primary_key.iter().map(|p| self.key_part(p)).collect();
            clauses.push(format!(
                "ADD KEY {} ({})",
                self.quote_identifier(REAL_PRIMARY_KEY),
                parts.join(",")
            ));
        }

        // Many audit rows share the same "unique" values across versions.
        for key in &schema.unique_keys {
            clauses.push(format!("DROP KEY {}", self.quote_identifier(&key.name)));
            clauses.push(format!("ADD {}", key.definition));
        }

        format!(
            "ALTER TABLE {}\n    {}",
            self.quote_identifier(&target.audit_table),
            clauses.join(",\n    ")
        )
    }

    fn create_trigger(
        &self,
        target: &AuditTarget,
        schema: &TableSchema,
        kind: TriggerKind,
    ) -> String {
        let mut assignments = vec![
            "`audit_datetime` = NOW()".to_string(),
            format!("`audit_event` = '{}'", kind.event()),
        ];
        if let Some(condition) = self.version_condition(schema, kind.version_source()) {
            assignments.push(self.version_assignment(target, &condition));
        }
        assignments.extend(self.field_assignments(schema, kind.field_source()));

        format!(
            "CREATE TRIGGER {} {} {} ON {}
    FOR EACH ROW
    BEGIN
        INSERT INTO {}
        SET {};
    END",
            self.quote_identifier(&target.trigger_name(kind)),
            kind.timing().as_sql(),
            kind.keyword(),
            self.quote_identifier(&target.table),
            self.quote_identifier(&target.audit_table),
            assignments.join(",\n            ")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{KeyPart, UniqueKey};

    fn auto_increment_schema() -> TableSchema {
        TableSchema::new()
            .column("id")
            .column("foo")
            .primary_key(vec![KeyPart::new("id")])
            .auto_increment("id", "`id` int NOT NULL AUTO_INCREMENT")
    }

    #[test]
    fn test_create_audit_table() {
        let dialect = MySqlDialect::new();
        let target = AuditTarget::new("t");
        assert_eq!(
            dialect.create_audit_table(&target, true),
            "CREATE TABLE IF NOT EXISTS `audit_t` LIKE `t`"
        );
        assert_eq!(
            dialect.create_audit_table(&target, false),
            "CREATE TABLE `audit_t` LIKE `t`"
        );
    }

    #[test]
    fn test_demote_auto_increment() {
        let dialect = MySqlDialect::new();
        let column = AutoIncrementColumn {
            name: "id".to_string(),
            definition: "`id` int unsigned NOT NULL auto_increment COMMENT 'pk'".to_string(),
        };
        assert_eq!(
            dialect.demote_auto_increment(&column),
            "`id` int unsigned NOT NULL COMMENT 'pk'"
        );
    }

    #[test]
    fn test_adjust_with_primary_key() {
        let dialect = MySqlDialect::new();
        let sql = dialect.adjust_audit_table(&AuditTarget::new("t"), &auto_increment_schema());

        assert_eq!(
            sql,
            "ALTER TABLE `audit_t`
    CHANGE COLUMN `id` `id` int NOT NULL,
    DROP PRIMARY KEY,
    ADD COLUMN `audit_id` INT AUTO_INCREMENT NOT NULL FIRST,
    ADD PRIMARY KEY (`audit_id`),
    ADD COLUMN `audit_datetime` DATETIME NOT NULL AFTER `audit_id`,
    ADD COLUMN `audit_event` CHAR(7) NOT NULL DEFAULT 'insert' AFTER `audit_datetime`,
    ADD COLUMN `audit_item_version` INT NULL AFTER `audit_event`,
    ADD KEY `real_primary_key` (`id`)"
        );
    }

    #[test]
    fn test_adjust_without_primary_key() {
        let dialect = MySqlDialect::new();
        let schema = TableSchema::new().column("a").column("b");
        let sql = dialect.adjust_audit_table(&AuditTarget::new("t"), &schema);

        assert!(!sql.contains("DROP PRIMARY KEY"));
        assert!(!sql.contains("CHANGE COLUMN"));
        assert!(!sql.contains("audit_item_version"));
        assert!(!sql.contains("real_primary_key"));
        assert!(sql.contains("ADD COLUMN `audit_event`"));
    }

    #[test]
    fn test_adjust_demotes_unique_keys() {
        let dialect = MySqlDialect::new();
        let schema = TableSchema::new()
            .column("id")
            .column("foo")
            .column("bar")
            .unique_key(UniqueKey::new("fubar", "KEY `fubar` (`foo`,`bar`)"));
        let sql = dialect.adjust_audit_table(&AuditTarget::new("t"), &schema);

        assert!(sql.ends_with(
            ",\n    DROP KEY `fubar`,\n    ADD KEY `fubar` (`foo`,`bar`)"
        ));
        assert!(!sql.contains("UNIQUE"));
    }

    #[test]
    fn test_insert_trigger() {
        let dialect = MySqlDialect::new();
        let sql = dialect.create_trigger(
            &AuditTarget::new("t"),
            &auto_increment_schema(),
            TriggerKind::Insert,
        );

        assert_eq!(
            sql,
            "CREATE TRIGGER `audit_t_inserts` AFTER INSERT ON `t`
    FOR EACH ROW
    BEGIN
        INSERT INTO `audit_t`
        SET `audit_datetime` = NOW(),
            `audit_event` = 'insert',
            `audit_item_version` = IFNULL(
                (
                    SELECT MAX(`audit_item_version`) + 1
                    FROM `audit_t` `source`
                    WHERE `source`.`id` = NEW.`id`
                ),
                1),
            `id` = NEW.`id`,
            `foo` = NEW.`foo`;
    END"
        );
    }

    #[test]
    fn test_update_trigger_copies_new_and_versions_old() {
        let dialect = MySqlDialect::new();
        let sql = dialect.create_trigger(
            &AuditTarget::new("t"),
            &auto_increment_schema(),
            TriggerKind::Update,
        );

        assert!(sql.starts_with("CREATE TRIGGER `audit_t_updates` BEFORE UPDATE ON `t`"));
        assert!(sql.contains("`audit_event` = 'update'"));
        assert!(sql.contains("WHERE `source`.`id` = OLD.`id`"));
        assert!(sql.contains("`foo` = NEW.`foo`"));
        assert!(!sql.contains("`foo` = OLD.`foo`"));
    }

    #[test]
    fn test_delete_trigger_copies_old() {
        let dialect = MySqlDialect::new();
        let sql = dialect.create_trigger(
            &AuditTarget::new("t"),
            &auto_increment_schema(),
            TriggerKind::Delete,
        );

        assert!(sql.starts_with("CREATE TRIGGER `audit_t_deletes` BEFORE DELETE ON `t`"));
        assert!(sql.contains("WHERE `source`.`id` = OLD.`id`"));
        assert!(sql.contains("`foo` = OLD.`foo`;"));
    }

    #[test]
    fn test_trigger_without_primary_key_has_no_version() {
        let dialect = MySqlDialect::new();
        let schema = TableSchema::new().column("a").column("b");
        let sql = dialect.create_trigger(&AuditTarget::new("t"), &schema, TriggerKind::Insert);

        assert!(!sql.contains("audit_item_version"));
        assert!(sql.contains("`audit_event` = 'insert',\n            `a` = NEW.`a`"));
    }

    #[test]
    fn test_trigger_uses_overridden_audit_table() {
        let dialect = MySqlDialect::new();
        let target = AuditTarget::new("t").with_audit_table("something_unusual");
        let sql = dialect.create_trigger(&target, &auto_increment_schema(), TriggerKind::Delete);

        assert!(sql.starts_with("CREATE TRIGGER `audit_t_deletes`"));
        assert!(sql.contains("INSERT INTO `something_unusual`"));
        assert!(sql.contains("FROM `something_unusual` `source`"));
    }
}
