//! Schema model of an audited table.
//!
//! A [`TableSchema`] holds only what audit generation needs: column order,
//! the primary key, the auto-increment column and the unique keys.

use serde::{Deserialize, Serialize};

/// One column of a key, with an optional index prefix length.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeyPart {
    /// Column name, unquoted.
    pub column: String,
    /// Prefix length for `BLOB`/`TEXT` key parts, e.g. `10` in `name(10)`.
    pub prefix_length: Option<u32>,
}

impl KeyPart {
    /// Creates a key part covering the whole column.
    #[must_use]
    pub fn new(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            prefix_length: None,
        }
    }

    /// Sets the prefix length.
    #[must_use]
    pub const fn prefix(mut self, length: u32) -> Self {
        self.prefix_length = Some(length);
        self
    }
}

/// The single `AUTO_INCREMENT` column of a table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutoIncrementColumn {
    /// Column name, unquoted.
    pub name: String,
    /// Full definition line without the trailing comma,
    /// e.g. `` `id` int NOT NULL AUTO_INCREMENT ``.
    pub definition: String,
}

/// A `UNIQUE` key of the base table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UniqueKey {
    /// Key name, unquoted.
    pub name: String,
    /// Definition following the `UNIQUE` keyword,
    /// e.g. `` KEY `fubar` (`foo`,`bar`) ``.
    pub definition: String,
}

impl UniqueKey {
    /// Creates a unique key entry.
    #[must_use]
    pub fn new(name: impl Into<String>, definition: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            definition: definition.into(),
        }
    }
}

/// Structure of a base table as far as auditing is concerned.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSchema {
    /// Column names in declaration order.
    pub columns: Vec<String>,
    /// Primary key parts in key order; empty without a primary key.
    pub primary_key: Vec<KeyPart>,
    /// The auto-increment column, if any.
    pub auto_increment: Option<AutoIncrementColumn>,
    /// Unique keys in declaration order.
    pub unique_keys: Vec<UniqueKey>,
}

impl TableSchema {
    /// Creates an empty schema.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a column.
    #[must_use]
    pub fn column(mut self, name: impl Into<String>) -> Self {
        self.columns.push(name.into());
        self
    }

    /// Sets the primary key.
    #[must_use]
    pub fn primary_key(mut self, parts: Vec<KeyPart>) -> Self {
        self.primary_key = parts;
        self
    }

    /// Sets the auto-increment column.
    #[must_use]
    pub fn auto_increment(mut self, name: impl Into<String>, definition: impl Into<String>) -> Self {
        self.auto_increment = Some(AutoIncrementColumn {
            name: name.into(),
            definition: definition.into(),
        });
        self
    }

    /// Appends a unique key.
    #[must_use]
    pub fn unique_key(mut self, key: UniqueKey) -> Self {
        self.unique_keys.push(key);
        self
    }

    /// Returns whether the table has a primary key.
    ///
    /// Only tables with a primary key get an `audit_item_version` column.
    #[must_use]
    pub fn is_versioned(&self) -> bool {
        !self.primary_key.is_empty()
    }

    /// Returns the primary key column names in key order.
    pub fn primary_key_columns(&self) -> impl Iterator<Item = &str> {
        self.primary_key.iter().map(|part| part.column.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_versioned_only_with_primary_key() {
        let plain = TableSchema::new().column("a").column("b");
        assert!(!plain.is_versioned());

        let keyed = plain.primary_key(vec![KeyPart::new("a"), KeyPart::new("b").prefix(4)]);
        assert!(keyed.is_versioned());
        assert_eq!(keyed.primary_key_columns().collect::<Vec<_>>(), ["a", "b"]);
    }
}
