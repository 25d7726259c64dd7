//! Table definition parsing.
//!
//! `SHOW CREATE TABLE` output places exactly one column or key declaration
//! per line, so [`LineParser`] extracts structure with line-anchored
//! patterns instead of a full DDL grammar. The input is always produced by
//! the server that later runs the generated statements.
//!
//! Other parsers can be plugged in through [`SchemaParser`].

use std::sync::LazyLock;

use regex::Regex;

use crate::error::ParseError;
use crate::schema::{AutoIncrementColumn, KeyPart, TableSchema, UniqueKey};

/// Turns a table definition into a [`TableSchema`].
pub trait SchemaParser: Send + Sync {
    /// Parses the text of a `CREATE TABLE` statement.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] if the text declares no columns or its
    /// primary key cannot be read.
    fn parse(&self, definition: &str) -> Result<TableSchema, ParseError>;
}

static COLUMN_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^\s*(?:`([^`]+)`|"([^"]+)")"#).expect("Invalid column name regex")
});

static AUTO_INCREMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(.+? AUTO_INCREMENT.*?),?$").expect("Invalid auto-increment regex")
});

static TABLE_OPTIONS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bENGINE\b").expect("Invalid table options regex"));

static PRIMARY_KEY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^\s*PRIMARY KEY\s*(?:(?:`[^`]+`|"[^"]+")\s*)?\(((?:[^()]|\(\d+\))+)\)"#)
        .expect("Invalid primary key regex")
});

static KEY_PART: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^(?:`([^`]+)`|"([^"]+)"|([A-Za-z0-9_$]+))\s*(?:\((\d+)\))?"#)
        .expect("Invalid key part regex")
});

static UNIQUE_KEY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^\s*UNIQUE\s+((?:KEY|INDEX)\s*(?:`([^`]+)`|"([^"]+)").+?),?$"#)
        .expect("Invalid unique key regex")
});

/// Line-anchored parser for MySQL/MariaDB `SHOW CREATE TABLE` output.
#[derive(Debug, Clone, Copy, Default)]
pub struct LineParser;

impl LineParser {
    /// Creates a new parser.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Returns the first auto-increment column declaration.
    ///
    /// The trailing table options line (`) ENGINE=... AUTO_INCREMENT=42`)
    /// also carries the marker and is skipped.
    fn auto_increment(definition: &str) -> Option<AutoIncrementColumn> {
        definition
            .lines()
            .filter(|line| !TABLE_OPTIONS.is_match(line))
            .find_map(|line| {
                let declaration = AUTO_INCREMENT.captures(line)?.get(1)?.as_str().to_string();
                let name = column_name(&declaration)?;
                Some(AutoIncrementColumn {
                    name,
                    definition: declaration,
                })
            })
    }

    fn columns(definition: &str) -> Vec<String> {
        definition.lines().filter_map(column_name).collect()
    }

    fn primary_key(definition: &str) -> Result<Vec<KeyPart>, ParseError> {
        let Some(list) = definition
            .lines()
            .find_map(|line| PRIMARY_KEY.captures(line)?.get(1))
        else {
            return Ok(Vec::new());
        };
        split_key_parts(list.as_str())
    }

    fn unique_keys(definition: &str) -> Vec<UniqueKey> {
        definition
            .lines()
            .filter_map(|line| {
                let caps = UNIQUE_KEY.captures(line)?;
                let name = caps.get(2).or_else(|| caps.get(3))?;
                Some(UniqueKey::new(name.as_str(), &caps[1]))
            })
            .collect()
    }
}

impl SchemaParser for LineParser {
    fn parse(&self, definition: &str) -> Result<TableSchema, ParseError> {
        let columns = Self::columns(definition);
        if columns.is_empty() {
            return Err(ParseError::NoColumns);
        }

        Ok(TableSchema {
            columns,
            primary_key: Self::primary_key(definition)?,
            auto_increment: Self::auto_increment(definition),
            unique_keys: Self::unique_keys(definition),
        })
    }
}

/// Returns the quoted identifier at the start of `line`, if any.
fn column_name(line: &str) -> Option<String> {
    let caps = COLUMN_NAME.captures(line)?;
    caps.get(1)
        .or_else(|| caps.get(2))
        .map(|m| m.as_str().to_string())
}

/// Splits `` `a`,`b`(10) `` into key parts.
fn split_key_parts(list: &str) -> Result<Vec<KeyPart>, ParseError> {
    list.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            let caps = KEY_PART
                .captures(part)
                .ok_or_else(|| ParseError::InvalidPrimaryKey(list.to_string()))?;
            let column = caps
                .get(1)
                .or_else(|| caps.get(2))
                .or_else(|| caps.get(3))
                .map(|m| m.as_str().to_string())
                .ok_or_else(|| ParseError::InvalidPrimaryKey(list.to_string()))?;
            let prefix_length = caps
                .get(4)
                .map(|m| m.as_str().parse::<u32>())
                .transpose()
                .map_err(|_| ParseError::InvalidPrimaryKey(list.to_string()))?;
            Ok(KeyPart {
                column,
                prefix_length,
            })
        })
        .collect()
}
