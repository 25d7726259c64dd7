//! Connection capability consumed by the prober and executor.
//!
//! A [`Connection`] runs one SQL string and hands back a [`Cursor`] over
//! the result rows. Cursors implement one of two row-retrieval conventions
//! ([`FetchStyle`]); the convention is detected once per run by issuing a
//! trivial query and is reused for every later probe.

use std::collections::VecDeque;
use std::fmt;
use std::future::Future;

use crate::error::{AuditError, Result};

/// Query used to detect the fetch convention of a connection's cursors.
pub const FETCH_STYLE_PROBE_SQL: &str = "SELECT 1";

/// An error reported by the database for one query.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct DatabaseError {
    /// Five-character SQLSTATE, if the driver reports one.
    pub sql_state: Option<String>,
    /// Vendor error number, if the driver reports one.
    pub code: Option<u32>,
    /// Error message.
    pub message: String,
}

impl DatabaseError {
    /// Creates an error with only a message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            sql_state: None,
            code: None,
            message: message.into(),
        }
    }

    /// Sets the SQLSTATE.
    #[must_use]
    pub fn sql_state(mut self, sql_state: impl Into<String>) -> Self {
        self.sql_state = Some(sql_state.into());
        self
    }

    /// Sets the vendor error number.
    #[must_use]
    pub const fn code(mut self, code: u32) -> Self {
        self.code = Some(code);
        self
    }

    /// Formats the error block written to the execution log.
    #[must_use]
    pub fn report(&self, sql: &str) -> String {
        let mut report = String::from("Error in MySQL Query:\n");
        if let Some(state) = &self.sql_state {
            report.push_str(&format!("SQL State: {state}\n"));
        }
        if let Some(code) = self.code {
            report.push_str(&format!("Error Number: {code}\n"));
        }
        report.push_str(&format!("Error Message: {}\n", self.message));
        report.push_str(&format!("SQL Statement:\n    {sql}"));
        report
    }
}

/// Row-retrieval convention of a cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FetchStyle {
    /// Statement-handle style: `fetch()` pulls the next row.
    Fetch,
    /// Result-set style: `fetch_array()` pulls the next row.
    FetchArray,
}

impl FetchStyle {
    /// Conventions in order of preference.
    pub const ALL: [Self; 2] = [Self::Fetch, Self::FetchArray];

    /// Picks the first convention `cursor` supports.
    ///
    /// # Errors
    ///
    /// Returns [`AuditError::UnsupportedCursor`] if it supports neither.
    pub fn detect<R: Cursor + ?Sized>(cursor: &R) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|style| cursor.supports(*style))
            .ok_or(AuditError::UnsupportedCursor)
    }
}

impl fmt::Display for FetchStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fetch => f.write_str("fetch"),
            Self::FetchArray => f.write_str("fetch_array"),
        }
    }
}

/// One result row as an ordered field list; `None` is SQL `NULL`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    /// Field values in column order.
    pub fields: Vec<Option<String>>,
}

impl Row {
    /// Creates a row from its fields.
    #[must_use]
    pub const fn new(fields: Vec<Option<String>>) -> Self {
        Self { fields }
    }

    /// Returns the field at `index` unless it is missing or `NULL`.
    #[must_use]
    pub fn field(&self, index: usize) -> Option<&str> {
        self.fields.get(index)?.as_deref()
    }
}

impl<S: Into<String>> FromIterator<S> for Row {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter.into_iter().map(|s| Some(s.into())).collect())
    }
}

/// Iterator-like access to the rows of one query result.
pub trait Cursor: Send {
    /// Returns whether this cursor implements `style`.
    fn supports(&self, style: FetchStyle) -> bool;

    /// Pulls the next row using `style`, or `None` when exhausted.
    ///
    /// Callers only use styles for which [`Cursor::supports`] holds.
    fn next_row(&mut self, style: FetchStyle) -> Option<Row>;
}

/// A database connection able to run raw SQL.
///
/// Calls are opaque round trips without timeout or cancellation; callers
/// needing either must impose them on the implementation.
pub trait Connection: Send {
    /// Cursor over query results.
    type Cursor: Cursor;

    /// Runs `sql` and returns a cursor over its rows.
    ///
    /// Statements without a result set return an empty cursor.
    ///
    /// # Errors
    ///
    /// Returns the [`DatabaseError`] reported for `sql`.
    fn query(
        &mut self,
        sql: &str,
    ) -> impl Future<Output = std::result::Result<Self::Cursor, DatabaseError>> + Send;
}

/// Cursor over rows already fetched into memory.
#[derive(Debug, Clone)]
pub struct RowCursor {
    rows: VecDeque<Row>,
    styles: Vec<FetchStyle>,
}

impl RowCursor {
    /// Creates a cursor supporting [`FetchStyle::Fetch`].
    #[must_use]
    pub fn new(rows: Vec<Row>) -> Self {
        Self {
            rows: rows.into(),
            styles: vec![FetchStyle::Fetch],
        }
    }

    /// Replaces the supported conventions.
    #[must_use]
    pub fn with_styles(mut self, styles: &[FetchStyle]) -> Self {
        self.styles = styles.to_vec();
        self
    }

    /// Creates a cursor without rows.
    #[must_use]
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }
}

impl Cursor for RowCursor {
    fn supports(&self, style: FetchStyle) -> bool {
        self.styles.contains(&style)
    }

    fn next_row(&mut self, style: FetchStyle) -> Option<Row> {
        if !self.supports(style) {
            return None;
        }
        self.rows.pop_front()
    }
}

/// Detects the fetch convention of `connection` with a trivial query.
///
/// # Errors
///
/// Returns [`AuditError::Probe`] if the query fails and
/// [`AuditError::UnsupportedCursor`] if its result supports neither
/// convention.
pub async fn detect_fetch_style<C: Connection>(connection: &mut C) -> Result<FetchStyle> {
    let cursor = connection
        .query(FETCH_STYLE_PROBE_SQL)
        .await
        .map_err(|source| AuditError::Probe {
            sql: FETCH_STYLE_PROBE_SQL.to_string(),
            source,
        })?;
    FetchStyle::detect(&cursor)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_prefers_fetch() {
        let cursor = RowCursor::empty().with_styles(&[FetchStyle::FetchArray, FetchStyle::Fetch]);
        assert_eq!(FetchStyle::detect(&cursor).unwrap(), FetchStyle::Fetch);
    }

    #[test]
    fn test_detect_fetch_array() {
        let cursor = RowCursor::empty().with_styles(&[FetchStyle::FetchArray]);
        assert_eq!(FetchStyle::detect(&cursor).unwrap(), FetchStyle::FetchArray);
    }

    #[test]
    fn test_detect_unsupported() {
        let cursor = RowCursor::empty().with_styles(&[]);
        assert!(matches!(
            FetchStyle::detect(&cursor),
            Err(AuditError::UnsupportedCursor)
        ));
    }

    #[test]
    fn test_row_cursor_drains_in_order() {
        let mut cursor = RowCursor::new(vec![
            Row::from_iter(["a"]),
            Row::from_iter(["b"]),
        ]);
        assert_eq!(cursor.next_row(FetchStyle::FetchArray), None);
        assert_eq!(cursor.next_row(FetchStyle::Fetch).unwrap().field(0), Some("a"));
        assert_eq!(cursor.next_row(FetchStyle::Fetch).unwrap().field(0), Some("b"));
        assert_eq!(cursor.next_row(FetchStyle::Fetch), None);
    }

    #[test]
    fn test_row_field_null() {
        let row = Row::new(vec![Some("t".to_string()), None]);
        assert_eq!(row.field(0), Some("t"));
        assert_eq!(row.field(1), None);
        assert_eq!(row.field(2), None);
    }

    #[test]
    fn test_report_with_all_details() {
        let err = DatabaseError::new("You have an error in your SQL syntax")
            .sql_state("42000")
            .code(1064);
        assert_eq!(
            err.report("CREATE TRIGGER x"),
            "Error in MySQL Query:
SQL State: 42000
Error Number: 1064
Error Message: You have an error in your SQL syntax
SQL Statement:
    CREATE TRIGGER x"
        );
    }

    #[test]
    fn test_report_without_sql_state() {
        let err = DatabaseError::new("gone away").code(2006);
        assert_eq!(
            err.report("SELECT 1"),
            "Error in MySQL Query:\nError Number: 2006\nError Message: gone away\nSQL Statement:\n    SELECT 1"
        );
    }
}
