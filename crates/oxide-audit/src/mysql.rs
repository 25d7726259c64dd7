//! MySQL connection backed by a `sqlx` pool.
//!
//! Statements are sent with the text protocol (`sqlx::raw_sql`) because
//! `CREATE TRIGGER` cannot be prepared on MySQL. Result rows are fetched
//! eagerly and decoded as text regardless of the reported column type,
//! since `SHOW` statements report binary collations on some servers.

use sqlx::mysql::{MySqlDatabaseError, MySqlPool, MySqlPoolOptions, MySqlRow};
use sqlx::Row as _;

use crate::connection::{Connection, DatabaseError, Row, RowCursor};

/// A [`Connection`] to a MySQL or MariaDB server.
#[derive(Debug, Clone)]
pub struct MySqlConnection {
    pool: MySqlPool,
}

impl MySqlConnection {
    /// Wraps an existing pool.
    #[must_use]
    pub const fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Connects to `url` with a single-connection pool, so that session
    /// state is shared by every statement of a run.
    ///
    /// # Errors
    ///
    /// Returns the `sqlx` error if the URL is invalid or the server is
    /// unreachable.
    pub async fn connect(url: &str) -> Result<Self, sqlx::Error> {
        let pool = MySqlPoolOptions::new()
            .max_connections(1)
            .connect(url)
            .await?;
        Ok(Self::new(pool))
    }

    /// Returns the underlying pool.
    #[must_use]
    pub const fn pool(&self) -> &MySqlPool {
        &self.pool
    }
}

impl Connection for MySqlConnection {
    type Cursor = RowCursor;

    async fn query(&mut self, sql: &str) -> Result<RowCursor, DatabaseError> {
        let rows = sqlx::raw_sql(sql).fetch_all(&self.pool).await?;
        Ok(RowCursor::new(rows.iter().map(text_row).collect()))
    }
}

fn text_row(row: &MySqlRow) -> Row {
    Row::new(
        (0..row.len())
            .map(|index| {
                row.try_get_unchecked::<Option<Vec<u8>>, _>(index)
                    .ok()
                    .flatten()
                    .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
            })
            .collect(),
    )
}

impl From<sqlx::Error> for DatabaseError {
    fn from(err: sqlx::Error) -> Self {
        let Some(db_err) = err.as_database_error() else {
            return DatabaseError::new(err.to_string());
        };

        let mut converted = DatabaseError::new(db_err.message());
        if let Some(state) = db_err.code() {
            converted = converted.sql_state(state.into_owned());
        }
        if let Some(mysql_err) = db_err.try_downcast_ref::<MySqlDatabaseError>() {
            converted = converted.code(u32::from(mysql_err.number()));
        }
        converted
    }
}
