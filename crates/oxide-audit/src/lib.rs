//! Trigger-based audit tables for MySQL.
//!
//! `oxide-audit` adds change-history tracking to an existing table without
//! touching application code. For a base table `t` it creates `audit_t`
//! and three triggers that record every row version written to `t`:
//!
//! - the row as inserted (`audit_t_inserts`, after insert)
//! - the row as it exists after each update (`audit_t_updates`)
//! - the row as it existed just before a delete (`audit_t_deletes`)
//!
//! Each audit row carries `audit_id`, `audit_datetime`, `audit_event` and,
//! when `t` has a primary key, a per-row `audit_item_version` starting at 1.
//!
//! `DROP TABLE` and `TRUNCATE TABLE` do not fire row triggers and are not
//! recorded. Foreign keys are not mirrored onto the audit table.
//!
//! # Architecture
//!
//! - **Connection** - the query/cursor capability consumed from a driver
//! - **Prober** - lists tables and triggers into an `AuditStatus`
//! - **Creator** - probes, parses, plans and optionally executes one table
//! - **Executor** - runs statements in order, optionally logging to a file
//!
//! Statement generation itself lives in `oxide-audit-core`.
//!
//! # Example
//!
//! ```rust,ignore
//! use oxide_audit::prelude::*;
//!
//! let connection = MySqlConnection::connect("mysql://root@localhost/app").await?;
//! let mut creator = AuditTableCreator::new("users", connection)
//!     .strict_if_triggers_exist(true);
//!
//! // Inspect first...
//! for sql in creator.generate_sql_statements().await? {
//!     println!("{sql};");
//! }
//!
//! // ...then apply, appending every statement to a log file.
//! creator.execute(Some(Path::new("/var/log/audit_users.log"))).await?;
//! ```
//!
//! # CLI Usage
//!
//! ```bash
//! # Show the statements that would run
//! oxide-audit sql users
//!
//! # Create the audit table and triggers
//! oxide-audit apply users --log-file /var/log/audit_users.log
//!
//! # Show which parts already exist
//! oxide-audit status users
//! ```

pub mod connection;
pub mod creator;
pub mod error;
pub mod executor;
pub mod mysql;
pub mod prober;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::connection::{Connection, Cursor, DatabaseError, FetchStyle, Row, RowCursor};
    pub use crate::creator::AuditTableCreator;
    pub use crate::error::{AuditError, Result};
    pub use crate::executor::{ExecutionLog, StatementExecutor};
    pub use crate::mysql::MySqlConnection;
    pub use crate::prober::StateProber;
    pub use oxide_audit_core::prelude::*;
}
