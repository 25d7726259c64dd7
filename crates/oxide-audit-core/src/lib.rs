//! # oxide-audit-core
//!
//! Statement generation for trigger-based audit tables.
//!
//! Given the `SHOW CREATE TABLE` text of a base table, this crate derives
//! a companion audit table and the three triggers that copy every row
//! version written to the base table into it:
//!
//! - **Parser** - extracts columns, primary key, auto-increment column and
//!   unique keys from the table definition ([`SchemaParser`], [`LineParser`])
//! - **Schema** - the immutable [`TableSchema`] the parser produces
//! - **Naming** - fixed audit table and trigger names ([`AuditTarget`])
//! - **Dialect** - SQL text for the audit table and triggers ([`AuditDialect`])
//! - **Planner** - reconciles candidate statements with the live
//!   [`AuditStatus`] into an ordered [`AuditPlan`]
//!
//! No I/O happens here. Probing the database and executing the plan live in
//! the `oxide-audit` crate.
//!
//! # Example
//!
//! ```rust
//! use oxide_audit_core::prelude::*;
//!
//! let ddl = "CREATE TABLE `t` (
//!   `id` int NOT NULL AUTO_INCREMENT,
//!   `foo` char(20) DEFAULT NULL,
//!   PRIMARY KEY (`id`)
//! ) ENGINE=InnoDB DEFAULT CHARSET=utf8mb4";
//!
//! let schema = LineParser::new().parse(ddl).unwrap();
//! let status = AuditStatus::base_only();
//! let options = AuditOptions::new();
//!
//! let plan = AuditPlanner::new(&MySqlDialect::new(), &options)
//!     .plan("t", &schema, &status)
//!     .unwrap();
//!
//! // create, adjust, then the insert/delete/update triggers
//! assert_eq!(plan.len(), 5);
//! ```

pub mod dialect;
pub mod error;
pub mod naming;
pub mod options;
pub mod parser;
pub mod planner;
pub mod schema;
pub mod status;

pub use dialect::{AuditDialect, MySqlDialect};
pub use error::{ParseError, PlanError};
pub use naming::{AuditTarget, RowSource, TriggerKind, TriggerTiming};
pub use options::AuditOptions;
pub use parser::{LineParser, SchemaParser};
pub use planner::{AuditPlan, AuditPlanner, PlannedStatement, StatementKind};
pub use schema::{AutoIncrementColumn, KeyPart, TableSchema, UniqueKey};
pub use status::AuditStatus;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::dialect::{AuditDialect, MySqlDialect};
    pub use crate::error::{ParseError, PlanError};
    pub use crate::naming::{AuditTarget, TriggerKind};
    pub use crate::options::AuditOptions;
    pub use crate::parser::{LineParser, SchemaParser};
    pub use crate::planner::{AuditPlan, AuditPlanner, PlannedStatement, StatementKind};
    pub use crate::schema::TableSchema;
    pub use crate::status::AuditStatus;
}
