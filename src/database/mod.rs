//! Database abstraction layer
//!
//! Provides database-agnostic support for SQLite and PostgreSQL using SQLx,
//! plus the report-store seam consumed by the aggregation run.

pub mod connection;
pub mod store;
pub mod types;

pub use connection::DatabaseManager;
pub use store::{ReportStore, SqlReportStore, StoreError};
pub use types::DatabaseType;
