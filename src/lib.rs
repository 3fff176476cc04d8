//! HTTP facade over the Northwind sales database on SQL Server.
//!
//! Every endpoint is one fixed statement, view selection or stored-procedure call. The
//! [`session`] module hands each request its own pooled connection and owns the
//! commit/rollback policy; [`sales`] holds the SQL and row mapping; [`http`] is the axum
//! surface.

pub mod config;
pub mod error;
pub mod http;
pub mod mssql;
pub mod prelude;
pub mod results;
pub mod sales;
pub mod session;
pub mod types;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use error::SalesDbError;
pub use results::{CustomDbRow, ResultSet};
pub use types::RowValues;
