//! Sales endpoints' database work: fixed SQL, row-to-record mapping, and the
//! commit/rollback policy of each operation.

mod coerce;
pub mod models;
pub mod queries;
pub mod service;

use thiserror::Error;

use crate::error::SalesDbError;

pub use models::{
    CustomerSales, CustomerSalesView, CustomerUpdate, DeleteOutcome, EmployeeSales,
    MessageResponse, MonthlySales, OrderHistoryEntry, OrderInput, OrderProductLine,
};

#[derive(Debug, Error)]
pub enum SalesError {
    #[error(transparent)]
    Db(#[from] SalesDbError),

    /// A customer update matched no row.
    #[error("Cliente no encontrado")]
    CustomerNotFound(String),
}
