//! Convenient imports for common functionality.

pub use crate::error::SalesDbError;
pub use crate::http::{AppState, HttpServerConfig, build_router};
pub use crate::mssql::{MssqlOptions, MssqlSessionProvider};
pub use crate::results::{CustomDbRow, ResultSet};
pub use crate::sales::{
    CustomerSales, CustomerSalesView, CustomerUpdate, DeleteOutcome, EmployeeSales,
    MessageResponse, MonthlySales, OrderHistoryEntry, OrderInput, OrderProductLine, SalesError,
};
pub use crate::session::{DatabaseSession, SessionProvider, read_only, transaction};
pub use crate::types::RowValues;
