// MSSQL module - SQL Server access for the sales endpoints
//
// - client: raw connection setup
// - config: connection options and the pooled connection manager
// - query: parameter binding and result decoding
// - executor: statement execution against one connection
// - transaction: BEGIN/COMMIT/ROLLBACK bookkeeping
// - session: the pooled `SessionProvider` implementation

pub mod client;
pub mod config;
pub mod executor;
pub mod query;
pub mod session;
pub mod transaction;

// Re-export the public API
pub use client::{MssqlClient, connect};
pub use config::{MssqlManager, MssqlOptions, MssqlPool};
pub use executor::{execute_batch, execute_dml, execute_select};
pub use query::{bind_query_params, build_result_set};
pub use session::{MssqlSession, MssqlSessionProvider};
pub use transaction::Tx;
