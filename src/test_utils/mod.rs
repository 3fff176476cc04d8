//! In-memory stand-ins for SQL Server, for exercising the sales operations and the HTTP
//! surface without a database.

/// Scripted `SessionProvider` that records every call
pub mod scripted;
pub mod test_helpers;

pub use scripted::{ScriptedProvider, SessionEvent};
pub use test_helpers::{create_test_row, result_set};
