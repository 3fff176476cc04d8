use super::client::MssqlClient;
use super::query::{bind_query_params, build_result_set, convert_affected_rows};
use crate::error::SalesDbError;
use crate::results::ResultSet;
use crate::types::RowValues;

/// Execute a batch of SQL statements without parameters, discarding any rows.
///
/// # Errors
///
/// Returns the driver error if execution fails.
pub async fn execute_batch(client: &mut MssqlClient, query: &str) -> Result<(), SalesDbError> {
    client.simple_query(query).await?.into_results().await?;
    Ok(())
}

/// Execute a SELECT (or a row-returning `EXEC`) with parameters.
///
/// # Errors
///
/// Returns the driver error if execution or row decoding fails.
pub async fn execute_select(
    client: &mut MssqlClient,
    query: &str,
    params: &[RowValues],
) -> Result<ResultSet, SalesDbError> {
    build_result_set(client, query, params).await
}

/// Execute a DML statement (INSERT, UPDATE, DELETE, `EXEC`) and return the affected rows.
///
/// # Errors
///
/// Returns the driver error if execution fails or rows affected cannot be converted.
pub async fn execute_dml(
    client: &mut MssqlClient,
    query: &str,
    params: &[RowValues],
) -> Result<usize, SalesDbError> {
    let exec_result = bind_query_params(query, params).execute(client).await?;

    let rows_affected: u64 = exec_result.rows_affected().iter().sum();
    convert_affected_rows(rows_affected)
}
