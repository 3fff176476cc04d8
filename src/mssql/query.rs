use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};
use futures_util::TryStreamExt;
use tiberius::Query;
use tiberius::numeric::Numeric;

use super::client::MssqlClient;
use crate::error::SalesDbError;
use crate::results::ResultSet;
use crate::types::RowValues;

/// Build a result set from a SQL Server query execution.
///
/// A statement that produces no result set (e.g. a procedure that only writes) yields an
/// empty `ResultSet`.
pub async fn build_result_set(
    client: &mut MssqlClient,
    query: &str,
    params: &[RowValues],
) -> Result<ResultSet, SalesDbError> {
    let query_builder = bind_query_params(query, params);

    let mut stream = query_builder.query(client).await?;

    let Some(columns) = stream.columns().await? else {
        // drain so the connection is clean for the next statement
        stream.into_results().await?;
        return Ok(ResultSet::default());
    };

    let column_names: Vec<String> = columns.iter().map(|col| col.name().to_string()).collect();
    let col_count = column_names.len();

    let mut result_set = ResultSet::with_capacity(16);
    result_set.set_column_names(Arc::new(column_names));

    let mut rows_stream = stream.into_row_stream();
    while let Some(row) = rows_stream.try_next().await? {
        let mut row_values = Vec::with_capacity(col_count);
        for i in 0..col_count {
            row_values.push(extract_value(&row, i));
        }
        result_set.add_row_values(row_values);
    }

    Ok(result_set)
}

/// Extract a value from a row at a specific index.
///
/// `try_get` only succeeds for the matching wire type, so the types below are tried in turn
/// and the first hit wins. Anything unrecognised (or NULL) becomes `RowValues::Null`.
fn extract_value(row: &tiberius::Row, idx: usize) -> RowValues {
    // Integers: tinyint, smallint, int, bigint
    if let Ok(Some(val)) = row.try_get::<u8, _>(idx) {
        return RowValues::Int(i64::from(val));
    }
    if let Ok(Some(val)) = row.try_get::<i16, _>(idx) {
        return RowValues::Int(i64::from(val));
    }
    if let Ok(Some(val)) = row.try_get::<i32, _>(idx) {
        return RowValues::Int(i64::from(val));
    }
    if let Ok(Some(val)) = row.try_get::<i64, _>(idx) {
        return RowValues::Int(val);
    }

    // real, float and money (tiberius decodes money as f64)
    if let Ok(Some(val)) = row.try_get::<f32, _>(idx) {
        return RowValues::Float(f64::from(val));
    }
    if let Ok(Some(val)) = row.try_get::<f64, _>(idx) {
        return RowValues::Float(val);
    }

    // decimal/numeric, e.g. SUM over money * smallint
    if let Ok(Some(val)) = row.try_get::<Numeric, _>(idx) {
        return RowValues::Float(numeric_to_f64(val));
    }

    if let Ok(Some(val)) = row.try_get::<bool, _>(idx) {
        return RowValues::Bool(val);
    }

    // datetime, smalldatetime, datetime2; `date` stays a date
    if let Ok(Some(val)) = row.try_get::<NaiveDateTime, _>(idx) {
        return RowValues::Timestamp(val);
    }
    if let Ok(Some(val)) = row.try_get::<NaiveDate, _>(idx) {
        return RowValues::Date(val);
    }

    if let Ok(Some(val)) = row.try_get::<&str, _>(idx) {
        return RowValues::Text(val.to_string());
    }

    if let Ok(Some(val)) = row.try_get::<&[u8], _>(idx) {
        return RowValues::Blob(val.to_vec());
    }

    RowValues::Null
}

#[allow(clippy::cast_precision_loss)]
fn numeric_to_f64(val: Numeric) -> f64 {
    val.value() as f64 / 10_f64.powi(i32::from(val.scale()))
}

/// Bind parameters positionally; the SQL refers to them as `@P1`, `@P2`, ...
pub fn bind_query_params<'a>(query: &'a str, params: &[RowValues]) -> Query<'a> {
    let mut query_builder = Query::new(query);

    for param in params {
        match param {
            RowValues::Int(i) => query_builder.bind(*i),
            RowValues::Float(f) => query_builder.bind(*f),
            RowValues::Text(s) => query_builder.bind(s.clone()),
            RowValues::Bool(b) => query_builder.bind(*b),
            RowValues::Timestamp(dt) => {
                query_builder.bind(dt.format("%Y-%m-%dT%H:%M:%S%.f").to_string());
            }
            RowValues::Date(date) => query_builder.bind(*date),
            RowValues::Null => query_builder.bind(Option::<String>::None),
            RowValues::Blob(bytes) => query_builder.bind(bytes.clone()),
        }
    }

    query_builder
}

/// Convert a driver row count into `usize`.
///
/// # Errors
/// Returns `SalesDbError::ExecutionError` if the count does not fit.
pub fn convert_affected_rows(rows_affected: u64) -> Result<usize, SalesDbError> {
    usize::try_from(rows_affected)
        .map_err(|e| SalesDbError::ExecutionError(format!("Invalid rows affected count: {e}")))
}
