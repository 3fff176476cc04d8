use std::collections::HashMap;
use std::sync::Arc;

use crate::error::SalesDbError;
use crate::types::{RowValues, format_date, format_timestamp};

/// A row from a database query result
///
/// This struct represents a single row from a database query result,
/// with access to both the column names and the values.
#[derive(Debug, Clone)]
pub struct CustomDbRow {
    /// The column names for this row (shared across all rows in a result set)
    pub column_names: Arc<Vec<String>>,
    /// The values for this row
    pub rows: Vec<RowValues>,
    // Lower-cased column name to index, shared across the result set
    #[doc(hidden)]
    pub(crate) column_index_cache: Arc<HashMap<String, usize>>,
}

pub(crate) fn build_index_cache(column_names: &[String]) -> Arc<HashMap<String, usize>> {
    let mut cache = HashMap::with_capacity(column_names.len());
    for (i, name) in column_names.iter().enumerate() {
        // first occurrence wins for duplicated names (e.g. `SELECT *` over a join)
        cache.entry(name.to_lowercase()).or_insert(i);
    }
    Arc::new(cache)
}

impl CustomDbRow {
    /// Create a new database row
    ///
    /// # Arguments
    ///
    /// * `column_names` - The column names
    /// * `rows` - The values for this row
    #[must_use]
    pub fn new(column_names: Arc<Vec<String>>, rows: Vec<RowValues>) -> Self {
        let cache = build_index_cache(&column_names);
        Self {
            column_names,
            rows,
            column_index_cache: cache,
        }
    }

    /// Get the index of a column by name. Matching ignores ASCII case, as SQL Server does.
    #[must_use]
    pub fn get_column_index(&self, column_name: &str) -> Option<usize> {
        if let Some(&idx) = self.column_index_cache.get(&column_name.to_lowercase()) {
            return Some(idx);
        }

        self.column_names
            .iter()
            .position(|col| col.eq_ignore_ascii_case(column_name))
    }

    /// Get a value from the row by column name
    #[must_use]
    pub fn get(&self, column_name: &str) -> Option<&RowValues> {
        self.get_column_index(column_name)
            .and_then(|idx| self.rows.get(idx))
    }

    /// Get a value from the row by column index
    #[must_use]
    pub fn get_by_index(&self, index: usize) -> Option<&RowValues> {
        self.rows.get(index)
    }

    fn require(&self, column_name: &str) -> Result<&RowValues, SalesDbError> {
        self.get(column_name).ok_or_else(|| {
            SalesDbError::MappingError(format!(
                "column '{column_name}' not present in result (have: {})",
                self.column_names.join(", ")
            ))
        })
    }

    /// Integer column with NULL coerced to zero.
    ///
    /// # Errors
    /// Returns `SalesDbError::MappingError` if the column is missing or not numeric.
    pub fn int_or_zero(&self, column_name: &str) -> Result<i64, SalesDbError> {
        let value = self.require(column_name)?;
        if let Some(i) = value.as_int() {
            return Ok(*i);
        }
        match value {
            RowValues::Null => Ok(0),
            #[allow(clippy::cast_possible_truncation)]
            RowValues::Float(f) if f.fract() == 0.0 => Ok(*f as i64),
            RowValues::Bool(b) => Ok(i64::from(*b)),
            other => Err(SalesDbError::MappingError(format!(
                "column '{column_name}' is not an integer: {other:?}"
            ))),
        }
    }

    /// Numeric column as `f64` with NULL coerced to `0.0`.
    ///
    /// # Errors
    /// Returns `SalesDbError::MappingError` if the column is missing or not numeric.
    pub fn float_or_zero(&self, column_name: &str) -> Result<f64, SalesDbError> {
        let value = self.require(column_name)?;
        if value.is_null() {
            return Ok(0.0);
        }
        value.as_float().ok_or_else(|| {
            SalesDbError::MappingError(format!(
                "column '{column_name}' is not numeric: {value:?}"
            ))
        })
    }

    /// Non-null text column.
    ///
    /// # Errors
    /// Returns `SalesDbError::MappingError` if the column is missing, NULL, or not text.
    pub fn text(&self, column_name: &str) -> Result<String, SalesDbError> {
        let value = self.require(column_name)?;
        value.as_text().map(str::to_string).ok_or_else(|| {
            SalesDbError::MappingError(format!("column '{column_name}' is not text: {value:?}"))
        })
    }

    /// Date/time column rendered as text; NULL renders as `None`.
    ///
    /// # Errors
    /// Returns `SalesDbError::MappingError` if the column is missing.
    pub fn date_text(&self, column_name: &str) -> Result<Option<String>, SalesDbError> {
        let value = self.require(column_name)?;
        Ok(match value {
            RowValues::Null => None,
            RowValues::Timestamp(dt) => Some(format_timestamp(dt)),
            RowValues::Date(date) => Some(format_date(date)),
            RowValues::Text(s) => Some(s.clone()),
            other => Some(format!("{other:?}")),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::create_test_row;

    fn row(names: &[&str], values: Vec<RowValues>) -> CustomDbRow {
        create_test_row(names.iter().map(|n| (*n).to_string()).collect(), values)
    }

    #[test]
    fn lookup_by_name_ignores_case() {
        let r = row(
            &["OrderID", "ProductName"],
            vec![RowValues::Int(10248), RowValues::Text("Queso Cabrales".into())],
        );
        assert_eq!(r.get("orderid"), Some(&RowValues::Int(10248)));
        assert_eq!(r.get_column_index("PRODUCTNAME"), Some(1));
        assert!(r.get("Missing").is_none());
    }

    #[test]
    fn nulls_coerce_to_zero() {
        let r = row(
            &["Quantity", "UnitPrice"],
            vec![RowValues::Null, RowValues::Null],
        );
        assert_eq!(r.int_or_zero("Quantity").unwrap(), 0);
        assert!(r.float_or_zero("UnitPrice").unwrap().abs() < f64::EPSILON);
    }

    #[test]
    fn missing_column_is_a_mapping_error() {
        let r = row(&["Cliente"], vec![RowValues::Text("x".into())]);
        let err = r.float_or_zero("TotalVentas").unwrap_err();
        assert!(matches!(err, SalesDbError::MappingError(msg) if msg.contains("TotalVentas")));
    }

    #[test]
    fn date_columns_render_without_time() {
        let date = chrono::NaiveDate::from_ymd_opt(1997, 8, 25).unwrap();
        let r = row(
            &["OrderDate", "ShippedDate"],
            vec![
                RowValues::Date(date),
                RowValues::Timestamp(date.and_hms_opt(0, 0, 0).unwrap()),
            ],
        );
        assert_eq!(r.date_text("OrderDate").unwrap().as_deref(), Some("1997-08-25"));
        assert_eq!(
            r.date_text("ShippedDate").unwrap().as_deref(),
            Some("1997-08-25 00:00:00")
        );
    }

    #[test]
    fn text_rejects_null() {
        let r = row(&["CompanyName"], vec![RowValues::Null]);
        assert!(r.text("CompanyName").is_err());
    }
}
