use chrono::{NaiveDate, NaiveDateTime};

/// Values that can be stored in a database row or used as query parameters.
///
/// The same enum is used for bound parameters and for decoded cells:
/// ```rust
/// use northwind_sales_api::prelude::*;
///
/// let params = vec![
///     RowValues::Text("ALFKI".into()),
///     RowValues::Int(10248),
///     RowValues::Float(0.05),
/// ];
/// # let _ = params;
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum RowValues {
    /// Integer value (64-bit)
    Int(i64),
    /// Floating point value (64-bit); money and numeric columns decode here
    Float(f64),
    /// Text/string value
    Text(String),
    /// Boolean value
    Bool(bool),
    /// Timestamp value
    Timestamp(NaiveDateTime),
    /// Calendar date without a time of day (SQL `date`)
    Date(NaiveDate),
    /// NULL value
    Null,
    /// Binary data
    Blob(Vec<u8>),
}

impl RowValues {
    /// Check if this value is NULL
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[must_use]
    pub fn as_int(&self) -> Option<&i64> {
        if let RowValues::Int(value) = self {
            Some(value)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        if let RowValues::Text(value) = self {
            Some(value)
        } else {
            None
        }
    }

    /// Numeric view of the value. Integers widen to `f64`.
    #[must_use]
    pub fn as_float(&self) -> Option<f64> {
        match self {
            RowValues::Float(value) => Some(*value),
            #[allow(clippy::cast_precision_loss)]
            RowValues::Int(value) => Some(*value as f64),
            _ => None,
        }
    }
}

/// Render a date as `YYYY-MM-DD`.
#[must_use]
pub fn format_date(date: &NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Render a timestamp the way the history endpoint exposes `OrderDate`:
/// `YYYY-MM-DD HH:MM:SS`, with microseconds only when they are non-zero.
#[must_use]
pub fn format_timestamp(dt: &NaiveDateTime) -> String {
    use chrono::Timelike;

    if dt.nanosecond() == 0 {
        dt.format("%Y-%m-%d %H:%M:%S").to_string()
    } else {
        dt.format("%Y-%m-%d %H:%M:%S%.6f").to_string()
    }
}
