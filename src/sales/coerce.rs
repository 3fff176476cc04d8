//! Lenient number fields for request bodies.
//!
//! Clients send numbers as JSON numbers or as numeric strings (`"5"`, `"14.5"`); a whole
//! float such as `12.0` is accepted where an integer is expected. Anything else is
//! rejected.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum Number {
    Int(i64),
    Float(f64),
    Text(String),
}

/// Integer from an integer, a whole float, or a string holding either.
pub fn int<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    match Number::deserialize(deserializer)? {
        Number::Int(i) => Ok(i),
        Number::Float(f) => whole(f).ok_or_else(|| D::Error::custom(format!("{f} is not a whole number"))),
        Number::Text(s) => {
            let trimmed = s.trim();
            trimmed
                .parse::<i64>()
                .ok()
                .or_else(|| trimmed.parse::<f64>().ok().and_then(whole))
                .ok_or_else(|| D::Error::custom(format!("invalid integer: {s:?}")))
        }
    }
}

/// Float from a number or a numeric string.
pub fn float<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    match Number::deserialize(deserializer)? {
        #[allow(clippy::cast_precision_loss)]
        Number::Int(i) => Ok(i as f64),
        Number::Float(f) => Ok(f),
        Number::Text(s) => s
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|f| f.is_finite())
            .ok_or_else(|| D::Error::custom(format!("invalid number: {s:?}"))),
    }
}

#[allow(clippy::cast_possible_truncation)]
fn whole(f: f64) -> Option<i64> {
    (f.is_finite() && f.fract() == 0.0 && f.abs() < 9.0e18).then_some(f as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct Sample {
        #[serde(deserialize_with = "int")]
        qty: i64,
        #[serde(deserialize_with = "float")]
        price: f64,
    }

    fn parse(value: serde_json::Value) -> Result<Sample, serde_json::Error> {
        serde_json::from_value(value)
    }

    #[test]
    fn numbers_and_numeric_strings() {
        let s = parse(json!({"qty": "5", "price": "14.5"})).unwrap();
        assert_eq!(s.qty, 5);
        assert!((s.price - 14.5).abs() < f64::EPSILON);

        let s = parse(json!({"qty": 12.0, "price": 14})).unwrap();
        assert_eq!(s.qty, 12);
        assert!((s.price - 14.0).abs() < f64::EPSILON);

        assert_eq!(parse(json!({"qty": " 7 ", "price": 0})).unwrap().qty, 7);
    }

    #[test]
    fn rejects_fractions_and_words() {
        assert!(parse(json!({"qty": 12.5, "price": 1})).is_err());
        assert!(parse(json!({"qty": "twelve", "price": 1})).is_err());
        assert!(parse(json!({"qty": 1, "price": "cheap"})).is_err());
        assert!(parse(json!({"qty": true, "price": 1})).is_err());
        assert!(parse(json!({"qty": null, "price": 1})).is_err());
    }
}
