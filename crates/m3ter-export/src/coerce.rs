//! Integer coercion for report columns.
//!
//! Finance IDs arrive as JSON numbers, numeric strings or float-formatted
//! strings (`"555.0"`) depending on where they were typed in. All of these
//! are accepted when they hold a whole number.

use std::fmt;

use serde::{Serialize, Serializer};
use serde_json::Value;

/// Shown in place of a missing Netsuite product code in the monthly report.
pub const NOT_AVAILABLE: &str = "N/A";

/// Netsuite product code column of the monthly report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetsuiteCode {
    /// A mapped product.
    Id(i64),
    /// No mapping; written as `N/A`.
    NotAvailable,
}

impl Serialize for NetsuiteCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Id(id) => serializer.serialize_i64(*id),
            Self::NotAvailable => serializer.serialize_str(NOT_AVAILABLE),
        }
    }
}

impl fmt::Display for NetsuiteCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "{id}"),
            Self::NotAvailable => f.write_str(NOT_AVAILABLE),
        }
    }
}

/// Whole number held by a JSON value.
///
/// # Errors
///
/// Returns a reason for anything that is not a whole number.
pub fn integer(value: &Value) -> Result<i64, String> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().and_then(whole))
            .ok_or_else(|| format!("{n} is not a whole number")),
        Value::String(s) => integer_str(s),
        other => Err(format!("{other} is not a number")),
    }
}

/// Whole number held by a string such as `"555"` or `"555.0"`.
///
/// # Errors
///
/// Returns a reason for anything that is not a whole number.
pub fn integer_str(raw: &str) -> Result<i64, String> {
    let trimmed = raw.trim();
    trimmed
        .parse::<i64>()
        .ok()
        .or_else(|| trimmed.parse::<f64>().ok().and_then(whole))
        .ok_or_else(|| format!("{raw:?} is not a whole number"))
}

#[allow(clippy::cast_possible_truncation)]
fn whole(f: f64) -> Option<i64> {
    // i64::MAX is not representable as f64; 2^63 is the first value out of range.
    const LIMIT: f64 = 9_223_372_036_854_775_808.0;
    (f.is_finite() && f.fract() == 0.0 && (-LIMIT..LIMIT).contains(&f)).then_some(f as i64)
}

/// Subsidiary ID column: missing stays empty.
///
/// # Errors
///
/// Returns a reason when a present value is not a whole number.
pub fn subsidiary_id(value: Option<&Value>) -> Result<Option<i64>, String> {
    value.map(integer).transpose()
}

/// Monthly Netsuite code: missing or zero becomes `N/A`.
///
/// # Errors
///
/// Returns a reason when a present value is not a whole number.
pub fn monthly_netsuite_code(raw: Option<&str>) -> Result<NetsuiteCode, String> {
    match raw.map(integer_str).transpose()?.unwrap_or(0) {
        0 => Ok(NetsuiteCode::NotAvailable),
        id => Ok(NetsuiteCode::Id(id)),
    }
}

/// Daily Netsuite code: missing becomes 0 and stays numeric.
///
/// # Errors
///
/// Returns a reason when a present value is not a whole number.
pub fn daily_netsuite_code(raw: Option<&str>) -> Result<i64, String> {
    Ok(raw.map(integer_str).transpose()?.unwrap_or(0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn integers_from_json() {
        assert_eq!(integer(&json!(100)), Ok(100));
        assert_eq!(integer(&json!(100.0)), Ok(100));
        assert_eq!(integer(&json!("200")), Ok(200));
        assert_eq!(integer(&json!(" 555.0 ")), Ok(555));
    }

    #[test]
    fn non_integers_are_rejected() {
        assert!(integer(&json!(1.5)).is_err());
        assert!(integer(&json!("abc")).is_err());
        assert!(integer(&json!(true)).is_err());
        assert!(integer(&json!(null)).is_err());
        assert!(integer_str("1e300").is_err());
        assert!(integer_str("NaN").is_err());
    }

    #[test]
    fn missing_subsidiary_stays_empty() {
        assert_eq!(subsidiary_id(None), Ok(None));
        assert_eq!(subsidiary_id(Some(&json!(100))), Ok(Some(100)));
    }

    #[test]
    fn monthly_code_uses_not_available() {
        assert_eq!(monthly_netsuite_code(None), Ok(NetsuiteCode::NotAvailable));
        assert_eq!(monthly_netsuite_code(Some("0")), Ok(NetsuiteCode::NotAvailable));
        assert_eq!(monthly_netsuite_code(Some("555")), Ok(NetsuiteCode::Id(555)));
        assert_eq!(monthly_netsuite_code(Some("555.0")), Ok(NetsuiteCode::Id(555)));
        assert!(monthly_netsuite_code(Some("SKU-1")).is_err());
    }

    #[test]
    fn daily_code_stays_numeric() {
        assert_eq!(daily_netsuite_code(None), Ok(0));
        assert_eq!(daily_netsuite_code(Some("555")), Ok(555));
    }

    #[test]
    fn netsuite_code_display() {
        assert_eq!(NetsuiteCode::Id(555).to_string(), "555");
        assert_eq!(NetsuiteCode::NotAvailable.to_string(), "N/A");
    }
}
