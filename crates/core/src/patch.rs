//! Partial-update helpers.
//!
//! Update payloads need to tell "field omitted" apart from "field set to null":
//! the first leaves the stored value alone, the second clears it.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Deserialize a present field (even `null`) as `Some(..)`.
///
/// Pair with `#[serde(default)]` so an absent field stays `None`.
pub fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Minutes from a number or a numeric string.
///
/// Positive values keep their whole part (at least 1); anything else,
/// including non-numeric input, yields `None` so the default applies later.
pub fn coerce_minutes(value: &Value) -> Option<i64> {
    let number = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    if !number.is_finite() || number <= 0.0 {
        return None;
    }
    Some((number.trunc() as i64).max(1))
}

/// Lenient `estimatedMinutes`: never fails, unusable input becomes `None`.
pub fn lenient_minutes<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(coerce_minutes))
}

/// [`lenient_minutes`] for update payloads: a present field is `Some(..)`.
pub fn lenient_minutes_patch<'de, D>(deserializer: D) -> Result<Option<Option<i64>>, D::Error>
where
    D: Deserializer<'de>,
{
    lenient_minutes(deserializer).map(Some)
}

/// Text field that treats non-string JSON as missing.
pub fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Ok(Some(s)),
        _ => Ok(None),
    }
}

/// [`lenient_string`] for update payloads: a present non-string is `Some(None)`.
pub fn lenient_string_patch<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    lenient_string(deserializer).map(Some)
}

/// `true` when the value is missing or only whitespace.
pub fn is_blank(value: Option<&str>) -> bool {
    value.map_or(true, |v| v.trim().is_empty())
}

/// Trim a free-text field, mapping empty results to `None`.
pub fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn minutes_coerce_like_numbers() {
        assert_eq!(coerce_minutes(&json!(45)), Some(45));
        assert_eq!(coerce_minutes(&json!(45.5)), Some(45));
        assert_eq!(coerce_minutes(&json!(0.4)), Some(1));
        assert_eq!(coerce_minutes(&json!(" 300 ")), Some(300));
        assert_eq!(coerce_minutes(&json!("239.9")), Some(239));
    }

    #[test]
    fn unusable_minutes_are_none() {
        for value in [json!(0), json!(-5), json!("soon"), json!(""), json!(true), json!([30]), json!(null)] {
            assert_eq!(coerce_minutes(&value), None, "{value}");
        }
    }
}
