//! Request payload shaping before writes.
//!
//! Form fields arrive loosely typed: numbers may be sent as strings and an
//! emptied input arrives as `""`. The deserializers here turn those into
//! `Option<T>` so the services only ever see typed values or NULL.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::error::CatalogError;

/// Trim a text field. Blank strings become `None`.
#[must_use]
pub fn clean_text(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_owned())
        .filter(|s| !s.is_empty())
}

/// Trim a required text field.
///
/// # Errors
///
/// Returns a validation error naming `field` when the value is missing or blank.
pub fn require_text(field: &str, value: Option<String>) -> Result<String, CatalogError> {
    clean_text(value).ok_or_else(|| CatalogError::validation(format!("{field} is required")))
}

/// Trim each entry of a list and drop blanks. `None` stays `None`.
#[must_use]
pub fn clean_list(value: Option<Vec<String>>) -> Option<Vec<String>> {
    value.map(|items| items.into_iter().filter_map(|s| clean_text(Some(s))).collect())
}

fn lenient_number(value: Option<Value>) -> Result<Option<f64>, String> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n.as_f64().map(Some).ok_or_else(|| format!("invalid number: {n}")),
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return Ok(None);
            }
            trimmed
                .parse::<f64>()
                .map(Some)
                .map_err(|_| format!("invalid number: {trimmed}"))
        }
        Some(other) => Err(format!("expected a number, got {other}")),
    }
}

/// Deserialize an optional float that may be sent as a string or `""`.
///
/// # Errors
///
/// Fails on non-numeric strings and non-scalar JSON.
pub fn lenient_f64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    let raw = Option::<Value>::deserialize(deserializer)?;
    lenient_number(raw).map_err(serde::de::Error::custom)
}

/// Deserialize an optional integer that may be sent as a string or `""`.
///
/// # Errors
///
/// Fails on fractional values, values outside `i32`, and non-numeric input.
pub fn lenient_i32<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i32>, D::Error> {
    let raw = Option::<Value>::deserialize(deserializer)?;
    match lenient_number(raw).map_err(serde::de::Error::custom)? {
        None => Ok(None),
        Some(n) if n.fract() == 0.0 && n >= f64::from(i32::MIN) && n <= f64::from(i32::MAX) => {
            #[allow(clippy::cast_possible_truncation)]
            Ok(Some(n as i32))
        }
        Some(n) => Err(serde::de::Error::custom(format!("expected a whole number, got {n}"))),
    }
}

/// Deserialize an optional UUID where `""` means none.
///
/// # Errors
///
/// Fails when a non-empty string is not a UUID.
pub fn lenient_uuid<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<uuid::Uuid>, D::Error> {
    let raw = Option::<String>::deserialize(deserializer)?;
    match clean_text(raw) {
        None => Ok(None),
        Some(s) => uuid::Uuid::parse_str(&s)
            .map(Some)
            .map_err(|_| serde::de::Error::custom(format!("invalid id: {s}"))),
    }
}

#[cfg(test)]
#[path = "payload_test.rs"]
mod tests;
