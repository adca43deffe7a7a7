//! Field-level validation shared by the catalog forms.

use crate::error::CatalogError;

/// First year a production motorcycle existed.
pub const EARLIEST_MODEL_YEAR: i32 = 1885;
pub const EARLIEST_BRAND_YEAR: i32 = 1800;
/// Manufacturers announce model years ahead of the calendar.
pub const MODEL_YEAR_LEAD: i32 = 2;

#[must_use]
pub fn current_year() -> i32 {
    time::OffsetDateTime::now_utc().year()
}

/// Latest model year accepted right now.
#[must_use]
pub fn latest_model_year() -> i32 {
    current_year() + MODEL_YEAR_LEAD
}

/// # Errors
///
/// Returns a validation error when `value` is outside `min..=max`.
pub fn year_in_range(field: &str, value: Option<i32>, min: i32, max: i32) -> Result<(), CatalogError> {
    match value {
        Some(year) if year < min || year > max => {
            Err(CatalogError::validation(format!("{field} must be between {min} and {max}")))
        }
        _ => Ok(()),
    }
}

/// # Errors
///
/// Returns a validation error when an integer field is negative.
pub fn non_negative_int(field: &str, value: Option<i32>) -> Result<(), CatalogError> {
    match value {
        Some(n) if n < 0 => Err(CatalogError::validation(format!("{field} must not be negative"))),
        _ => Ok(()),
    }
}

/// # Errors
///
/// Returns a validation error when a float field is negative or not finite.
pub fn non_negative_float(field: &str, value: Option<f64>) -> Result<(), CatalogError> {
    match value {
        Some(n) if !n.is_finite() => Err(CatalogError::validation(format!("{field} must be a finite number"))),
        Some(n) if n < 0.0 => Err(CatalogError::validation(format!("{field} must not be negative"))),
        _ => Ok(()),
    }
}

/// # Errors
///
/// Returns a validation error unless `slug` is non-empty lowercase `a-z0-9-`
/// without leading, trailing or doubled hyphens.
pub fn slug(field: &str, value: &str) -> Result<(), CatalogError> {
    let valid = !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        && !value.starts_with('-')
        && !value.ends_with('-')
        && !value.contains("--");
    if valid {
        Ok(())
    } else {
        Err(CatalogError::validation(format!(
            "{field} may only contain lowercase letters, digits and single hyphens"
        )))
    }
}

/// Derive a slug from a title: `"Braking 101: Basics"` -> `"braking-101-basics"`.
#[must_use]
pub fn slugify(title: &str) -> String {
    let mut out = String::with_capacity(title.len());
    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c.to_ascii_lowercase());
        } else if !out.is_empty() && !out.ends_with('-') {
            out.push('-');
        }
    }
    while out.ends_with('-') {
        out.pop();
    }
    out
}

/// # Errors
///
/// Returns a validation error when `value` is not one of `allowed`.
pub fn one_of(field: &str, value: &str, allowed: &[&str]) -> Result<(), CatalogError> {
    if allowed.contains(&value) {
        Ok(())
    } else {
        Err(CatalogError::validation(format!("{field} must be one of: {}", allowed.join(", "))))
    }
}

#[cfg(test)]
#[path = "validate_test.rs"]
mod tests;
