//! Catalog error taxonomy and its HTTP mapping.
//!
//! DESIGN
//! ======
//! Every service returns `CatalogError`. Database failures are classified by
//! their Postgres SQLSTATE so constraint violations reach the caller as a
//! readable message instead of a raw driver error. Handlers return the error
//! directly; `IntoResponse` renders `{ "error": .., "code": .. }`.

use std::fmt::Display;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tracing::{error, warn};

const PG_UNIQUE_VIOLATION: &str = "23505";
const PG_FOREIGN_KEY_VIOLATION: &str = "23503";
const PG_NOT_NULL_VIOLATION: &str = "23502";
const PG_CHECK_VIOLATION: &str = "23514";

/// Stable machine-readable code for an error.
pub trait ErrorCode: Display {
    fn error_code(&self) -> &'static str;
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("{0}")]
    Validation(String),
    #[error("{entity} not found: {key}")]
    NotFound { entity: &'static str, key: String },
    #[error("{0}")]
    Conflict(String),
    #[error("{blocked} target year(s) already have a configuration with this name; enable overwrite to update them")]
    OverwriteBlocked { blocked: usize },
    #[error("{0}")]
    Reference(String),
    #[error("database error: {0}")]
    Database(sqlx::Error),
}

impl CatalogError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn not_found(entity: &'static str, key: impl Display) -> Self {
        Self::NotFound { entity, key: key.to_string() }
    }

    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Conflict(_) | Self::OverwriteBlocked { .. } | Self::Reference(_) => StatusCode::CONFLICT,
            Self::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl ErrorCode for CatalogError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "E_VALIDATION",
            Self::NotFound { .. } => "E_NOT_FOUND",
            Self::Conflict(_) => "E_CONFLICT",
            Self::OverwriteBlocked { .. } => "E_OVERWRITE_BLOCKED",
            Self::Reference(_) => "E_REFERENCE",
            Self::Database(_) => "E_DATABASE",
        }
    }
}

/// Classification of a Postgres constraint failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintKind {
    Unique,
    ForeignKey,
    NotNull,
    Check,
}

/// Map a SQLSTATE code and optional constraint name to a readable message.
/// Returns `None` for codes that are not constraint violations.
#[must_use]
pub fn describe_db_error(code: &str, constraint: Option<&str>) -> Option<(ConstraintKind, String)> {
    let subject = constraint.map(constraint_subject);
    match code {
        PG_UNIQUE_VIOLATION => Some((
            ConstraintKind::Unique,
            match subject {
                Some(s) => format!("a record with this {s} already exists"),
                None => "a record with these values already exists".to_owned(),
            },
        )),
        PG_FOREIGN_KEY_VIOLATION => Some((
            ConstraintKind::ForeignKey,
            match subject {
                Some(s) => format!("the referenced {s} does not exist or is still in use"),
                None => "a related record does not exist or is still in use".to_owned(),
            },
        )),
        PG_NOT_NULL_VIOLATION => Some((ConstraintKind::NotNull, "a required field is missing".to_owned())),
        PG_CHECK_VIOLATION => Some((
            ConstraintKind::Check,
            match subject {
                Some(s) => format!("the value for {s} is out of range"),
                None => "a value is out of range".to_owned(),
            },
        )),
        _ => None,
    }
}

/// `model_configurations_model_year_id_name_key` -> `model year id name`.
fn constraint_subject(constraint: &str) -> String {
    let trimmed = ["_key", "_fkey", "_check", "_idx"]
        .iter()
        .find_map(|suffix| constraint.strip_suffix(suffix))
        .unwrap_or(constraint);
    let trimmed = ["model_configurations_", "model_component_assignments_", "motorcycle_models_"]
        .iter()
        .chain(
            [
                "model_years_",
                "brands_",
                "engines_",
                "brake_systems_",
                "frames_",
                "suspensions_",
                "wheels_",
                "courses_",
                "lessons_",
                "glossary_terms_",
                "profiles_",
            ]
            .iter(),
        )
        .find_map(|prefix| trimmed.strip_prefix(prefix))
        .unwrap_or(trimmed);
    trimmed.replace('_', " ")
}

impl From<sqlx::Error> for CatalogError {
    fn from(err: sqlx::Error) -> Self {
        let classified = err.as_database_error().and_then(|db_err| {
            let code = db_err.code()?;
            describe_db_error(&code, db_err.constraint())
        });
        match classified {
            Some((ConstraintKind::Unique, message)) => Self::Conflict(message),
            Some((ConstraintKind::ForeignKey, message)) => Self::Reference(message),
            Some((ConstraintKind::NotNull | ConstraintKind::Check, message)) => Self::Validation(message),
            None => Self::Database(err),
        }
    }
}

impl IntoResponse for CatalogError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, code = self.error_code(), "request failed");
        } else {
            warn!(error = %self, code = self.error_code(), "request rejected");
        }
        let message = match &self {
            Self::Database(_) => "an unexpected database error occurred".to_owned(),
            other => other.to_string(),
        };
        let mut body = serde_json::json!({ "error": message, "code": self.error_code() });
        if let Self::OverwriteBlocked { blocked } = &self {
            body["blocked"] = serde_json::json!(blocked);
        }
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
#[path = "error_test.rs"]
mod tests;
