//! Profile service — catalog users and their roles.

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use super::payload::{clean_text, require_text};
use super::rows::{self, ColumnValue};
use crate::error::CatalogError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Admin,
}

impl Role {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Admin => "admin",
        }
    }

    #[must_use]
    pub fn from_str(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "user" => Some(Self::User),
            "admin" => Some(Self::Admin),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Profile {
    pub id: Uuid,
    pub username: String,
    pub display_name: Option<String>,
    pub role: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileInput {
    pub username: Option<String>,
    pub display_name: Option<String>,
    pub role: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RoleInput {
    pub role: String,
}

/// Usernames are 3-32 characters of `a-z`, `0-9`, `_` or `.`.
///
/// # Errors
///
/// Returns a validation error for anything else.
pub fn check_username(username: &str) -> Result<(), CatalogError> {
    let len_ok = (3..=32).contains(&username.chars().count());
    let chars_ok = username
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '.');
    if len_ok && chars_ok {
        Ok(())
    } else {
        Err(CatalogError::validation(
            "username must be 3-32 characters of lowercase letters, digits, '_' or '.'",
        ))
    }
}

fn parse_role(raw: &str) -> Result<Role, CatalogError> {
    Role::from_str(raw).ok_or_else(|| CatalogError::validation("role must be one of: user, admin"))
}

const SELECT_PROFILE: &str = "SELECT id, username, display_name, role FROM profiles";

/// # Errors
///
/// Returns a database error if the query fails.
pub async fn list_profiles(pool: &PgPool) -> Result<Vec<Profile>, CatalogError> {
    let rows = sqlx::query_as::<_, Profile>(&format!("{SELECT_PROFILE} ORDER BY username ASC"))
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// # Errors
///
/// Returns `NotFound` or a database error.
pub async fn get_profile(pool: &PgPool, id: Uuid) -> Result<Profile, CatalogError> {
    sqlx::query_as::<_, Profile>(&format!("{SELECT_PROFILE} WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| CatalogError::not_found("profile", id))
}

/// # Errors
///
/// Returns a validation error, a conflict on a taken username, or a database error.
pub async fn create_profile(pool: &PgPool, input: ProfileInput) -> Result<Profile, CatalogError> {
    let username = require_text("username", input.username)?.to_ascii_lowercase();
    check_username(&username)?;
    let role = match clean_text(input.role) {
        Some(raw) => parse_role(&raw)?,
        None => Role::User,
    };
    let columns = vec![
        ("username", ColumnValue::Text(Some(username))),
        ("display_name", ColumnValue::Text(clean_text(input.display_name))),
        ("role", ColumnValue::Text(Some(role.as_str().to_owned()))),
    ];
    let id = rows::insert_row(pool, "profiles", &columns).await?;
    info!(%id, role = role.as_str(), "profile created");
    get_profile(pool, id).await
}

/// # Errors
///
/// Returns a validation error for an unknown role, `NotFound`, or a database error.
pub async fn update_role(pool: &PgPool, id: Uuid, input: RoleInput) -> Result<Profile, CatalogError> {
    let role = parse_role(&input.role)?;
    rows::update_row(pool, "profiles", "profile", id, &[("role", ColumnValue::Text(Some(role.as_str().to_owned())))])
        .await?;
    info!(%id, role = role.as_str(), "profile role changed");
    get_profile(pool, id).await
}

#[cfg(test)]
#[path = "profile_test.rs"]
mod tests;
