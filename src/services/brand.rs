//! Brand service — CRUD over the `brands` table.

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use super::payload::{clean_text, lenient_i32, require_text};
use super::rows::{self, ColumnValue, Columns};
use super::validate;
use crate::error::CatalogError;

const TABLE: &str = "brands";
const ENTITY: &str = "brand";

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Brand {
    pub id: Uuid,
    pub name: String,
    pub country: Option<String>,
    pub founded_year: Option<i32>,
    pub website_url: Option<String>,
    pub logo_url: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BrandInput {
    pub name: Option<String>,
    pub country: Option<String>,
    #[serde(default, deserialize_with = "lenient_i32")]
    pub founded_year: Option<i32>,
    pub website_url: Option<String>,
    pub logo_url: Option<String>,
    pub description: Option<String>,
}

impl BrandInput {
    /// Validate and shape the form into typed columns.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a missing name, an out-of-range
    /// founding year, or a website URL without an http(s) scheme.
    pub fn into_columns(self) -> Result<Columns, CatalogError> {
        let name = require_text("name", self.name)?;
        validate::year_in_range(
            "founded_year",
            self.founded_year,
            validate::EARLIEST_BRAND_YEAR,
            validate::current_year(),
        )?;
        let website_url = clean_text(self.website_url);
        if let Some(url) = website_url.as_deref() {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(CatalogError::validation("website_url must start with http:// or https://"));
            }
        }

        Ok(vec![
            ("name", ColumnValue::Text(Some(name))),
            ("country", ColumnValue::Text(clean_text(self.country))),
            ("founded_year", ColumnValue::Int(self.founded_year)),
            ("website_url", ColumnValue::Text(website_url)),
            ("logo_url", ColumnValue::Text(clean_text(self.logo_url))),
            ("description", ColumnValue::Text(clean_text(self.description))),
        ])
    }
}

const SELECT_BRAND: &str = "SELECT id, name, country, founded_year, website_url, logo_url, description FROM brands";

/// List all brands ordered by name.
///
/// # Errors
///
/// Returns a database error if the query fails.
pub async fn list_brands(pool: &PgPool) -> Result<Vec<Brand>, CatalogError> {
    let rows = sqlx::query_as::<_, Brand>(&format!("{SELECT_BRAND} ORDER BY name ASC"))
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// # Errors
///
/// Returns `NotFound` or a database error.
pub async fn get_brand(pool: &PgPool, id: Uuid) -> Result<Brand, CatalogError> {
    sqlx::query_as::<_, Brand>(&format!("{SELECT_BRAND} WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| CatalogError::not_found(ENTITY, id))
}

/// # Errors
///
/// Returns a validation error, a conflict on duplicate name, or a database error.
pub async fn create_brand(pool: &PgPool, input: BrandInput) -> Result<Brand, CatalogError> {
    let columns = input.into_columns()?;
    let id = rows::insert_row(pool, TABLE, &columns).await?;
    info!(%id, "brand created");
    get_brand(pool, id).await
}

/// # Errors
///
/// Returns a validation error, `NotFound`, a conflict, or a database error.
pub async fn update_brand(pool: &PgPool, id: Uuid, input: BrandInput) -> Result<Brand, CatalogError> {
    let columns = input.into_columns()?;
    rows::update_row(pool, TABLE, ENTITY, id, &columns).await?;
    get_brand(pool, id).await
}

/// Delete a brand. Fails with a reference error while models still use it.
///
/// # Errors
///
/// Returns `NotFound`, `Reference`, or a database error.
pub async fn delete_brand(pool: &PgPool, id: Uuid) -> Result<(), CatalogError> {
    rows::delete_row(pool, TABLE, ENTITY, id).await?;
    info!(%id, "brand deleted");
    Ok(())
}

#[cfg(test)]
#[path = "brand_test.rs"]
mod tests;
