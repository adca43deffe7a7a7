//! Motorcycle service — models and their production years.
//!
//! DESIGN
//! ======
//! A model belongs to a brand and owns model years; each year owns its
//! configurations. The public surface only sees published models, while the
//! admin surface sees drafts too. `get_model_detail` assembles the full tree
//! with three flat queries rather than one wide join.

use serde::{Deserialize, Serialize};
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::info;
use uuid::Uuid;

use super::configuration::{self, Configuration};
use super::payload::{clean_text, lenient_i32, lenient_uuid, require_text};
use super::rows::{self, ColumnValue, Columns};
use super::validate;
use crate::error::CatalogError;

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct MotorcycleModel {
    pub id: Uuid,
    pub brand_id: Uuid,
    pub brand_name: String,
    pub name: String,
    pub category: Option<String>,
    pub production_start_year: Option<i32>,
    pub production_end_year: Option<i32>,
    pub description: Option<String>,
    pub is_published: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ModelInput {
    #[serde(default, deserialize_with = "lenient_uuid")]
    pub brand_id: Option<Uuid>,
    pub name: Option<String>,
    pub category: Option<String>,
    #[serde(default, deserialize_with = "lenient_i32")]
    pub production_start_year: Option<i32>,
    #[serde(default, deserialize_with = "lenient_i32")]
    pub production_end_year: Option<i32>,
    pub description: Option<String>,
    #[serde(default)]
    pub is_published: bool,
}

impl ModelInput {
    /// # Errors
    ///
    /// Returns a validation error for a missing brand or name, production
    /// years out of range, or an end year before the start year.
    pub fn into_columns(self) -> Result<Columns, CatalogError> {
        let brand_id = self
            .brand_id
            .ok_or_else(|| CatalogError::validation("brand_id is required"))?;
        let name = require_text("name", self.name)?;
        let latest = validate::latest_model_year();
        validate::year_in_range(
            "production_start_year",
            self.production_start_year,
            validate::EARLIEST_MODEL_YEAR,
            latest,
        )?;
        validate::year_in_range(
            "production_end_year",
            self.production_end_year,
            validate::EARLIEST_MODEL_YEAR,
            latest,
        )?;
        if let (Some(start), Some(end)) = (self.production_start_year, self.production_end_year) {
            if end < start {
                return Err(CatalogError::validation(
                    "production_end_year must not be before production_start_year",
                ));
            }
        }

        Ok(vec![
            ("brand_id", ColumnValue::Id(Some(brand_id))),
            ("name", ColumnValue::Text(Some(name))),
            ("category", ColumnValue::Text(clean_text(self.category))),
            ("production_start_year", ColumnValue::Int(self.production_start_year)),
            ("production_end_year", ColumnValue::Int(self.production_end_year)),
            ("description", ColumnValue::Text(clean_text(self.description))),
            ("is_published", ColumnValue::Bool(Some(self.is_published))),
        ])
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ModelFilter {
    pub brand_id: Option<Uuid>,
    pub category: Option<String>,
    #[serde(default)]
    pub include_drafts: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ModelYear {
    pub id: Uuid,
    pub model_id: Uuid,
    pub year: i32,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ModelYearInput {
    #[serde(default, deserialize_with = "lenient_i32")]
    pub year: Option<i32>,
    pub notes: Option<String>,
}

impl ModelYearInput {
    /// # Errors
    ///
    /// Returns a validation error when the year is missing or out of range.
    pub fn into_columns(self) -> Result<Columns, CatalogError> {
        let year = self.year.ok_or_else(|| CatalogError::validation("year is required"))?;
        validate::year_in_range("year", Some(year), validate::EARLIEST_MODEL_YEAR, validate::latest_model_year())?;
        Ok(vec![
            ("year", ColumnValue::Int(Some(year))),
            ("notes", ColumnValue::Text(clean_text(self.notes))),
        ])
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct YearDetail {
    #[serde(flatten)]
    pub year: ModelYear,
    pub configurations: Vec<Configuration>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ModelDetail {
    #[serde(flatten)]
    pub model: MotorcycleModel,
    pub years: Vec<YearDetail>,
}

/// Group configurations under their years, keeping year order.
#[must_use]
pub fn assemble_years(years: Vec<ModelYear>, configurations: Vec<Configuration>) -> Vec<YearDetail> {
    let mut details: Vec<YearDetail> = years
        .into_iter()
        .map(|year| YearDetail { year, configurations: Vec::new() })
        .collect();
    for config in configurations {
        if let Some(detail) = details
            .iter_mut()
            .find(|d| d.year.id == config.model_year_id)
        {
            detail.configurations.push(config);
        }
    }
    details
}

// =============================================================================
// MODELS
// =============================================================================

const SELECT_MODEL: &str = "SELECT m.id, m.brand_id, b.name AS brand_name, m.name, m.category, \
     m.production_start_year, m.production_end_year, m.description, m.is_published \
     FROM motorcycle_models m JOIN brands b ON b.id = m.brand_id";

/// List models ordered by brand name, then model name.
///
/// # Errors
///
/// Returns a database error if the query fails.
pub async fn list_models(pool: &PgPool, filter: &ModelFilter) -> Result<Vec<MotorcycleModel>, CatalogError> {
    let mut builder: QueryBuilder<'_, Postgres> = QueryBuilder::new(SELECT_MODEL);
    builder.push(" WHERE TRUE");
    if !filter.include_drafts {
        builder.push(" AND m.is_published");
    }
    if let Some(brand_id) = filter.brand_id {
        builder.push(" AND m.brand_id = ");
        builder.push_bind(brand_id);
    }
    if let Some(category) = clean_text(filter.category.clone()) {
        builder.push(" AND m.category = ");
        builder.push_bind(category);
    }
    builder.push(" ORDER BY b.name ASC, m.name ASC");

    let rows = builder
        .build_query_as::<MotorcycleModel>()
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// # Errors
///
/// Returns `NotFound` or a database error.
pub async fn get_model(pool: &PgPool, id: Uuid) -> Result<MotorcycleModel, CatalogError> {
    sqlx::query_as::<_, MotorcycleModel>(&format!("{SELECT_MODEL} WHERE m.id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| CatalogError::not_found("motorcycle model", id))
}

/// Load a model with all years and configurations.
/// `published_only` hides drafts behind `NotFound`.
///
/// # Errors
///
/// Returns `NotFound` or a database error.
pub async fn get_model_detail(pool: &PgPool, id: Uuid, published_only: bool) -> Result<ModelDetail, CatalogError> {
    let model = get_model(pool, id).await?;
    if published_only && !model.is_published {
        return Err(CatalogError::not_found("motorcycle model", id));
    }
    let years = list_years(pool, id).await?;
    let configurations = configuration::list_for_model(pool, id).await?;
    Ok(ModelDetail { model, years: assemble_years(years, configurations) })
}

/// # Errors
///
/// Returns a validation error, a reference error for an unknown brand, a
/// conflict on a duplicate name within the brand, or a database error.
pub async fn create_model(pool: &PgPool, input: ModelInput) -> Result<MotorcycleModel, CatalogError> {
    let columns = input.into_columns()?;
    let id = rows::insert_row(pool, "motorcycle_models", &columns).await?;
    info!(%id, "motorcycle model created");
    get_model(pool, id).await
}

/// # Errors
///
/// Returns a validation error, `NotFound`, a conflict, or a database error.
pub async fn update_model(pool: &PgPool, id: Uuid, input: ModelInput) -> Result<MotorcycleModel, CatalogError> {
    let columns = input.into_columns()?;
    rows::update_row(pool, "motorcycle_models", "motorcycle model", id, &columns).await?;
    get_model(pool, id).await
}

/// Delete a model. Years, configurations and assignments cascade.
///
/// # Errors
///
/// Returns `NotFound` or a database error.
pub async fn delete_model(pool: &PgPool, id: Uuid) -> Result<(), CatalogError> {
    rows::delete_row(pool, "motorcycle_models", "motorcycle model", id).await?;
    info!(%id, "motorcycle model deleted");
    Ok(())
}

// =============================================================================
// MODEL YEARS
// =============================================================================

/// # Errors
///
/// Returns a database error if the query fails.
pub async fn list_years(pool: &PgPool, model_id: Uuid) -> Result<Vec<ModelYear>, CatalogError> {
    let rows = sqlx::query_as::<_, ModelYear>(
        "SELECT id, model_id, year, notes FROM model_years WHERE model_id = $1 ORDER BY year DESC",
    )
    .bind(model_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// # Errors
///
/// Returns `NotFound` or a database error.
pub async fn get_year(pool: &PgPool, id: Uuid) -> Result<ModelYear, CatalogError> {
    sqlx::query_as::<_, ModelYear>("SELECT id, model_id, year, notes FROM model_years WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| CatalogError::not_found("model year", id))
}

/// # Errors
///
/// Returns a validation error, `NotFound` for an unknown model, a conflict
/// when the year already exists for the model, or a database error.
pub async fn create_year(pool: &PgPool, model_id: Uuid, input: ModelYearInput) -> Result<ModelYear, CatalogError> {
    get_model(pool, model_id).await?;
    let mut columns = input.into_columns()?;
    columns.push(("model_id", ColumnValue::Id(Some(model_id))));
    let id = rows::insert_row(pool, "model_years", &columns).await?;
    info!(%id, %model_id, "model year created");
    get_year(pool, id).await
}

/// # Errors
///
/// Returns a validation error, `NotFound`, a conflict, or a database error.
pub async fn update_year(pool: &PgPool, id: Uuid, input: ModelYearInput) -> Result<ModelYear, CatalogError> {
    let columns = input.into_columns()?;
    rows::update_row(pool, "model_years", "model year", id, &columns).await?;
    get_year(pool, id).await
}

/// # Errors
///
/// Returns `NotFound` or a database error.
pub async fn delete_year(pool: &PgPool, id: Uuid) -> Result<(), CatalogError> {
    rows::delete_row(pool, "model_years", "model year", id).await?;
    info!(%id, "model year deleted");
    Ok(())
}

#[cfg(test)]
#[path = "motorcycle_test.rs"]
mod tests;
