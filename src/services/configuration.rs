//! Configuration service — trim levels of a model year.
//!
//! DESIGN
//! ======
//! A configuration is a named variant of a model year with its own basic
//! info, component picks and dimensions. Names are unique per year and at
//! most one configuration per year is the default; both are enforced by the
//! schema. Marking a configuration as default clears the flag on its
//! siblings inside the same transaction as the write.

use serde::{Deserialize, Serialize};
use sqlx::{PgConnection, PgPool};
use tracing::info;
use uuid::Uuid;

use super::payload::{clean_list, clean_text, lenient_f64, lenient_i32, lenient_uuid, require_text};
use super::rows::{self, ColumnValue, Columns};
use super::validate;
use crate::error::CatalogError;

const TABLE: &str = "model_configurations";
const ENTITY: &str = "configuration";

// =============================================================================
// TYPES
// =============================================================================

/// Mirrors the `model_configurations` table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Configuration {
    pub id: Uuid,
    pub model_year_id: Uuid,
    pub name: String,
    pub is_default: bool,
    pub description: Option<String>,
    pub trim_level: Option<String>,
    pub market_region: Option<String>,
    pub msrp_usd: Option<i32>,
    pub price_premium_usd: Option<i32>,
    pub color_options: Option<Vec<String>>,
    pub engine_id: Option<Uuid>,
    pub brake_system_id: Option<Uuid>,
    pub frame_id: Option<Uuid>,
    pub suspension_id: Option<Uuid>,
    pub wheel_id: Option<Uuid>,
    pub seat_height_mm: Option<i32>,
    pub weight_kg: Option<f64>,
    pub wheelbase_mm: Option<i32>,
    pub ground_clearance_mm: Option<i32>,
    pub fuel_capacity_l: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigurationInput {
    pub name: Option<String>,
    #[serde(default)]
    pub is_default: bool,
    pub description: Option<String>,
    pub trim_level: Option<String>,
    pub market_region: Option<String>,
    #[serde(default, deserialize_with = "lenient_i32")]
    pub msrp_usd: Option<i32>,
    #[serde(default, deserialize_with = "lenient_i32")]
    pub price_premium_usd: Option<i32>,
    pub color_options: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient_uuid")]
    pub engine_id: Option<Uuid>,
    #[serde(default, deserialize_with = "lenient_uuid")]
    pub brake_system_id: Option<Uuid>,
    #[serde(default, deserialize_with = "lenient_uuid")]
    pub frame_id: Option<Uuid>,
    #[serde(default, deserialize_with = "lenient_uuid")]
    pub suspension_id: Option<Uuid>,
    #[serde(default, deserialize_with = "lenient_uuid")]
    pub wheel_id: Option<Uuid>,
    #[serde(default, deserialize_with = "lenient_i32")]
    pub seat_height_mm: Option<i32>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub weight_kg: Option<f64>,
    #[serde(default, deserialize_with = "lenient_i32")]
    pub wheelbase_mm: Option<i32>,
    #[serde(default, deserialize_with = "lenient_i32")]
    pub ground_clearance_mm: Option<i32>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub fuel_capacity_l: Option<f64>,
}

impl ConfigurationInput {
    /// Validate and shape the form. `is_default` is handled separately by
    /// the write path.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a missing name or a negative amount.
    pub fn into_columns(self) -> Result<Columns, CatalogError> {
        let name = require_text("name", self.name)?;
        validate::non_negative_int("msrp_usd", self.msrp_usd)?;
        validate::non_negative_int("price_premium_usd", self.price_premium_usd)?;
        validate::non_negative_int("seat_height_mm", self.seat_height_mm)?;
        validate::non_negative_float("weight_kg", self.weight_kg)?;
        validate::non_negative_int("wheelbase_mm", self.wheelbase_mm)?;
        validate::non_negative_int("ground_clearance_mm", self.ground_clearance_mm)?;
        validate::non_negative_float("fuel_capacity_l", self.fuel_capacity_l)?;

        Ok(vec![
            ("name", ColumnValue::Text(Some(name))),
            ("description", ColumnValue::Text(clean_text(self.description))),
            ("trim_level", ColumnValue::Text(clean_text(self.trim_level))),
            ("market_region", ColumnValue::Text(clean_text(self.market_region))),
            ("msrp_usd", ColumnValue::Int(self.msrp_usd)),
            ("price_premium_usd", ColumnValue::Int(self.price_premium_usd)),
            ("color_options", ColumnValue::TextList(clean_list(self.color_options))),
            ("engine_id", ColumnValue::Id(self.engine_id)),
            ("brake_system_id", ColumnValue::Id(self.brake_system_id)),
            ("frame_id", ColumnValue::Id(self.frame_id)),
            ("suspension_id", ColumnValue::Id(self.suspension_id)),
            ("wheel_id", ColumnValue::Id(self.wheel_id)),
            ("seat_height_mm", ColumnValue::Int(self.seat_height_mm)),
            ("weight_kg", ColumnValue::Float(self.weight_kg)),
            ("wheelbase_mm", ColumnValue::Int(self.wheelbase_mm)),
            ("ground_clearance_mm", ColumnValue::Int(self.ground_clearance_mm)),
            ("fuel_capacity_l", ColumnValue::Float(self.fuel_capacity_l)),
        ])
    }
}

// =============================================================================
// QUERIES
// =============================================================================

const SELECT_CONFIGURATION: &str = "SELECT c.id, c.model_year_id, c.name, c.is_default, c.description, \
     c.trim_level, c.market_region, c.msrp_usd, c.price_premium_usd, c.color_options, \
     c.engine_id, c.brake_system_id, c.frame_id, c.suspension_id, c.wheel_id, \
     c.seat_height_mm, c.weight_kg, c.wheelbase_mm, c.ground_clearance_mm, c.fuel_capacity_l \
     FROM model_configurations c";

/// List the configurations of one model year, default first.
///
/// # Errors
///
/// Returns a database error if the query fails.
pub async fn list_for_year(pool: &PgPool, model_year_id: Uuid) -> Result<Vec<Configuration>, CatalogError> {
    let rows = sqlx::query_as::<_, Configuration>(&format!(
        "{SELECT_CONFIGURATION} WHERE c.model_year_id = $1 ORDER BY c.is_default DESC, c.name ASC"
    ))
    .bind(model_year_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// List every configuration across all years of a model.
///
/// # Errors
///
/// Returns a database error if the query fails.
pub async fn list_for_model(pool: &PgPool, model_id: Uuid) -> Result<Vec<Configuration>, CatalogError> {
    let rows = sqlx::query_as::<_, Configuration>(&format!(
        "{SELECT_CONFIGURATION} JOIN model_years y ON y.id = c.model_year_id \
         WHERE y.model_id = $1 ORDER BY y.year DESC, c.is_default DESC, c.name ASC"
    ))
    .bind(model_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// # Errors
///
/// Returns `NotFound` or a database error.
pub async fn get_configuration(pool: &PgPool, id: Uuid) -> Result<Configuration, CatalogError> {
    sqlx::query_as::<_, Configuration>(&format!("{SELECT_CONFIGURATION} WHERE c.id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| CatalogError::not_found(ENTITY, id))
}

/// Find a same-named configuration in a model year.
///
/// # Errors
///
/// Returns a database error if the query fails.
pub async fn find_id_by_name(pool: &PgPool, model_year_id: Uuid, name: &str) -> Result<Option<Uuid>, CatalogError> {
    let id = sqlx::query_scalar::<_, Uuid>("SELECT id FROM model_configurations WHERE model_year_id = $1 AND name = $2")
        .bind(model_year_id)
        .bind(name)
        .fetch_optional(pool)
        .await?;
    Ok(id)
}

/// Resolve the owning model of a configuration.
///
/// # Errors
///
/// Returns `NotFound` or a database error.
pub async fn model_id_of(pool: &PgPool, configuration_id: Uuid) -> Result<Uuid, CatalogError> {
    sqlx::query_scalar::<_, Uuid>(
        "SELECT y.model_id FROM model_configurations c JOIN model_years y ON y.id = c.model_year_id WHERE c.id = $1",
    )
    .bind(configuration_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| CatalogError::not_found(ENTITY, configuration_id))
}

// =============================================================================
// WRITES
// =============================================================================

async fn clear_default(conn: &mut PgConnection, model_year_id: Uuid, keep: Uuid) -> Result<(), CatalogError> {
    sqlx::query(
        "UPDATE model_configurations SET is_default = false, updated_at = now() \
         WHERE model_year_id = $1 AND id <> $2 AND is_default",
    )
    .bind(model_year_id)
    .bind(keep)
    .execute(conn)
    .await?;
    Ok(())
}

/// Create a configuration in a model year.
///
/// # Errors
///
/// Returns a validation error, `NotFound` for an unknown year, a conflict on
/// a duplicate name, a reference error for an unknown component, or a
/// database error.
pub async fn create_configuration(
    pool: &PgPool,
    model_year_id: Uuid,
    input: ConfigurationInput,
) -> Result<Configuration, CatalogError> {
    let is_default = input.is_default;
    let mut columns = input.into_columns()?;
    super::motorcycle::get_year(pool, model_year_id).await?;
    columns.push(("model_year_id", ColumnValue::Id(Some(model_year_id))));

    let mut tx = pool.begin().await?;
    let id = rows::insert_row(&mut *tx, TABLE, &columns).await?;
    if is_default {
        clear_default(&mut tx, model_year_id, id).await?;
        rows::update_row(&mut *tx, TABLE, ENTITY, id, &[("is_default", ColumnValue::Bool(Some(true)))]).await?;
    }
    tx.commit().await?;

    info!(%id, %model_year_id, is_default, "configuration created");
    get_configuration(pool, id).await
}

/// Replace the editable fields of a configuration.
///
/// # Errors
///
/// Returns a validation error, `NotFound`, a conflict, or a database error.
pub async fn update_configuration(
    pool: &PgPool,
    id: Uuid,
    input: ConfigurationInput,
) -> Result<Configuration, CatalogError> {
    let is_default = input.is_default;
    let mut columns = input.into_columns()?;
    let existing = get_configuration(pool, id).await?;

    let mut tx = pool.begin().await?;
    if is_default {
        clear_default(&mut tx, existing.model_year_id, id).await?;
    }
    columns.push(("is_default", ColumnValue::Bool(Some(is_default))));
    rows::update_row(&mut *tx, TABLE, ENTITY, id, &columns).await?;
    tx.commit().await?;

    get_configuration(pool, id).await
}

/// Make one configuration the default of its year.
///
/// # Errors
///
/// Returns `NotFound` or a database error.
pub async fn set_default(pool: &PgPool, id: Uuid) -> Result<Configuration, CatalogError> {
    let existing = get_configuration(pool, id).await?;
    let mut tx = pool.begin().await?;
    clear_default(&mut tx, existing.model_year_id, id).await?;
    rows::update_row(&mut *tx, TABLE, ENTITY, id, &[("is_default", ColumnValue::Bool(Some(true)))]).await?;
    tx.commit().await?;
    info!(%id, model_year_id = %existing.model_year_id, "default configuration changed");
    get_configuration(pool, id).await
}

/// # Errors
///
/// Returns `NotFound` or a database error.
pub async fn delete_configuration(pool: &PgPool, id: Uuid) -> Result<(), CatalogError> {
    rows::delete_row(pool, TABLE, ENTITY, id).await?;
    info!(%id, "configuration deleted");
    Ok(())
}

#[cfg(test)]
#[path = "configuration_test.rs"]
mod tests;
