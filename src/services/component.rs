//! Component service — engines, brake systems, frames, suspensions, wheels.
//!
//! DESIGN
//! ======
//! Each component kind has its own table and form. Reads are shared: rows
//! are returned as JSON via `to_jsonb`, so one list/get/delete path covers
//! all five tables. Writes go through the kind-specific form, which shapes
//! its own typed columns.

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use super::payload::{clean_text, lenient_f64, lenient_i32, require_text};
use super::rows::{self, ColumnValue, Columns};
use super::validate::{non_negative_float, non_negative_int};
use crate::error::CatalogError;

// =============================================================================
// KIND
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentKind {
    Engine,
    BrakeSystem,
    Frame,
    Suspension,
    Wheel,
}

impl ComponentKind {
    pub const ALL: [Self; 5] = [Self::Engine, Self::BrakeSystem, Self::Frame, Self::Suspension, Self::Wheel];

    /// Value stored in `model_component_assignments.component_type`.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Engine => "engine",
            Self::BrakeSystem => "brake_system",
            Self::Frame => "frame",
            Self::Suspension => "suspension",
            Self::Wheel => "wheel",
        }
    }

    #[must_use]
    pub fn table(self) -> &'static str {
        match self {
            Self::Engine => "engines",
            Self::BrakeSystem => "brake_systems",
            Self::Frame => "frames",
            Self::Suspension => "suspensions",
            Self::Wheel => "wheels",
        }
    }

    /// Column on `model_configurations` that overrides this kind.
    #[must_use]
    pub fn configuration_column(self) -> &'static str {
        match self {
            Self::Engine => "engine_id",
            Self::BrakeSystem => "brake_system_id",
            Self::Frame => "frame_id",
            Self::Suspension => "suspension_id",
            Self::Wheel => "wheel_id",
        }
    }

    #[must_use]
    pub fn from_type(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == raw)
    }

    /// Parse a URL segment: table name (`brake_systems`), hyphenated
    /// (`brake-systems`) or singular type (`brake_system`).
    #[must_use]
    pub fn from_segment(raw: &str) -> Option<Self> {
        let normalized = raw.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|k| k.table() == normalized || k.as_str() == normalized)
    }
}

// =============================================================================
// FORMS
// =============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EngineInput {
    pub name: Option<String>,
    pub engine_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_i32")]
    pub displacement_cc: Option<i32>,
    #[serde(default, deserialize_with = "lenient_i32")]
    pub cylinders: Option<i32>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub power_hp: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub torque_nm: Option<f64>,
    pub cooling: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BrakeSystemInput {
    pub name: Option<String>,
    pub front_type: Option<String>,
    pub rear_type: Option<String>,
    #[serde(default)]
    pub has_abs: bool,
    #[serde(default, deserialize_with = "lenient_i32")]
    pub front_disc_mm: Option<i32>,
    #[serde(default, deserialize_with = "lenient_i32")]
    pub rear_disc_mm: Option<i32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FrameInput {
    pub name: Option<String>,
    pub frame_type: Option<String>,
    pub material: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub rake_degrees: Option<f64>,
    #[serde(default, deserialize_with = "lenient_i32")]
    pub trail_mm: Option<i32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SuspensionInput {
    pub name: Option<String>,
    pub front_type: Option<String>,
    pub rear_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_i32")]
    pub front_travel_mm: Option<i32>,
    #[serde(default, deserialize_with = "lenient_i32")]
    pub rear_travel_mm: Option<i32>,
    #[serde(default)]
    pub adjustable: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WheelInput {
    pub name: Option<String>,
    pub front_size: Option<String>,
    pub rear_size: Option<String>,
    pub rim_material: Option<String>,
    pub front_tire: Option<String>,
    pub rear_tire: Option<String>,
}

#[derive(Debug, Clone)]
pub enum ComponentInput {
    Engine(EngineInput),
    BrakeSystem(BrakeSystemInput),
    Frame(FrameInput),
    Suspension(SuspensionInput),
    Wheel(WheelInput),
}

impl ComponentInput {
    /// Decode a JSON form body for `kind`.
    ///
    /// # Errors
    ///
    /// Returns a validation error when the body does not match the form.
    pub fn parse(kind: ComponentKind, body: serde_json::Value) -> Result<Self, CatalogError> {
        let invalid = |e: serde_json::Error| CatalogError::validation(format!("invalid {} form: {e}", kind.as_str()));
        Ok(match kind {
            ComponentKind::Engine => Self::Engine(serde_json::from_value(body).map_err(invalid)?),
            ComponentKind::BrakeSystem => Self::BrakeSystem(serde_json::from_value(body).map_err(invalid)?),
            ComponentKind::Frame => Self::Frame(serde_json::from_value(body).map_err(invalid)?),
            ComponentKind::Suspension => Self::Suspension(serde_json::from_value(body).map_err(invalid)?),
            ComponentKind::Wheel => Self::Wheel(serde_json::from_value(body).map_err(invalid)?),
        })
    }

    #[must_use]
    pub fn kind(&self) -> ComponentKind {
        match self {
            Self::Engine(_) => ComponentKind::Engine,
            Self::BrakeSystem(_) => ComponentKind::BrakeSystem,
            Self::Frame(_) => ComponentKind::Frame,
            Self::Suspension(_) => ComponentKind::Suspension,
            Self::Wheel(_) => ComponentKind::Wheel,
        }
    }

    /// # Errors
    ///
    /// Returns a validation error for a missing name or a negative spec.
    pub fn into_columns(self) -> Result<Columns, CatalogError> {
        match self {
            Self::Engine(f) => {
                non_negative_int("displacement_cc", f.displacement_cc)?;
                non_negative_int("cylinders", f.cylinders)?;
                non_negative_float("power_hp", f.power_hp)?;
                non_negative_float("torque_nm", f.torque_nm)?;
                Ok(vec![
                    ("name", ColumnValue::Text(Some(require_text("name", f.name)?))),
                    ("engine_type", ColumnValue::Text(clean_text(f.engine_type))),
                    ("displacement_cc", ColumnValue::Int(f.displacement_cc)),
                    ("cylinders", ColumnValue::Int(f.cylinders)),
                    ("power_hp", ColumnValue::Float(f.power_hp)),
                    ("torque_nm", ColumnValue::Float(f.torque_nm)),
                    ("cooling", ColumnValue::Text(clean_text(f.cooling))),
                ])
            }
            Self::BrakeSystem(f) => {
                non_negative_int("front_disc_mm", f.front_disc_mm)?;
                non_negative_int("rear_disc_mm", f.rear_disc_mm)?;
                Ok(vec![
                    ("name", ColumnValue::Text(Some(require_text("name", f.name)?))),
                    ("front_type", ColumnValue::Text(clean_text(f.front_type))),
                    ("rear_type", ColumnValue::Text(clean_text(f.rear_type))),
                    ("has_abs", ColumnValue::Bool(Some(f.has_abs))),
                    ("front_disc_mm", ColumnValue::Int(f.front_disc_mm)),
                    ("rear_disc_mm", ColumnValue::Int(f.rear_disc_mm)),
                ])
            }
            Self::Frame(f) => {
                non_negative_float("rake_degrees", f.rake_degrees)?;
                non_negative_int("trail_mm", f.trail_mm)?;
                Ok(vec![
                    ("name", ColumnValue::Text(Some(require_text("name", f.name)?))),
                    ("frame_type", ColumnValue::Text(clean_text(f.frame_type))),
                    ("material", ColumnValue::Text(clean_text(f.material))),
                    ("rake_degrees", ColumnValue::Float(f.rake_degrees)),
                    ("trail_mm", ColumnValue::Int(f.trail_mm)),
                ])
            }
            Self::Suspension(f) => {
                non_negative_int("front_travel_mm", f.front_travel_mm)?;
                non_negative_int("rear_travel_mm", f.rear_travel_mm)?;
                Ok(vec![
                    ("name", ColumnValue::Text(Some(require_text("name", f.name)?))),
                    ("front_type", ColumnValue::Text(clean_text(f.front_type))),
                    ("rear_type", ColumnValue::Text(clean_text(f.rear_type))),
                    ("front_travel_mm", ColumnValue::Int(f.front_travel_mm)),
                    ("rear_travel_mm", ColumnValue::Int(f.rear_travel_mm)),
                    ("adjustable", ColumnValue::Bool(Some(f.adjustable))),
                ])
            }
            Self::Wheel(f) => Ok(vec![
                ("name", ColumnValue::Text(Some(require_text("name", f.name)?))),
                ("front_size", ColumnValue::Text(clean_text(f.front_size))),
                ("rear_size", ColumnValue::Text(clean_text(f.rear_size))),
                ("rim_material", ColumnValue::Text(clean_text(f.rim_material))),
                ("front_tire", ColumnValue::Text(clean_text(f.front_tire))),
                ("rear_tire", ColumnValue::Text(clean_text(f.rear_tire))),
            ]),
        }
    }
}

// =============================================================================
// CRUD
// =============================================================================

/// List components of one kind, ordered by name.
///
/// # Errors
///
/// Returns a database error if the query fails.
pub async fn list_components(pool: &PgPool, kind: ComponentKind) -> Result<Vec<serde_json::Value>, CatalogError> {
    let sql = format!(
        "SELECT to_jsonb(t) - 'created_at' - 'updated_at' FROM {} t ORDER BY t.name ASC",
        kind.table()
    );
    let rows = sqlx::query_scalar::<_, serde_json::Value>(&sql)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// # Errors
///
/// Returns `NotFound` or a database error.
pub async fn get_component(pool: &PgPool, kind: ComponentKind, id: Uuid) -> Result<serde_json::Value, CatalogError> {
    let sql = format!(
        "SELECT to_jsonb(t) - 'created_at' - 'updated_at' FROM {} t WHERE t.id = $1",
        kind.table()
    );
    sqlx::query_scalar::<_, serde_json::Value>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| CatalogError::not_found(kind.as_str(), id))
}

/// # Errors
///
/// Returns a database error if the query fails.
pub async fn component_exists(pool: &PgPool, kind: ComponentKind, id: Uuid) -> Result<bool, CatalogError> {
    let sql = format!("SELECT EXISTS(SELECT 1 FROM {} WHERE id = $1)", kind.table());
    let exists = sqlx::query_scalar::<_, bool>(&sql)
        .bind(id)
        .fetch_one(pool)
        .await?;
    Ok(exists)
}

/// # Errors
///
/// Returns a validation error or a database error.
pub async fn create_component(pool: &PgPool, input: ComponentInput) -> Result<serde_json::Value, CatalogError> {
    let kind = input.kind();
    let columns = input.into_columns()?;
    let id = rows::insert_row(pool, kind.table(), &columns).await?;
    info!(%id, kind = kind.as_str(), "component created");
    get_component(pool, kind, id).await
}

/// # Errors
///
/// Returns a validation error, `NotFound`, or a database error.
pub async fn update_component(pool: &PgPool, id: Uuid, input: ComponentInput) -> Result<serde_json::Value, CatalogError> {
    let kind = input.kind();
    let columns = input.into_columns()?;
    rows::update_row(pool, kind.table(), kind.as_str(), id, &columns).await?;
    get_component(pool, kind, id).await
}

/// Delete a component. Fails with a reference error while a configuration
/// still points at it; assignments referencing it are removed.
///
/// # Errors
///
/// Returns `NotFound`, `Reference`, or a database error.
pub async fn delete_component(pool: &PgPool, kind: ComponentKind, id: Uuid) -> Result<(), CatalogError> {
    let sql = format!(
        "SELECT COUNT(*) FROM model_configurations WHERE {} = $1",
        kind.configuration_column()
    );
    let in_use = sqlx::query_scalar::<_, i64>(&sql).bind(id).fetch_one(pool).await?;
    if in_use > 0 {
        return Err(CatalogError::Reference(format!(
            "{} is still used by {in_use} configuration(s)",
            kind.as_str().replace('_', " ")
        )));
    }

    let mut tx = pool.begin().await?;
    sqlx::query("DELETE FROM model_component_assignments WHERE component_type = $1 AND component_id = $2")
        .bind(kind.as_str())
        .bind(id)
        .execute(&mut *tx)
        .await?;
    rows::delete_row(&mut *tx, kind.table(), kind.as_str(), id).await?;
    tx.commit().await?;
    info!(%id, kind = kind.as_str(), "component deleted");
    Ok(())
}

#[cfg(test)]
#[path = "component_test.rs"]
mod tests;
