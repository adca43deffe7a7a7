//! Component assignment — link components to models and configurations.
//!
//! DESIGN
//! ======
//! An assignment fills one component slot (engine, brakes, ...) either for a
//! whole model or for one configuration of it. A slot holds at most one
//! component, so assigning again replaces the previous pick.
//!
//! Resolution order for a configuration's effective component:
//! 1. the configuration's own `*_id` column,
//! 2. a configuration-scoped assignment,
//! 3. a model-wide assignment.

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use super::component::{self, ComponentKind};
use super::configuration::{self, Configuration};
use super::motorcycle;
use super::payload::{clean_text, lenient_uuid};
use crate::error::CatalogError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Assignment {
    pub id: Uuid,
    pub model_id: Uuid,
    pub configuration_id: Option<Uuid>,
    pub component_type: String,
    pub component_id: Uuid,
    pub notes: Option<String>,
}

impl Assignment {
    #[must_use]
    pub fn kind(&self) -> Option<ComponentKind> {
        ComponentKind::from_type(&self.component_type)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AssignInput {
    pub component_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_uuid")]
    pub component_id: Option<Uuid>,
    #[serde(default, deserialize_with = "lenient_uuid")]
    pub configuration_id: Option<Uuid>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentSource {
    Configuration,
    Assignment,
    Model,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EffectiveComponent {
    pub component_type: ComponentKind,
    pub component_id: Uuid,
    pub source: ComponentSource,
}

/// The component a configuration pins directly through its own column.
#[must_use]
pub fn configured_component(configuration: &Configuration, kind: ComponentKind) -> Option<Uuid> {
    match kind {
        ComponentKind::Engine => configuration.engine_id,
        ComponentKind::BrakeSystem => configuration.brake_system_id,
        ComponentKind::Frame => configuration.frame_id,
        ComponentKind::Suspension => configuration.suspension_id,
        ComponentKind::Wheel => configuration.wheel_id,
    }
}

/// Resolve the effective component per kind. Kinds with nothing set at any
/// level are omitted.
#[must_use]
pub fn resolve_effective(configuration: &Configuration, assignments: &[Assignment]) -> Vec<EffectiveComponent> {
    let mut resolved = Vec::new();
    for kind in ComponentKind::ALL {
        let pick = if let Some(component_id) = configured_component(configuration, kind) {
            Some((component_id, ComponentSource::Configuration))
        } else {
            let scoped = assignments
                .iter()
                .find(|a| a.kind() == Some(kind) && a.configuration_id == Some(configuration.id));
            let model_wide = assignments
                .iter()
                .find(|a| a.kind() == Some(kind) && a.configuration_id.is_none());
            scoped
                .map(|a| (a.component_id, ComponentSource::Assignment))
                .or_else(|| model_wide.map(|a| (a.component_id, ComponentSource::Model)))
        };
        if let Some((component_id, source)) = pick {
            resolved.push(EffectiveComponent { component_type: kind, component_id, source });
        }
    }
    resolved
}

const SELECT_ASSIGNMENT: &str =
    "SELECT id, model_id, configuration_id, component_type, component_id, notes FROM model_component_assignments";

/// # Errors
///
/// Returns a database error if the query fails.
pub async fn list_for_model(pool: &PgPool, model_id: Uuid) -> Result<Vec<Assignment>, CatalogError> {
    let rows = sqlx::query_as::<_, Assignment>(&format!(
        "{SELECT_ASSIGNMENT} WHERE model_id = $1 ORDER BY configuration_id NULLS FIRST, component_type ASC"
    ))
    .bind(model_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// # Errors
///
/// Returns `NotFound` or a database error.
pub async fn get_assignment(pool: &PgPool, id: Uuid) -> Result<Assignment, CatalogError> {
    sqlx::query_as::<_, Assignment>(&format!("{SELECT_ASSIGNMENT} WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| CatalogError::not_found("assignment", id))
}

/// Assign a component to a model slot, replacing any previous pick.
///
/// # Errors
///
/// Returns a validation error for an unknown type, a missing component id or
/// a configuration of another model; `NotFound` for an unknown model or
/// component; or a database error.
pub async fn assign(pool: &PgPool, model_id: Uuid, input: AssignInput) -> Result<Assignment, CatalogError> {
    let raw_type = clean_text(input.component_type).ok_or_else(|| CatalogError::validation("component_type is required"))?;
    let kind = ComponentKind::from_type(&raw_type)
        .ok_or_else(|| CatalogError::validation(format!("unknown component_type: {raw_type}")))?;
    let component_id = input
        .component_id
        .ok_or_else(|| CatalogError::validation("component_id is required"))?;

    motorcycle::get_model(pool, model_id).await?;
    if let Some(configuration_id) = input.configuration_id {
        if configuration::model_id_of(pool, configuration_id).await? != model_id {
            return Err(CatalogError::validation("configuration does not belong to this model"));
        }
    }
    if !component::component_exists(pool, kind, component_id).await? {
        return Err(CatalogError::not_found(kind.as_str(), component_id));
    }
    let notes = clean_text(input.notes);

    let mut tx = pool.begin().await?;
    let existing = sqlx::query_scalar::<_, Uuid>(
        "SELECT id FROM model_component_assignments \
         WHERE model_id = $1 AND configuration_id IS NOT DISTINCT FROM $2 AND component_type = $3 \
         FOR UPDATE",
    )
    .bind(model_id)
    .bind(input.configuration_id)
    .bind(kind.as_str())
    .fetch_optional(&mut *tx)
    .await?;

    let id = if let Some(id) = existing {
        sqlx::query(
            "UPDATE model_component_assignments SET component_id = $2, notes = $3, updated_at = now() WHERE id = $1",
        )
        .bind(id)
        .bind(component_id)
        .bind(&notes)
        .execute(&mut *tx)
        .await?;
        id
    } else {
        let id = Uuid::new_v4();
        sqlx::query(
            "INSERT INTO model_component_assignments (id, model_id, configuration_id, component_type, component_id, notes) \
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(id)
        .bind(model_id)
        .bind(input.configuration_id)
        .bind(kind.as_str())
        .bind(component_id)
        .bind(&notes)
        .execute(&mut *tx)
        .await?;
        id
    };
    tx.commit().await?;

    info!(%id, %model_id, kind = kind.as_str(), %component_id, replaced = existing.is_some(), "component assigned");
    get_assignment(pool, id).await
}

/// # Errors
///
/// Returns `NotFound` or a database error.
pub async fn unassign(pool: &PgPool, id: Uuid) -> Result<(), CatalogError> {
    super::rows::delete_row(pool, "model_component_assignments", "assignment", id).await?;
    info!(%id, "component unassigned");
    Ok(())
}

/// Effective components of a stored configuration.
///
/// # Errors
///
/// Returns `NotFound` or a database error.
pub async fn effective_components(pool: &PgPool, configuration_id: Uuid) -> Result<Vec<EffectiveComponent>, CatalogError> {
    let configuration = configuration::get_configuration(pool, configuration_id).await?;
    let model_id = configuration::model_id_of(pool, configuration_id).await?;
    let assignments = list_for_model(pool, model_id).await?;
    Ok(resolve_effective(&configuration, &assignments))
}

#[cfg(test)]
#[path = "assignment_test.rs"]
mod tests;
