//! Component library and assignment routes.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;
use uuid::Uuid;

use super::extract::{ApiJson, ApiPath};
use crate::error::CatalogError;
use crate::services::assignment::{self, AssignInput, Assignment};
use crate::services::component::{self, ComponentInput, ComponentKind};
use crate::services::motorcycle;
use crate::state::AppState;

/// Resolve the `{kind}` path segment (`engines`, `brake-systems`, ...).
pub(crate) fn parse_kind(segment: &str) -> Result<ComponentKind, CatalogError> {
    ComponentKind::from_segment(segment).ok_or_else(|| CatalogError::not_found("component kind", segment))
}

/// `GET /api/admin/components/{kind}`
pub async fn list(
    State(state): State<AppState>,
    ApiPath(kind): ApiPath<String>,
) -> Result<Json<Vec<serde_json::Value>>, CatalogError> {
    let kind = parse_kind(&kind)?;
    Ok(Json(component::list_components(&state.pool, kind).await?))
}

/// `POST /api/admin/components/{kind}`
pub async fn create(
    State(state): State<AppState>,
    ApiPath(kind): ApiPath<String>,
    ApiJson(body): ApiJson<serde_json::Value>,
) -> Result<(StatusCode, Json<serde_json::Value>), CatalogError> {
    let input = ComponentInput::parse(parse_kind(&kind)?, body)?;
    let created = component::create_component(&state.pool, input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// `GET /api/admin/components/{kind}/{id}`
pub async fn get(
    State(state): State<AppState>,
    ApiPath((kind, id)): ApiPath<(String, Uuid)>,
) -> Result<Json<serde_json::Value>, CatalogError> {
    let kind = parse_kind(&kind)?;
    Ok(Json(component::get_component(&state.pool, kind, id).await?))
}

/// `PUT /api/admin/components/{kind}/{id}`
pub async fn update(
    State(state): State<AppState>,
    ApiPath((kind, id)): ApiPath<(String, Uuid)>,
    ApiJson(body): ApiJson<serde_json::Value>,
) -> Result<Json<serde_json::Value>, CatalogError> {
    let input = ComponentInput::parse(parse_kind(&kind)?, body)?;
    Ok(Json(component::update_component(&state.pool, id, input).await?))
}

/// `DELETE /api/admin/components/{kind}/{id}` — also drops its assignments.
pub async fn delete(
    State(state): State<AppState>,
    ApiPath((kind, id)): ApiPath<(String, Uuid)>,
) -> Result<StatusCode, CatalogError> {
    let kind = parse_kind(&kind)?;
    component::delete_component(&state.pool, kind, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// ASSIGNMENTS
// =============================================================================

/// `GET /api/admin/models/{id}/assignments`
pub async fn list_assignments(
    State(state): State<AppState>,
    ApiPath(model_id): ApiPath<Uuid>,
) -> Result<Json<Vec<Assignment>>, CatalogError> {
    motorcycle::get_model(&state.pool, model_id).await?;
    Ok(Json(assignment::list_for_model(&state.pool, model_id).await?))
}

/// `POST /api/admin/models/{id}/assignments` — assign or replace a slot.
pub async fn assign(
    State(state): State<AppState>,
    ApiPath(model_id): ApiPath<Uuid>,
    ApiJson(body): ApiJson<AssignInput>,
) -> Result<Json<Assignment>, CatalogError> {
    Ok(Json(assignment::assign(&state.pool, model_id, body).await?))
}

/// `GET /api/admin/assignments/{id}`
pub async fn get_assignment(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<Assignment>, CatalogError> {
    Ok(Json(assignment::get_assignment(&state.pool, id).await?))
}

/// `DELETE /api/admin/assignments/{id}`
pub async fn unassign(State(state): State<AppState>, ApiPath(id): ApiPath<Uuid>) -> Result<StatusCode, CatalogError> {
    assignment::unassign(&state.pool, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
