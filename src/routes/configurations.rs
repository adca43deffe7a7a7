//! Configuration routes — CRUD, default flag, trim copy, effective components.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;
use uuid::Uuid;

use super::extract::{ApiJson, ApiPath};
use crate::error::CatalogError;
use crate::services::assignment::{self, EffectiveComponent};
use crate::services::configuration::{self, Configuration, ConfigurationInput};
use crate::services::trim_copy::{self, CopyRequest, CopySummary, QuickCopyRequest};
use crate::state::AppState;

/// `GET /api/admin/years/{id}/configurations`
pub async fn list_for_year(
    State(state): State<AppState>,
    ApiPath(year_id): ApiPath<Uuid>,
) -> Result<Json<Vec<Configuration>>, CatalogError> {
    Ok(Json(configuration::list_for_year(&state.pool, year_id).await?))
}

/// `POST /api/admin/years/{id}/configurations`
pub async fn create(
    State(state): State<AppState>,
    ApiPath(year_id): ApiPath<Uuid>,
    ApiJson(body): ApiJson<ConfigurationInput>,
) -> Result<(StatusCode, Json<Configuration>), CatalogError> {
    let created = configuration::create_configuration(&state.pool, year_id, body).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// `GET /api/admin/configurations/{id}`
pub async fn get(State(state): State<AppState>, ApiPath(id): ApiPath<Uuid>) -> Result<Json<Configuration>, CatalogError> {
    Ok(Json(configuration::get_configuration(&state.pool, id).await?))
}

/// `PUT /api/admin/configurations/{id}`
pub async fn update(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(body): ApiJson<ConfigurationInput>,
) -> Result<Json<Configuration>, CatalogError> {
    Ok(Json(configuration::update_configuration(&state.pool, id, body).await?))
}

/// `DELETE /api/admin/configurations/{id}`
pub async fn delete(State(state): State<AppState>, ApiPath(id): ApiPath<Uuid>) -> Result<StatusCode, CatalogError> {
    configuration::delete_configuration(&state.pool, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `POST /api/admin/configurations/{id}/default`
pub async fn set_default(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<Configuration>, CatalogError> {
    Ok(Json(configuration::set_default(&state.pool, id).await?))
}

/// `POST /api/admin/configurations/{id}/copy` — copy into other years of the
/// same model. Answers 200 with per-year outcomes even when some years fail.
pub async fn copy(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(body): ApiJson<CopyRequest>,
) -> Result<Json<CopySummary>, CatalogError> {
    Ok(Json(trim_copy::copy_to_years(&state.pool, id, &body).await?))
}

/// `POST /api/admin/configurations/{id}/quick-copy`
pub async fn quick_copy(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(body): ApiJson<QuickCopyRequest>,
) -> Result<(StatusCode, Json<Configuration>), CatalogError> {
    let created = trim_copy::quick_copy_by_id(&state.pool, id, body.name).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// `GET /api/admin/configurations/{id}/components`
pub async fn effective_components(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<Vec<EffectiveComponent>>, CatalogError> {
    Ok(Json(assignment::effective_components(&state.pool, id).await?))
}
