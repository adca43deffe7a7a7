//! Profile admin routes.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;
use uuid::Uuid;

use super::extract::{ApiJson, ApiPath};
use crate::error::CatalogError;
use crate::services::profile::{self, Profile, ProfileInput, RoleInput};
use crate::state::AppState;

/// `GET /api/admin/profiles`
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Profile>>, CatalogError> {
    Ok(Json(profile::list_profiles(&state.pool).await?))
}

/// `POST /api/admin/profiles`
pub async fn create(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<ProfileInput>,
) -> Result<(StatusCode, Json<Profile>), CatalogError> {
    let created = profile::create_profile(&state.pool, body).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// `GET /api/admin/profiles/{id}`
pub async fn get(State(state): State<AppState>, ApiPath(id): ApiPath<Uuid>) -> Result<Json<Profile>, CatalogError> {
    Ok(Json(profile::get_profile(&state.pool, id).await?))
}

/// `PUT /api/admin/profiles/{id}/role`
pub async fn update_role(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(body): ApiJson<RoleInput>,
) -> Result<Json<Profile>, CatalogError> {
    Ok(Json(profile::update_role(&state.pool, id, body).await?))
}
