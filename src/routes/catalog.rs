//! Catalog routes — brands, motorcycle models, model years, and search.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;
use serde::Deserialize;
use uuid::Uuid;

use super::extract::{ApiJson, ApiPath, ApiQuery};
use crate::error::CatalogError;
use crate::services::brand::{self, Brand, BrandInput};
use crate::services::motorcycle::{self, ModelDetail, ModelFilter, ModelInput, ModelYear, ModelYearInput, MotorcycleModel};
use crate::services::search::{self, SearchResults};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct PublicModelQuery {
    pub brand_id: Option<Uuid>,
    pub category: Option<String>,
}

impl PublicModelQuery {
    /// Public listings never include drafts.
    #[must_use]
    pub fn into_filter(self) -> ModelFilter {
        ModelFilter { brand_id: self.brand_id, category: self.category, include_drafts: false }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

// =============================================================================
// PUBLIC
// =============================================================================

/// `GET /api/brands`
pub async fn list_brands(State(state): State<AppState>) -> Result<Json<Vec<Brand>>, CatalogError> {
    Ok(Json(brand::list_brands(&state.pool).await?))
}

/// `GET /api/brands/{id}`
pub async fn get_brand(State(state): State<AppState>, ApiPath(id): ApiPath<Uuid>) -> Result<Json<Brand>, CatalogError> {
    Ok(Json(brand::get_brand(&state.pool, id).await?))
}

/// `GET /api/motorcycles` — published models only.
pub async fn list_motorcycles(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<PublicModelQuery>,
) -> Result<Json<Vec<MotorcycleModel>>, CatalogError> {
    Ok(Json(motorcycle::list_models(&state.pool, &query.into_filter()).await?))
}

/// `GET /api/motorcycles/{id}` — published model with years and configurations.
pub async fn get_motorcycle(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<ModelDetail>, CatalogError> {
    Ok(Json(motorcycle::get_model_detail(&state.pool, id, true).await?))
}

/// `GET /api/search?q=`
pub async fn search(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<SearchQuery>,
) -> Result<Json<SearchResults>, CatalogError> {
    Ok(Json(search::search(&state.pool, query.q.as_deref()).await?))
}

// =============================================================================
// ADMIN: BRANDS
// =============================================================================

/// `POST /api/admin/brands`
pub async fn create_brand(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<BrandInput>,
) -> Result<(StatusCode, Json<Brand>), CatalogError> {
    let created = brand::create_brand(&state.pool, body).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// `PUT /api/admin/brands/{id}`
pub async fn update_brand(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(body): ApiJson<BrandInput>,
) -> Result<Json<Brand>, CatalogError> {
    Ok(Json(brand::update_brand(&state.pool, id, body).await?))
}

/// `DELETE /api/admin/brands/{id}`
pub async fn delete_brand(State(state): State<AppState>, ApiPath(id): ApiPath<Uuid>) -> Result<StatusCode, CatalogError> {
    brand::delete_brand(&state.pool, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// ADMIN: MODELS
// =============================================================================

/// `GET /api/admin/models` — drafts included unless `include_drafts=false`.
pub async fn admin_list_models(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<AdminModelQuery>,
) -> Result<Json<Vec<MotorcycleModel>>, CatalogError> {
    Ok(Json(motorcycle::list_models(&state.pool, &query.into_filter()).await?))
}

#[derive(Debug, Default, Deserialize)]
pub struct AdminModelQuery {
    pub brand_id: Option<Uuid>,
    pub category: Option<String>,
    pub include_drafts: Option<bool>,
}

impl AdminModelQuery {
    #[must_use]
    pub fn into_filter(self) -> ModelFilter {
        ModelFilter {
            brand_id: self.brand_id,
            category: self.category,
            include_drafts: self.include_drafts.unwrap_or(true),
        }
    }
}

/// `GET /api/admin/models/{id}` — includes unpublished models.
pub async fn admin_get_model(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<ModelDetail>, CatalogError> {
    Ok(Json(motorcycle::get_model_detail(&state.pool, id, false).await?))
}

/// `POST /api/admin/models`
pub async fn create_model(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<ModelInput>,
) -> Result<(StatusCode, Json<MotorcycleModel>), CatalogError> {
    let created = motorcycle::create_model(&state.pool, body).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// `PUT /api/admin/models/{id}`
pub async fn update_model(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(body): ApiJson<ModelInput>,
) -> Result<Json<MotorcycleModel>, CatalogError> {
    Ok(Json(motorcycle::update_model(&state.pool, id, body).await?))
}

/// `DELETE /api/admin/models/{id}`
pub async fn delete_model(State(state): State<AppState>, ApiPath(id): ApiPath<Uuid>) -> Result<StatusCode, CatalogError> {
    motorcycle::delete_model(&state.pool, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// ADMIN: MODEL YEARS
// =============================================================================

/// `GET /api/admin/models/{id}/years`
pub async fn list_years(
    State(state): State<AppState>,
    ApiPath(model_id): ApiPath<Uuid>,
) -> Result<Json<Vec<ModelYear>>, CatalogError> {
    motorcycle::get_model(&state.pool, model_id).await?;
    Ok(Json(motorcycle::list_years(&state.pool, model_id).await?))
}

/// `POST /api/admin/models/{id}/years`
pub async fn create_year(
    State(state): State<AppState>,
    ApiPath(model_id): ApiPath<Uuid>,
    ApiJson(body): ApiJson<ModelYearInput>,
) -> Result<(StatusCode, Json<ModelYear>), CatalogError> {
    let created = motorcycle::create_year(&state.pool, model_id, body).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// `GET /api/admin/years/{id}`
pub async fn get_year(State(state): State<AppState>, ApiPath(id): ApiPath<Uuid>) -> Result<Json<ModelYear>, CatalogError> {
    Ok(Json(motorcycle::get_year(&state.pool, id).await?))
}

/// `PUT /api/admin/years/{id}`
pub async fn update_year(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(body): ApiJson<ModelYearInput>,
) -> Result<Json<ModelYear>, CatalogError> {
    Ok(Json(motorcycle::update_year(&state.pool, id, body).await?))
}

/// `DELETE /api/admin/years/{id}`
pub async fn delete_year(State(state): State<AppState>, ApiPath(id): ApiPath<Uuid>) -> Result<StatusCode, CatalogError> {
    motorcycle::delete_year(&state.pool, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
#[path = "catalog_test.rs"]
mod tests;
