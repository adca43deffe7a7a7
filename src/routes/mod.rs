//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! Public read-only catalog endpoints live under `/api`. Everything under
//! `/api/admin` passes the `AdminUser` extractor first, so handlers there
//! never see an unauthenticated request.

pub mod admin;
pub mod catalog;
pub mod components;
pub mod configurations;
pub mod extract;
pub mod learning;
pub mod profiles;

use axum::Router;
use axum::http::StatusCode;
use axum::http::header::{HeaderValue, InvalidHeaderValue};
use axum::middleware;
use axum::routing::{get, post, put};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// CORS for the given origin; `None` allows any origin.
///
/// # Errors
///
/// Returns an error if the origin is not a valid header value.
pub fn cors_layer(origin: Option<&str>) -> Result<CorsLayer, InvalidHeaderValue> {
    let allow_origin = match origin {
        Some(origin) => AllowOrigin::exact(HeaderValue::from_str(origin)?),
        None => AllowOrigin::from(Any),
    };
    Ok(CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(Any)
        .allow_headers(Any))
}

fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/api/brands", get(catalog::list_brands))
        .route("/api/brands/{id}", get(catalog::get_brand))
        .route("/api/motorcycles", get(catalog::list_motorcycles))
        .route("/api/motorcycles/{id}", get(catalog::get_motorcycle))
        .route("/api/courses", get(learning::list_courses))
        .route("/api/courses/{slug}", get(learning::get_course_by_slug))
        .route("/api/glossary", get(learning::list_terms))
        .route("/api/search", get(catalog::search))
        .route("/healthz", get(healthz))
}

fn admin_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/api/admin/brands", get(catalog::list_brands).post(catalog::create_brand))
        .route(
            "/api/admin/brands/{id}",
            get(catalog::get_brand)
                .put(catalog::update_brand)
                .delete(catalog::delete_brand),
        )
        .route("/api/admin/models", get(catalog::admin_list_models).post(catalog::create_model))
        .route(
            "/api/admin/models/{id}",
            get(catalog::admin_get_model)
                .put(catalog::update_model)
                .delete(catalog::delete_model),
        )
        .route("/api/admin/models/{id}/years", get(catalog::list_years).post(catalog::create_year))
        .route(
            "/api/admin/models/{id}/assignments",
            get(components::list_assignments).post(components::assign),
        )
        .route(
            "/api/admin/years/{id}",
            get(catalog::get_year)
                .put(catalog::update_year)
                .delete(catalog::delete_year),
        )
        .route(
            "/api/admin/years/{id}/configurations",
            get(configurations::list_for_year).post(configurations::create),
        )
        .route(
            "/api/admin/configurations/{id}",
            get(configurations::get)
                .put(configurations::update)
                .delete(configurations::delete),
        )
        .route("/api/admin/configurations/{id}/default", post(configurations::set_default))
        .route("/api/admin/configurations/{id}/copy", post(configurations::copy))
        .route("/api/admin/configurations/{id}/quick-copy", post(configurations::quick_copy))
        .route(
            "/api/admin/configurations/{id}/components",
            get(configurations::effective_components),
        )
        .route("/api/admin/components/{kind}", get(components::list).post(components::create))
        .route(
            "/api/admin/components/{kind}/{id}",
            get(components::get)
                .put(components::update)
                .delete(components::delete),
        )
        .route(
            "/api/admin/assignments/{id}",
            get(components::get_assignment).delete(components::unassign),
        )
        .route("/api/admin/courses", get(learning::admin_list_courses).post(learning::create_course))
        .route(
            "/api/admin/courses/{id}",
            get(learning::get_course)
                .put(learning::update_course)
                .delete(learning::delete_course),
        )
        .route(
            "/api/admin/courses/{id}/lessons",
            get(learning::list_lessons).post(learning::create_lesson),
        )
        .route("/api/admin/courses/{id}/lessons/order", put(learning::reorder_lessons))
        .route(
            "/api/admin/lessons/{id}",
            get(learning::get_lesson)
                .put(learning::update_lesson)
                .delete(learning::delete_lesson),
        )
        .route("/api/admin/glossary", get(learning::list_terms).post(learning::create_term))
        .route(
            "/api/admin/glossary/{id}",
            get(learning::get_term)
                .put(learning::update_term)
                .delete(learning::delete_term),
        )
        .route("/api/admin/profiles", get(profiles::list).post(profiles::create))
        .route("/api/admin/profiles/{id}", get(profiles::get))
        .route("/api/admin/profiles/{id}/role", put(profiles::update_role))
        .route_layer(middleware::from_extractor_with_state::<admin::AdminUser, AppState>(state))
}

/// Full API router with request tracing and CORS.
///
/// # Errors
///
/// Returns an error if `cors_origin` is not a valid header value.
pub fn app(state: AppState, cors_origin: Option<&str>) -> Result<Router, InvalidHeaderValue> {
    let cors = cors_layer(cors_origin)?;
    Ok(public_routes()
        .merge(admin_routes(state.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state))
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::test_helpers::test_app_state;

    #[test]
    fn cors_layer_accepts_any_or_exact_origin() {
        assert!(cors_layer(None).is_ok());
        assert!(cors_layer(Some("https://wrenchmark.example")).is_ok());
    }

    #[test]
    fn cors_layer_rejects_invalid_origin() {
        assert!(cors_layer(Some("bad\norigin")).is_err());
    }

    #[tokio::test]
    async fn router_builds_without_conflicting_routes() {
        assert!(app(test_app_state(), None).is_ok());
    }

    #[tokio::test]
    async fn healthz_is_ok() {
        assert_eq!(healthz().await, StatusCode::OK);
    }
}
