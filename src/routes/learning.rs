//! Learning routes — courses, lessons, and the glossary.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;
use serde::Deserialize;
use uuid::Uuid;

use super::extract::{ApiJson, ApiPath, ApiQuery};
use crate::error::CatalogError;
use crate::services::learning::{
    self, Course, CourseDetail, CourseInput, GlossaryInput, GlossaryTerm, Lesson, LessonInput,
};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct GlossaryQuery {
    pub q: Option<String>,
    pub category: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ReorderBody {
    pub lesson_ids: Vec<Uuid>,
}

// =============================================================================
// PUBLIC
// =============================================================================

/// `GET /api/courses` — published courses.
pub async fn list_courses(State(state): State<AppState>) -> Result<Json<Vec<Course>>, CatalogError> {
    Ok(Json(learning::list_courses(&state.pool, false).await?))
}

/// `GET /api/courses/{slug}`
pub async fn get_course_by_slug(
    State(state): State<AppState>,
    ApiPath(slug): ApiPath<String>,
) -> Result<Json<CourseDetail>, CatalogError> {
    Ok(Json(learning::get_published_course(&state.pool, &slug).await?))
}

/// `GET /api/glossary?q=&category=`
pub async fn list_terms(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<GlossaryQuery>,
) -> Result<Json<Vec<GlossaryTerm>>, CatalogError> {
    let terms = learning::list_terms(&state.pool, query.q.as_deref(), query.category.as_deref()).await?;
    Ok(Json(terms))
}

// =============================================================================
// ADMIN: COURSES
// =============================================================================

/// `GET /api/admin/courses` — drafts included.
pub async fn admin_list_courses(State(state): State<AppState>) -> Result<Json<Vec<Course>>, CatalogError> {
    Ok(Json(learning::list_courses(&state.pool, true).await?))
}

/// `POST /api/admin/courses`
pub async fn create_course(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<CourseInput>,
) -> Result<(StatusCode, Json<Course>), CatalogError> {
    let created = learning::create_course(&state.pool, body).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// `GET /api/admin/courses/{id}`
pub async fn get_course(State(state): State<AppState>, ApiPath(id): ApiPath<Uuid>) -> Result<Json<Course>, CatalogError> {
    Ok(Json(learning::get_course(&state.pool, id).await?))
}

/// `PUT /api/admin/courses/{id}`
pub async fn update_course(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(body): ApiJson<CourseInput>,
) -> Result<Json<Course>, CatalogError> {
    Ok(Json(learning::update_course(&state.pool, id, body).await?))
}

/// `DELETE /api/admin/courses/{id}`
pub async fn delete_course(State(state): State<AppState>, ApiPath(id): ApiPath<Uuid>) -> Result<StatusCode, CatalogError> {
    learning::delete_course(&state.pool, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// ADMIN: LESSONS
// =============================================================================

/// `GET /api/admin/courses/{id}/lessons`
pub async fn list_lessons(
    State(state): State<AppState>,
    ApiPath(course_id): ApiPath<Uuid>,
) -> Result<Json<Vec<Lesson>>, CatalogError> {
    learning::get_course(&state.pool, course_id).await?;
    Ok(Json(learning::list_lessons(&state.pool, course_id).await?))
}

/// `POST /api/admin/courses/{id}/lessons`
pub async fn create_lesson(
    State(state): State<AppState>,
    ApiPath(course_id): ApiPath<Uuid>,
    ApiJson(body): ApiJson<LessonInput>,
) -> Result<(StatusCode, Json<Lesson>), CatalogError> {
    let created = learning::create_lesson(&state.pool, course_id, body).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// `PUT /api/admin/courses/{id}/lessons/order`
pub async fn reorder_lessons(
    State(state): State<AppState>,
    ApiPath(course_id): ApiPath<Uuid>,
    ApiJson(body): ApiJson<ReorderBody>,
) -> Result<Json<Vec<Lesson>>, CatalogError> {
    Ok(Json(learning::reorder_lessons(&state.pool, course_id, &body.lesson_ids).await?))
}

/// `GET /api/admin/lessons/{id}`
pub async fn get_lesson(State(state): State<AppState>, ApiPath(id): ApiPath<Uuid>) -> Result<Json<Lesson>, CatalogError> {
    Ok(Json(learning::get_lesson(&state.pool, id).await?))
}

/// `PUT /api/admin/lessons/{id}`
pub async fn update_lesson(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(body): ApiJson<LessonInput>,
) -> Result<Json<Lesson>, CatalogError> {
    Ok(Json(learning::update_lesson(&state.pool, id, body).await?))
}

/// `DELETE /api/admin/lessons/{id}`
pub async fn delete_lesson(State(state): State<AppState>, ApiPath(id): ApiPath<Uuid>) -> Result<StatusCode, CatalogError> {
    learning::delete_lesson(&state.pool, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// ADMIN: GLOSSARY
// =============================================================================

/// `POST /api/admin/glossary`
pub async fn create_term(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<GlossaryInput>,
) -> Result<(StatusCode, Json<GlossaryTerm>), CatalogError> {
    let created = learning::create_term(&state.pool, body).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// `GET /api/admin/glossary/{id}`
pub async fn get_term(State(state): State<AppState>, ApiPath(id): ApiPath<Uuid>) -> Result<Json<GlossaryTerm>, CatalogError> {
    Ok(Json(learning::get_term(&state.pool, id).await?))
}

/// `PUT /api/admin/glossary/{id}`
pub async fn update_term(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(body): ApiJson<GlossaryInput>,
) -> Result<Json<GlossaryTerm>, CatalogError> {
    Ok(Json(learning::update_term(&state.pool, id, body).await?))
}

/// `DELETE /api/admin/glossary/{id}`
pub async fn delete_term(State(state): State<AppState>, ApiPath(id): ApiPath<Uuid>) -> Result<StatusCode, CatalogError> {
    learning::delete_term(&state.pool, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reorder_body_requires_lesson_ids() {
        let id = Uuid::new_v4();
        let body: ReorderBody = serde_json::from_value(serde_json::json!({ "lesson_ids": [id] })).unwrap();
        assert_eq!(body.lesson_ids, vec![id]);
        assert!(serde_json::from_str::<ReorderBody>("{}").is_err());
    }

    #[test]
    fn glossary_query_fields_are_optional() {
        let query: GlossaryQuery = serde_json::from_str(r#"{"category":"brakes"}"#).unwrap();
        assert!(query.q.is_none());
        assert_eq!(query.category.as_deref(), Some("brakes"));
    }
}
