//! Learning content — courses, their ordered lessons, and the glossary.

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use super::payload::{clean_text, lenient_i32, require_text};
use super::rows::{self, ColumnValue, Columns};
use super::validate;
use crate::error::CatalogError;

pub const DIFFICULTIES: [&str; 3] = ["beginner", "intermediate", "advanced"];

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Course {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub description: Option<String>,
    pub difficulty: String,
    pub is_published: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CourseInput {
    pub title: Option<String>,
    /// Derived from the title when blank.
    pub slug: Option<String>,
    pub description: Option<String>,
    pub difficulty: Option<String>,
    #[serde(default)]
    pub is_published: bool,
}

impl CourseInput {
    /// # Errors
    ///
    /// Returns a validation error for a missing title, a malformed slug, or
    /// an unknown difficulty.
    pub fn into_columns(self) -> Result<Columns, CatalogError> {
        let title = require_text("title", self.title)?;
        let slug = clean_text(self.slug).unwrap_or_else(|| validate::slugify(&title));
        validate::slug("slug", &slug)?;
        let difficulty = clean_text(self.difficulty)
            .map(|d| d.to_ascii_lowercase())
            .unwrap_or_else(|| DIFFICULTIES[0].to_owned());
        validate::one_of("difficulty", &difficulty, &DIFFICULTIES)?;

        Ok(vec![
            ("title", ColumnValue::Text(Some(title))),
            ("slug", ColumnValue::Text(Some(slug))),
            ("description", ColumnValue::Text(clean_text(self.description))),
            ("difficulty", ColumnValue::Text(Some(difficulty))),
            ("is_published", ColumnValue::Bool(Some(self.is_published))),
        ])
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Lesson {
    pub id: Uuid,
    pub course_id: Uuid,
    pub title: String,
    pub content: Option<String>,
    pub position: i32,
    pub duration_minutes: Option<i32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LessonInput {
    pub title: Option<String>,
    pub content: Option<String>,
    /// Appended after the last lesson when absent.
    #[serde(default, deserialize_with = "lenient_i32")]
    pub position: Option<i32>,
    #[serde(default, deserialize_with = "lenient_i32")]
    pub duration_minutes: Option<i32>,
}

impl LessonInput {
    /// # Errors
    ///
    /// Returns a validation error for a missing title, a position below 1,
    /// or a negative duration.
    pub fn into_columns(self) -> Result<(Columns, Option<i32>), CatalogError> {
        let title = require_text("title", self.title)?;
        if let Some(position) = self.position {
            if position < 1 {
                return Err(CatalogError::validation("position must be at least 1"));
            }
        }
        validate::non_negative_int("duration_minutes", self.duration_minutes)?;
        Ok((
            vec![
                ("title", ColumnValue::Text(Some(title))),
                ("content", ColumnValue::Text(clean_text(self.content))),
                ("duration_minutes", ColumnValue::Int(self.duration_minutes)),
            ],
            self.position,
        ))
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CourseDetail {
    #[serde(flatten)]
    pub course: Course,
    pub lessons: Vec<Lesson>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct GlossaryTerm {
    pub id: Uuid,
    pub term: String,
    pub definition: String,
    pub category: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GlossaryInput {
    pub term: Option<String>,
    pub definition: Option<String>,
    pub category: Option<String>,
}

impl GlossaryInput {
    /// # Errors
    ///
    /// Returns a validation error for a missing term or definition.
    pub fn into_columns(self) -> Result<Columns, CatalogError> {
        Ok(vec![
            ("term", ColumnValue::Text(Some(require_text("term", self.term)?))),
            ("definition", ColumnValue::Text(Some(require_text("definition", self.definition)?))),
            ("category", ColumnValue::Text(clean_text(self.category))),
        ])
    }
}

/// Check a reorder request names exactly the course's lessons, once each.
///
/// # Errors
///
/// Returns a validation error describing the mismatch.
pub fn check_reorder(current: &[Uuid], requested: &[Uuid]) -> Result<(), CatalogError> {
    let mut a = current.to_vec();
    let mut b = requested.to_vec();
    a.sort_unstable();
    b.sort_unstable();
    if b.windows(2).any(|w| w[0] == w[1]) {
        return Err(CatalogError::validation("lesson order contains duplicates"));
    }
    if a != b {
        return Err(CatalogError::validation("lesson order must list every lesson of the course exactly once"));
    }
    Ok(())
}

/// Escape `%` and `_` so user input matches literally inside `ILIKE`.
#[must_use]
pub fn like_pattern(query: &str) -> String {
    let escaped = query
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

// =============================================================================
// COURSES
// =============================================================================

const SELECT_COURSE: &str = "SELECT id, title, slug, description, difficulty, is_published FROM courses";

/// # Errors
///
/// Returns a database error if the query fails.
pub async fn list_courses(pool: &PgPool, include_drafts: bool) -> Result<Vec<Course>, CatalogError> {
    let filter = if include_drafts { "" } else { " WHERE is_published" };
    let rows = sqlx::query_as::<_, Course>(&format!("{SELECT_COURSE}{filter} ORDER BY title ASC"))
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// # Errors
///
/// Returns `NotFound` or a database error.
pub async fn get_course(pool: &PgPool, id: Uuid) -> Result<Course, CatalogError> {
    sqlx::query_as::<_, Course>(&format!("{SELECT_COURSE} WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| CatalogError::not_found("course", id))
}

/// Published course with its lessons, looked up by slug.
///
/// # Errors
///
/// Returns `NotFound` or a database error.
pub async fn get_published_course(pool: &PgPool, slug: &str) -> Result<CourseDetail, CatalogError> {
    let course = sqlx::query_as::<_, Course>(&format!("{SELECT_COURSE} WHERE slug = $1 AND is_published"))
        .bind(slug)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| CatalogError::not_found("course", slug))?;
    let lessons = list_lessons(pool, course.id).await?;
    Ok(CourseDetail { course, lessons })
}

/// # Errors
///
/// Returns a validation error, a conflict on duplicate slug, or a database error.
pub async fn create_course(pool: &PgPool, input: CourseInput) -> Result<Course, CatalogError> {
    let columns = input.into_columns()?;
    let id = rows::insert_row(pool, "courses", &columns).await?;
    info!(%id, "course created");
    get_course(pool, id).await
}

/// # Errors
///
/// Returns a validation error, `NotFound`, a conflict, or a database error.
pub async fn update_course(pool: &PgPool, id: Uuid, input: CourseInput) -> Result<Course, CatalogError> {
    let columns = input.into_columns()?;
    rows::update_row(pool, "courses", "course", id, &columns).await?;
    get_course(pool, id).await
}

/// Delete a course and its lessons.
///
/// # Errors
///
/// Returns `NotFound` or a database error.
pub async fn delete_course(pool: &PgPool, id: Uuid) -> Result<(), CatalogError> {
    rows::delete_row(pool, "courses", "course", id).await?;
    info!(%id, "course deleted");
    Ok(())
}

// =============================================================================
// LESSONS
// =============================================================================

const SELECT_LESSON: &str = "SELECT id, course_id, title, content, position, duration_minutes FROM lessons";

/// # Errors
///
/// Returns a database error if the query fails.
pub async fn list_lessons(pool: &PgPool, course_id: Uuid) -> Result<Vec<Lesson>, CatalogError> {
    let rows = sqlx::query_as::<_, Lesson>(&format!("{SELECT_LESSON} WHERE course_id = $1 ORDER BY position ASC"))
        .bind(course_id)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// # Errors
///
/// Returns `NotFound` or a database error.
pub async fn get_lesson(pool: &PgPool, id: Uuid) -> Result<Lesson, CatalogError> {
    sqlx::query_as::<_, Lesson>(&format!("{SELECT_LESSON} WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| CatalogError::not_found("lesson", id))
}

/// Add a lesson. Without a position it goes after the last lesson.
///
/// # Errors
///
/// Returns a validation error, `NotFound` for an unknown course, a conflict
/// when the position is taken, or a database error.
pub async fn create_lesson(pool: &PgPool, course_id: Uuid, input: LessonInput) -> Result<Lesson, CatalogError> {
    let (mut columns, position) = input.into_columns()?;
    get_course(pool, course_id).await?;

    let mut tx = pool.begin().await?;
    let position = match position {
        Some(p) => p,
        None => {
            sqlx::query_scalar::<_, i32>("SELECT COALESCE(MAX(position), 0) + 1 FROM lessons WHERE course_id = $1")
                .bind(course_id)
                .fetch_one(&mut *tx)
                .await?
        }
    };
    columns.push(("course_id", ColumnValue::Id(Some(course_id))));
    columns.push(("position", ColumnValue::Int(Some(position))));
    let id = rows::insert_row(&mut *tx, "lessons", &columns).await?;
    tx.commit().await?;

    info!(%id, %course_id, position, "lesson created");
    get_lesson(pool, id).await
}

/// # Errors
///
/// Returns a validation error, `NotFound`, a conflict, or a database error.
pub async fn update_lesson(pool: &PgPool, id: Uuid, input: LessonInput) -> Result<Lesson, CatalogError> {
    let (mut columns, position) = input.into_columns()?;
    if let Some(position) = position {
        columns.push(("position", ColumnValue::Int(Some(position))));
    }
    rows::update_row(pool, "lessons", "lesson", id, &columns).await?;
    get_lesson(pool, id).await
}

/// # Errors
///
/// Returns `NotFound` or a database error.
pub async fn delete_lesson(pool: &PgPool, id: Uuid) -> Result<(), CatalogError> {
    rows::delete_row(pool, "lessons", "lesson", id).await?;
    info!(%id, "lesson deleted");
    Ok(())
}

/// Renumber a course's lessons 1..n in the given order, atomically.
///
/// # Errors
///
/// Returns `NotFound` for an unknown course, a validation error when the
/// order does not match the course's lessons, or a database error.
pub async fn reorder_lessons(pool: &PgPool, course_id: Uuid, order: &[Uuid]) -> Result<Vec<Lesson>, CatalogError> {
    get_course(pool, course_id).await?;
    let current: Vec<Uuid> = list_lessons(pool, course_id)
        .await?
        .into_iter()
        .map(|l| l.id)
        .collect();
    check_reorder(&current, order)?;

    let mut tx = pool.begin().await?;
    sqlx::query("SET CONSTRAINTS lessons_course_id_position_key DEFERRED")
        .execute(&mut *tx)
        .await?;
    for (position, lesson_id) in (1_i32..).zip(order) {
        sqlx::query("UPDATE lessons SET position = $2, updated_at = now() WHERE id = $1 AND course_id = $3")
            .bind(*lesson_id)
            .bind(position)
            .bind(course_id)
            .execute(&mut *tx)
            .await?;
    }
    tx.commit().await?;

    info!(%course_id, count = order.len(), "lessons reordered");
    list_lessons(pool, course_id).await
}

// =============================================================================
// GLOSSARY
// =============================================================================

const SELECT_TERM: &str = "SELECT id, term, definition, category FROM glossary_terms";

/// List glossary terms, optionally narrowed by a case-insensitive substring
/// of the term and by category.
///
/// # Errors
///
/// Returns a database error if the query fails.
pub async fn list_terms(pool: &PgPool, search: Option<&str>, category: Option<&str>) -> Result<Vec<GlossaryTerm>, CatalogError> {
    let pattern = search
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(like_pattern);
    let category = category.map(str::trim).filter(|s| !s.is_empty());
    let rows = sqlx::query_as::<_, GlossaryTerm>(&format!(
        "{SELECT_TERM} WHERE ($1::text IS NULL OR term ILIKE $1) AND ($2::text IS NULL OR category = $2) \
         ORDER BY lower(term) ASC"
    ))
    .bind(pattern)
    .bind(category)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// # Errors
///
/// Returns `NotFound` or a database error.
pub async fn get_term(pool: &PgPool, id: Uuid) -> Result<GlossaryTerm, CatalogError> {
    sqlx::query_as::<_, GlossaryTerm>(&format!("{SELECT_TERM} WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| CatalogError::not_found("glossary term", id))
}

/// # Errors
///
/// Returns a validation error, a conflict on duplicate term, or a database error.
pub async fn create_term(pool: &PgPool, input: GlossaryInput) -> Result<GlossaryTerm, CatalogError> {
    let columns = input.into_columns()?;
    let id = rows::insert_row(pool, "glossary_terms", &columns).await?;
    info!(%id, "glossary term created");
    get_term(pool, id).await
}

/// # Errors
///
/// Returns a validation error, `NotFound`, a conflict, or a database error.
pub async fn update_term(pool: &PgPool, id: Uuid, input: GlossaryInput) -> Result<GlossaryTerm, CatalogError> {
    let columns = input.into_columns()?;
    rows::update_row(pool, "glossary_terms", "glossary term", id, &columns).await?;
    get_term(pool, id).await
}

/// # Errors
///
/// Returns `NotFound` or a database error.
pub async fn delete_term(pool: &PgPool, id: Uuid) -> Result<(), CatalogError> {
    rows::delete_row(pool, "glossary_terms", "glossary term", id).await?;
    Ok(())
}

#[cfg(test)]
#[path = "learning_test.rs"]
mod tests;
