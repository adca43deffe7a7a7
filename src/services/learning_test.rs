use super::*;

#[test]
fn course_slug_defaults_from_title() {
    let input = CourseInput { title: Some("Braking 101: The Basics".into()), ..CourseInput::default() };
    let columns = input.into_columns().unwrap();
    assert!(columns.contains(&("slug", ColumnValue::Text(Some("braking-101-the-basics".into())))));
    assert!(columns.contains(&("difficulty", ColumnValue::Text(Some("beginner".into())))));
}

#[test]
fn course_rejects_bad_slug_and_difficulty() {
    let input = CourseInput {
        title: Some("Cornering".into()),
        slug: Some("Cornering Lines".into()),
        ..CourseInput::default()
    };
    assert!(input.into_columns().is_err());

    let input = CourseInput {
        title: Some("Cornering".into()),
        difficulty: Some("expert".into()),
        ..CourseInput::default()
    };
    let err = input.into_columns().unwrap_err();
    assert_eq!(err.to_string(), "difficulty must be one of: beginner, intermediate, advanced");
}

#[test]
fn course_difficulty_is_case_insensitive() {
    let input = CourseInput {
        title: Some("Track Days".into()),
        difficulty: Some(" Advanced ".into()),
        ..CourseInput::default()
    };
    let columns = input.into_columns().unwrap();
    assert!(columns.contains(&("difficulty", ColumnValue::Text(Some("advanced".into())))));
}

#[test]
fn course_title_without_slug_characters_fails() {
    let input = CourseInput { title: Some("???".into()), ..CourseInput::default() };
    assert!(input.into_columns().is_err());
}

#[test]
fn lesson_position_must_be_positive() {
    let input = LessonInput { title: Some("Trail braking".into()), position: Some(0), ..LessonInput::default() };
    assert_eq!(input.into_columns().unwrap_err().to_string(), "position must be at least 1");

    let input: LessonInput = serde_json::from_str(r#"{"title":"Trail braking","position":"","duration_minutes":"12"}"#).unwrap();
    let (columns, position) = input.into_columns().unwrap();
    assert_eq!(position, None);
    assert!(columns.contains(&("duration_minutes", ColumnValue::Int(Some(12)))));
}

#[test]
fn glossary_requires_term_and_definition() {
    let err = GlossaryInput { term: Some("Rake".into()), ..GlossaryInput::default() }
        .into_columns()
        .unwrap_err();
    assert_eq!(err.to_string(), "definition is required");

    let columns = GlossaryInput {
        term: Some(" Rake ".into()),
        definition: Some("Steering head angle from vertical.".into()),
        category: Some(String::new()),
    }
    .into_columns()
    .unwrap();
    assert_eq!(columns[0], ("term", ColumnValue::Text(Some("Rake".into()))));
    assert_eq!(columns[2], ("category", ColumnValue::Text(None)));
}

#[test]
fn reorder_must_be_a_permutation() {
    let (a, b, c) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
    assert!(check_reorder(&[a, b, c], &[c, a, b]).is_ok());
    assert!(check_reorder(&[a, b, c], &[a, b]).is_err());
    assert!(check_reorder(&[a, b], &[a, b, Uuid::new_v4()]).is_err());
    let err = check_reorder(&[a, b], &[a, a]).unwrap_err();
    assert_eq!(err.to_string(), "lesson order contains duplicates");
    assert!(check_reorder(&[], &[]).is_ok());
}

#[test]
fn like_pattern_escapes_wildcards() {
    assert_eq!(like_pattern("abs"), "%abs%");
    assert_eq!(like_pattern("100%"), "%100\\%%");
    assert_eq!(like_pattern("c_b"), "%c\\_b%");
}

// =============================================================================
// live Postgres
// =============================================================================

#[cfg(feature = "live-db-tests")]
#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL/live Postgres"]
async fn reorder_renumbers_lessons_in_requested_order() {
    use crate::db::test_support::{integration_pool, unique};

    let pool = integration_pool().await;
    let course = create_course(&pool, CourseInput { title: Some(unique("Braking")), ..CourseInput::default() })
        .await
        .expect("course should be created");
    let mut ids = Vec::new();
    for title in ["Grip", "Trail braking", "Emergency stops"] {
        let lesson = create_lesson(&pool, course.id, LessonInput { title: Some(title.into()), ..LessonInput::default() })
            .await
            .expect("lesson should be created");
        ids.push(lesson.id);
    }
    let positions: Vec<i32> = list_lessons(&pool, course.id).await.unwrap().iter().map(|l| l.position).collect();
    assert_eq!(positions, vec![1, 2, 3]);

    let reversed: Vec<Uuid> = ids.iter().rev().copied().collect();
    let reordered = reorder_lessons(&pool, course.id, &reversed)
        .await
        .expect("reorder should succeed");
    let order: Vec<(Uuid, i32)> = reordered.iter().map(|l| (l.id, l.position)).collect();
    assert_eq!(order, vec![(ids[2], 1), (ids[1], 2), (ids[0], 3)]);

    let err = reorder_lessons(&pool, course.id, &ids[..2]).await.unwrap_err();
    assert!(matches!(err, CatalogError::Validation(_)));
}
