use super::*;

#[test]
fn public_model_query_never_includes_drafts() {
    let query = PublicModelQuery { brand_id: Some(Uuid::nil()), category: Some("naked".into()) };
    let filter = query.into_filter();
    assert!(!filter.include_drafts);
    assert_eq!(filter.brand_id, Some(Uuid::nil()));
    assert_eq!(filter.category.as_deref(), Some("naked"));
}

#[test]
fn admin_model_query_includes_drafts_by_default() {
    assert!(AdminModelQuery::default().into_filter().include_drafts);
    let explicit = AdminModelQuery { include_drafts: Some(false), ..AdminModelQuery::default() };
    assert!(!explicit.into_filter().include_drafts);
}

#[test]
fn search_query_deserializes_optional_q() {
    let query: SearchQuery = serde_json::from_str(r#"{"q":"ducati"}"#).unwrap();
    assert_eq!(query.q.as_deref(), Some("ducati"));
    let empty: SearchQuery = serde_json::from_str("{}").unwrap();
    assert!(empty.q.is_none());
}
