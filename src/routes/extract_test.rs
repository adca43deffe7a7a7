use super::*;
use axum::body::Body;
use axum::http::{Request as HttpRequest, StatusCode};
use axum::http::header::CONTENT_TYPE;
use uuid::Uuid;

use crate::error::ErrorCode;
use crate::routes::catalog::{AdminModelQuery, SearchQuery};
use crate::services::trim_copy::CopyRequest;

fn json_request(body: &str) -> Request {
    HttpRequest::builder()
        .method("POST")
        .uri("/api/admin/configurations/x/copy")
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_owned()))
        .unwrap()
}

fn parts_for(uri: &str) -> Parts {
    HttpRequest::builder().uri(uri).body(()).unwrap().into_parts().0
}

fn assert_validation(err: &CatalogError) {
    assert!(matches!(err, CatalogError::Validation(_)));
    assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    assert_eq!(err.error_code(), "E_VALIDATION");
}

#[tokio::test]
async fn malformed_json_is_a_validation_error() {
    let Err(err) = ApiJson::<serde_json::Value>::from_request(json_request("{"), &()).await else {
        panic!("malformed body should be rejected");
    };
    assert_validation(&err);
}

#[tokio::test]
async fn json_missing_required_field_is_a_validation_error() {
    let body = format!(r#"{{"target_year_ids":["{}"]}}"#, Uuid::new_v4());
    let Err(err) = ApiJson::<CopyRequest>::from_request(json_request(&body), &()).await else {
        panic!("copy request without selection should be rejected");
    };
    assert_validation(&err);
    assert!(err.to_string().contains("selection"));
}

#[tokio::test]
async fn json_without_content_type_is_a_validation_error() {
    let req = HttpRequest::builder().method("POST").uri("/").body(Body::from("{}")).unwrap();
    let Err(err) = ApiJson::<serde_json::Value>::from_request(req, &()).await else {
        panic!("body without content type should be rejected");
    };
    assert_validation(&err);
}

#[tokio::test]
async fn well_formed_json_is_extracted() {
    let Ok(ApiJson(value)) = ApiJson::<serde_json::Value>::from_request(json_request(r#"{"name":"Base"}"#), &()).await
    else {
        panic!("valid body should be accepted");
    };
    assert_eq!(value["name"], "Base");
}

#[tokio::test]
async fn bad_query_value_is_a_validation_error() {
    let mut parts = parts_for("/api/admin/models?include_drafts=maybe");
    let Err(err) = ApiQuery::<AdminModelQuery>::from_request_parts(&mut parts, &()).await else {
        panic!("non-boolean include_drafts should be rejected");
    };
    assert_validation(&err);
}

#[tokio::test]
async fn query_is_extracted() {
    let mut parts = parts_for("/api/search?q=duke");
    let Ok(ApiQuery(query)) = ApiQuery::<SearchQuery>::from_request_parts(&mut parts, &()).await else {
        panic!("query should be accepted");
    };
    assert_eq!(query.q.as_deref(), Some("duke"));
}

#[tokio::test]
async fn path_outside_a_route_is_a_validation_error() {
    let mut parts = parts_for("/api/admin/brands/not-a-uuid");
    let Err(err) = ApiPath::<Uuid>::from_request_parts(&mut parts, &()).await else {
        panic!("path params are only available inside a matched route");
    };
    assert_validation(&err);
}
