//! Requests rejected before any query runs, driven through the full router.

mod common;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use common::{offline_app, send};
use serde_json::json;
use tower::ServiceExt;

async fn error_code(method: Method, uri: &str, body: Option<serde_json::Value>) -> (StatusCode, String) {
    let (status, _, body) = send(&offline_app(), method, uri, body).await;
    (status, body["error"]["code"].as_str().unwrap_or_default().to_string())
}

#[tokio::test]
async fn health_and_version() {
    let (status, _, body) = send(&offline_app(), Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let (status, _, body) = send(&offline_app(), Method::GET, "/version", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "registry-api");
}

#[tokio::test]
async fn page_below_one_is_rejected() {
    let (status, code) = error_code(Method::GET, "/api/v1/brands?page=0&size=5", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(code, "validation_error");
}

#[tokio::test]
async fn size_out_of_range_is_rejected() {
    for uri in ["/api/v1/tools?page=1&size=0", "/api/v1/tools?page=1&size=51"] {
        let (status, code) = error_code(Method::GET, uri, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
        assert_eq!(code, "validation_error");
    }
}

#[tokio::test]
async fn missing_or_malformed_parameters_are_rejected() {
    for uri in [
        "/api/v1/persons?size=5",
        "/api/v1/persons?page=one&size=5",
        "/api/v1/persons?page=1&size=5&isArchived=maybe",
        "/api/v1/categories?page=1&size=5&isParent=yes",
        "/api/v1/comments?page=1&size=5&toolId=x",
    ] {
        let (status, code) = error_code(Method::GET, uri, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
        assert_eq!(code, "validation_error", "{}", uri);
    }
}

#[tokio::test]
async fn invalid_save_bodies_are_rejected() {
    let cases = [
        ("/api/v1/brands", json!({ "name": "   " })),
        ("/api/v1/persons", json!({ "name": "Ada", "email": "not-an-email" })),
        ("/api/v1/stocks", json!({ "name": "Shelf", "quantity": -1 })),
        ("/api/v1/comments", json!({ "content": "Needs oil" })),
        ("/api/v1/tools", json!({ "name": "Drill", "labelIds": [0] })),
        ("/api/v1/categories", json!({ "id": 4, "name": "Loop", "parentId": 4 })),
    ];
    for (uri, body) in cases {
        let (status, code) = error_code(Method::POST, uri, Some(body.clone())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{} {}", uri, body);
        assert_eq!(code, "validation_error", "{} {}", uri, body);
    }
}

#[tokio::test]
async fn non_numeric_id_is_rejected() {
    let (status, _, _) = send(&offline_app(), Method::GET, "/api/v1/tools/abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn only_comments_can_be_deleted() {
    let (status, _, _) = send(&offline_app(), Method::DELETE, "/api/v1/brands/1", None).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn oversized_body_is_rejected() {
    let payload = "x".repeat(registry_api::MAX_BODY_BYTES + 1);
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/v1/brands")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::CONTENT_LENGTH, payload.len())
        .body(Body::from(payload))
        .unwrap();
    let response = offline_app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}
