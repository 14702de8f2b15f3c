//! Integration Tests for API Endpoints
//!
//! Tests full request/response cycle for each endpoint.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;
use validade::{api::create_router, store::DocumentStore, AppState};

// == Helper Functions ==

fn create_test_app() -> Router {
    create_router(AppState::new(Arc::new(DocumentStore::in_memory())))
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn bare_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// Asserts a 400 whose JSON body carries only the static validation message.
async fn assert_validation_error(response: axum::response::Response, expected: &str) {
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["error"], expected);
}

const MISSING_CREATE: &str = "Barcode, quantity and expiration date are required";
const MISSING_DELETE: &str = "Barcode and expiration date are required";

fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

const MILK: &str = r#"{
    "codigo_barra": "123",
    "nome_produto": "Milk",
    "quantidade_produto": "12",
    "validade_produto": "2025-06-30"
}"#;

// == Root Endpoint ==

#[tokio::test]
async fn test_root_endpoint() {
    let app = create_test_app();

    let response = app.oneshot(get_request("/")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&bytes[..], b"Server is Running");
}

// == POST /users ==

#[tokio::test]
async fn test_create_endpoint_success() {
    let app = create_test_app();

    let response = app
        .oneshot(json_request("POST", "/users", MILK))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_to_json(response.into_body()).await;
    assert!(json["message"].as_str().unwrap().contains("created"));
}

#[tokio::test]
async fn test_create_without_quantity_not_persisted() {
    let app = create_test_app();

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/users",
            r#"{"codigo_barra":"123","validade_produto":"2025-06-30"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_to_json(response.into_body()).await;
    assert!(json.get("error").is_some());

    let response = app.oneshot(get_request("/users")).await.unwrap();
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_create_without_expiration_rejected() {
    let app = create_test_app();

    let response = app
        .oneshot(json_request(
            "POST",
            "/users",
            r#"{"codigo_barra":"123","quantidade_produto":"1"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_with_unparsable_date_rejected() {
    let app = create_test_app();

    let response = app
        .oneshot(json_request(
            "POST",
            "/users",
            r#"{"codigo_barra":"123","quantidade_produto":"1","validade_produto":"soon"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_without_body_rejected() {
    let app = create_test_app();

    let response = app.oneshot(bare_request("POST", "/users")).await.unwrap();

    assert_validation_error(response, MISSING_CREATE).await;
}

#[tokio::test]
async fn test_create_with_null_body_rejected() {
    let app = create_test_app();

    let response = app
        .oneshot(json_request("POST", "/users", "null"))
        .await
        .unwrap();

    assert_validation_error(response, MISSING_CREATE).await;
}

#[tokio::test]
async fn test_create_with_truncated_json_rejected() {
    let app = create_test_app();

    let response = app
        .clone()
        .oneshot(json_request("POST", "/users", r#"{"codigo_barra":"123","#))
        .await
        .unwrap();
    assert_validation_error(response, MISSING_CREATE).await;

    let response = app.oneshot(get_request("/users")).await.unwrap();
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json.as_array().unwrap().len(), 0);
}

// == GET /users and /users/:barcode ==

#[tokio::test]
async fn test_get_after_insert() {
    let app = create_test_app();

    let response = app
        .clone()
        .oneshot(json_request("POST", "/users", MILK))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app.clone().oneshot(get_request("/users/123")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["codigo_barra"], "123");
    assert_eq!(json["nome_produto"], "Milk");
    assert_eq!(json["quantidade_produto"], "12");
    assert_eq!(json["validade_produto"], "2025-06-30");

    let response = app.oneshot(get_request("/users/999")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_to_json(response.into_body()).await;
    assert!(json.get("error").is_some());
}

#[tokio::test]
async fn test_list_returns_all_batches() {
    let app = create_test_app();

    for date in ["2025-06-30", "2025-07-30"] {
        let body = format!(
            r#"{{"codigo_barra":"123","quantidade_produto":"1","validade_produto":"{}"}}"#,
            date
        );
        let response = app
            .clone()
            .oneshot(json_request("POST", "/users", &body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = app.oneshot(get_request("/users")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json.as_array().unwrap().len(), 2);
}

// == DELETE /users ==

#[tokio::test]
async fn test_delete_requires_exact_compound_key() {
    let app = create_test_app();

    app.clone()
        .oneshot(json_request("POST", "/users", MILK))
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(json_request(
            "DELETE",
            "/users",
            r#"{"codigo_barra":"123","validade_produto":"2025-07-01"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .clone()
        .oneshot(json_request(
            "DELETE",
            "/users",
            r#"{"codigo_barra":"123","validade_produto":"2025-06-30"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.oneshot(get_request("/users/123")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_missing_fields() {
    let app = create_test_app();

    let response = app
        .oneshot(json_request("DELETE", "/users", r#"{"codigo_barra":"123"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_delete_accepts_timestamp_dates() {
    let app = create_test_app();

    app.clone()
        .oneshot(json_request("POST", "/users", MILK))
        .await
        .unwrap();

    let response = app
        .oneshot(json_request(
            "DELETE",
            "/users",
            r#"{"codigo_barra":"123","validade_produto":"2025-06-30T00:00:00.000Z"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_delete_without_body_rejected() {
    let app = create_test_app();

    let response = app.oneshot(bare_request("DELETE", "/users")).await.unwrap();

    assert_validation_error(response, MISSING_DELETE).await;
}

#[tokio::test]
async fn test_delete_with_non_object_body_rejected() {
    let app = create_test_app();

    let response = app
        .oneshot(json_request("DELETE", "/users", "42"))
        .await
        .unwrap();

    assert_validation_error(response, MISSING_DELETE).await;
}
