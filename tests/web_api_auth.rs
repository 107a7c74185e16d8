//! End-to-end tests for registration, login, and logout.

mod common;

use axum::http::StatusCode;
use serde_json::{json, Value};

use common::{connect, register, register_and_connect, spawn_app, x_token};

#[tokio::test]
async fn test_register_returns_id_and_email() {
    let app = spawn_app().await;

    let response = app
        .server
        .post("/users")
        .json(&json!({ "email": "bob@x.com", "password": "pw123" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::CREATED);
    let body = response.json::<Value>();
    assert_eq!(body["email"], "bob@x.com");
    assert!(body["id"].as_i64().unwrap() > 0);
    // The password hash never leaves the server
    assert!(body.get("password").is_none());
}

#[tokio::test]
async fn test_register_duplicate_email() {
    let app = spawn_app().await;
    register(&app.server, "bob@x.com", "pw123").await;

    let response = app
        .server
        .post("/users")
        .json(&json!({ "email": "bob@x.com", "password": "other" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>(), json!({ "error": "Already exist" }));
}

#[tokio::test]
async fn test_register_missing_fields() {
    let app = spawn_app().await;

    let response = app
        .server
        .post("/users")
        .json(&json!({ "password": "pw123" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>(), json!({ "error": "Missing email" }));

    let response = app
        .server
        .post("/users")
        .json(&json!({ "email": "bob@x.com" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json::<Value>(),
        json!({ "error": "Missing password" })
    );
}

#[tokio::test]
async fn test_login_and_whoami() {
    let app = spawn_app().await;
    let created = register(&app.server, "bob@x.com", "pw123").await;
    let token = connect(&app.server, "bob@x.com", "pw123").await;

    let (name, value) = x_token(&token);
    let response = app.server.get("/users/me").add_header(name, value).await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body = response.json::<Value>();
    assert_eq!(body["id"], created["id"]);
    assert_eq!(body["email"], "bob@x.com");
}

#[tokio::test]
async fn test_login_wrong_password() {
    let app = spawn_app().await;
    register(&app.server, "bob@x.com", "pw123").await;

    let credentials =
        axum::http::HeaderValue::from_static("Basic Ym9iQHguY29tOndyb25n"); // bob@x.com:wrong
    let response = app
        .server
        .get("/connect")
        .add_header(axum::http::HeaderName::from_static("authorization"), credentials)
        .await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    assert_eq!(response.json::<Value>(), json!({ "error": "Unauthorized" }));
}

#[tokio::test]
async fn test_login_without_credentials() {
    let app = spawn_app().await;

    let response = app.server.get("/connect").await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_logout_invalidates_session() {
    let app = spawn_app().await;
    let token = register_and_connect(&app.server, "bob@x.com", "pw123").await;

    let (name, value) = x_token(&token);
    let response = app
        .server
        .get("/disconnect")
        .add_header(name.clone(), value.clone())
        .await;
    assert_eq!(response.status_code(), StatusCode::NO_CONTENT);

    // The token no longer resolves
    let response = app.server.get("/users/me").add_header(name, value).await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_logout_with_unknown_token() {
    let app = spawn_app().await;

    let (name, value) = x_token("00000000-0000-0000-0000-000000000000");
    let response = app.server.get("/disconnect").add_header(name, value).await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_concurrent_sessions_for_one_user() {
    let app = spawn_app().await;
    register(&app.server, "bob@x.com", "pw123").await;

    let first = connect(&app.server, "bob@x.com", "pw123").await;
    let second = connect(&app.server, "bob@x.com", "pw123").await;
    assert_ne!(first, second);

    // Revoking one leaves the other valid
    let (name, value) = x_token(&first);
    app.server.get("/disconnect").add_header(name, value).await;

    let (name, value) = x_token(&second);
    let response = app.server.get("/users/me").add_header(name, value).await;
    assert_eq!(response.status_code(), StatusCode::OK);
}

#[tokio::test]
async fn test_status_endpoint() {
    let app = spawn_app().await;

    let response = app.server.get("/status").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json::<Value>(), json!({ "redis": true, "db": true }));
}

#[tokio::test]
async fn test_stats_endpoint() {
    let app = spawn_app().await;

    let response = app.server.get("/stats").await;
    assert_eq!(response.json::<Value>(), json!({ "users": 0, "files": 0 }));

    register(&app.server, "bob@x.com", "pw123").await;
    let response = app.server.get("/stats").await;
    assert_eq!(response.json::<Value>(), json!({ "users": 1, "files": 0 }));
}
