//! Shared helpers: in-memory app and JSON request plumbing.

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Method, Request};
use axum::Router;
use expert_admin::{app, ensure_tables, AppConfig, AppState};
use serde_json::Value;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use tower::ServiceExt;

pub const TOKEN: &str = "test-token";

/// One connection so every request sees the same in-memory database.
pub async fn memory_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory sqlite");
    ensure_tables(&pool).await.expect("tables");
    pool
}

pub fn test_config() -> AppConfig {
    AppConfig {
        api_tokens: vec![TOKEN.to_string()],
        ..AppConfig::default()
    }
}

pub async fn test_app() -> Router {
    test_app_with(test_config()).await
}

pub async fn test_app_with(config: AppConfig) -> Router {
    app(AppState::new(memory_pool().await, config))
}

pub async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> Value {
    let req = Request::builder().method(method).uri(uri);
    let req = match body {
        Some(b) => req
            .header("content-type", "application/json")
            .body(Body::from(b.to_string())),
        None => req.body(Body::empty()),
    }
    .expect("request");
    let res = app.clone().oneshot(req).await.expect("response");
    assert_eq!(res.status(), axum::http::StatusCode::OK);
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
        .await
        .expect("body");
    serde_json::from_slice(&bytes).expect("json envelope")
}

pub async fn get(app: &Router, uri: &str) -> Value {
    send(app, Method::GET, uri, None).await
}

pub async fn post(app: &Router, uri: &str, body: Value) -> Value {
    send(app, Method::POST, uri, Some(body)).await
}

pub async fn put(app: &Router, uri: &str, body: Value) -> Value {
    send(app, Method::PUT, uri, Some(body)).await
}

pub async fn delete(app: &Router, uri: &str) -> Value {
    send(app, Method::DELETE, uri, None).await
}

pub fn assert_ok(env: &Value) {
    assert_eq!(env["code"], 0, "expected success, got {}", env);
    assert_eq!(env["msg"], "");
}

pub fn assert_err(env: &Value) -> String {
    assert_eq!(env["code"], -1, "expected error, got {}", env);
    assert!(env["data"].is_null());
    env["msg"].as_str().unwrap_or_default().to_string()
}

pub fn ids(env: &Value) -> Vec<i64> {
    env["data"]
        .as_array()
        .expect("data array")
        .iter()
        .map(|r| r["id"].as_i64().expect("id"))
        .collect()
}
