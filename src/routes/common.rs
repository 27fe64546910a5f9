//! Operational routes. Bodies use the same envelope as the entity API; `/ready`
//! also answers 503 so probes can rely on the status alone.

use crate::response::Envelope;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde_json::{json, Value};
use sqlx::SqlitePool;

async fn health() -> Envelope<Value> {
    Envelope::ok(json!({ "status": "ok" }))
}

async fn ready(State(pool): State<SqlitePool>) -> Response {
    match sqlx::query("SELECT 1").execute(&pool).await {
        Ok(_) => Envelope::ok(json!({ "database": "ok" })).into_response(),
        Err(e) => {
            tracing::warn!(error = %e, "readiness check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Envelope::<()>::error("database unavailable"),
            )
                .into_response()
        }
    }
}

async fn version() -> Envelope<Value> {
    Envelope::ok(json!({
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

pub fn common_routes(pool: SqlitePool) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/ready", get(ready))
        .route("/version", get(version))
        .with_state(pool)
}
