// ABOUTME: Liveness endpoint for the todolist service
// ABOUTME: Reports status, timestamp and crate version without touching the store

use axum::Json;
use chrono::Utc;
use serde_json::{json, Value};

pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": Utc::now().timestamp(),
        "version": env!("CARGO_PKG_VERSION"),
        "service": "todolist"
    }))
}
