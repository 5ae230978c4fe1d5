// ABOUTME: Common test utilities for HTTP integration tests
// ABOUTME: Builds routers over SQLite or in-memory stores and drives them with oneshot requests

#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::Value;
use todolist_api::create_router;
use todolist_storage::{InMemoryTaskStore, SqliteTaskStore};
use todolist_tasks::TaskService;
use tower::ServiceExt;

/// Router backed by a fresh in-memory SQLite database
pub async fn sqlite_app() -> Router {
    let store = SqliteTaskStore::connect("sqlite::memory:", 1)
        .await
        .expect("Failed to create in-memory store");
    create_router(Arc::new(TaskService::new(Arc::new(store))))
}

/// Router backed by the in-memory store, returned alongside it for inspection
pub fn memory_app() -> (Router, InMemoryTaskStore) {
    let store = InMemoryTaskStore::new();
    let app = create_router(Arc::new(TaskService::new(Arc::new(store.clone()))));
    (app, store)
}

pub struct TestResponse {
    pub status: StatusCode,
    pub content_type: Option<String>,
    pub text: String,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.text).expect("response body is not JSON")
    }
}

pub async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> TestResponse {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let content_type = response
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();

    TestResponse {
        status,
        content_type,
        text: String::from_utf8(bytes.to_vec()).unwrap(),
    }
}

pub async fn get(app: &Router, uri: &str) -> TestResponse {
    send(app, Method::GET, uri, None).await
}

pub async fn post(app: &Router, uri: &str, body: Value) -> TestResponse {
    send(app, Method::POST, uri, Some(body)).await
}

pub async fn put(app: &Router, uri: &str, body: Value) -> TestResponse {
    send(app, Method::PUT, uri, Some(body)).await
}

pub async fn delete(app: &Router, uri: &str) -> TestResponse {
    send(app, Method::DELETE, uri, None).await
}

/// Create a task through the API and return its JSON
pub async fn create_task(app: &Router, title: &str) -> Value {
    let response = post(
        app,
        "/todolist",
        serde_json::json!({
            "title": title,
            "description": "Descrição válida",
            "completed": false
        }),
    )
    .await;
    assert_eq!(response.status, StatusCode::CREATED, "{}", response.text);
    response.json()
}
