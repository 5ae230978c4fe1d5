// ABOUTME: HTTP API layer for the todolist service
// ABOUTME: Router, handlers, payload extraction and error mapping

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use todolist_tasks::TaskService;

pub mod error;
pub mod extract;
pub mod health;
pub mod tasks_handlers;

pub use error::{ApiResult, AppError};

/// Shared state handed to every handler
#[derive(Clone)]
pub struct ApiState {
    pub task_service: Arc<TaskService>,
}

/// Creates the tasks router (nested under /todolist)
pub fn create_tasks_router() -> Router<ApiState> {
    Router::new()
        .route(
            "/",
            post(tasks_handlers::create_task).get(tasks_handlers::list_tasks),
        )
        .route(
            "/{id}",
            get(tasks_handlers::get_task)
                .put(tasks_handlers::update_task)
                .delete(tasks_handlers::delete_task),
        )
        .route(
            "/changeStatusTaskAsync/{id}",
            get(tasks_handlers::toggle_task_status),
        )
}

/// Full application router with state applied
pub fn create_router(task_service: Arc<TaskService>) -> Router {
    Router::new()
        .nest("/todolist", create_tasks_router())
        .route("/health", get(health::health_check))
        .with_state(ApiState { task_service })
}
