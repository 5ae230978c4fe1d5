// ABOUTME: HTTP request handlers for todolist operations
// ABOUTME: Parses ids and query values, then delegates to the task service

use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    http::StatusCode,
    Json,
};
use todolist_core::{Task, TaskChanges, TaskCreateInput, UpdateResult};
use todolist_tasks::{parse_task_id, Paginated, PaginationParams};
use tracing::info;

use crate::error::{ApiResult, AppError};
use crate::extract::ValidatedJson;
use crate::ApiState;

/// Create a new task
pub async fn create_task(
    State(state): State<ApiState>,
    ValidatedJson(input): ValidatedJson<TaskCreateInput>,
) -> ApiResult<(StatusCode, Json<Task>)> {
    info!("Creating task: {}", input.title);

    let task = state.task_service.create(input).await?;
    Ok((StatusCode::CREATED, Json(task)))
}

/// List tasks, newest first
pub async fn list_tasks(
    State(state): State<ApiState>,
    query: Result<Query<PaginationParams>, QueryRejection>,
) -> ApiResult<Json<Paginated<Task>>> {
    let Query(pagination) =
        query.map_err(|rejection| AppError::InvalidArgument(rejection.body_text()))?;

    info!(
        "Listing tasks (page: {}, limit: {})",
        pagination.page(),
        pagination.limit()
    );

    let page = state.task_service.list(pagination).await?;
    Ok(Json(page))
}

/// Get a single task by ID
pub async fn get_task(
    State(state): State<ApiState>,
    Path(raw_id): Path<String>,
) -> ApiResult<Json<Task>> {
    info!("Getting task: {}", raw_id);

    let id = parse_task_id(&raw_id)?;
    let task = state.task_service.get_by_id(id).await?;
    Ok(Json(task))
}

/// Update an existing task
pub async fn update_task(
    State(state): State<ApiState>,
    Path(raw_id): Path<String>,
    ValidatedJson(changes): ValidatedJson<TaskChanges>,
) -> ApiResult<Json<UpdateResult>> {
    info!("Updating task: {}", raw_id);

    let id = parse_task_id(&raw_id)?;
    let result = state.task_service.update(id, changes).await?;
    Ok(Json(result))
}

/// Delete a task
pub async fn delete_task(
    State(state): State<ApiState>,
    Path(raw_id): Path<String>,
) -> ApiResult<&'static str> {
    info!("Deleting task: {}", raw_id);

    let id = parse_task_id(&raw_id)?;
    let message = state.task_service.remove(id).await?;
    Ok(message)
}

/// Flip the completed flag of a task
pub async fn toggle_task_status(
    State(state): State<ApiState>,
    Path(raw_id): Path<String>,
) -> ApiResult<Json<UpdateResult>> {
    info!("Toggling status of task: {}", raw_id);

    let id = parse_task_id(&raw_id)?;
    let result = state.task_service.toggle_status(id).await?;
    Ok(Json(result))
}
