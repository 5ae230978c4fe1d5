// ABOUTME: Task lifecycle operations over an injected task store
// ABOUTME: Every mutation runs inside one store transaction that commits or rolls back as a unit

use std::sync::Arc;

use todolist_core::{Task, TaskChanges, TaskCreateInput, UpdateResult};
use todolist_storage::{TaskRepository, TaskStore, TaskTransaction};
use tracing::{debug, info, warn};

use crate::error::{Result, TaskError};
use crate::pagination::{Paginated, PaginationParams};

/// Body returned by a successful remove
pub const DELETE_CONFIRMATION: &str = "Task deleted with success!";

pub struct TaskService {
    store: Arc<dyn TaskStore>,
}

impl TaskService {
    pub fn new(store: Arc<dyn TaskStore>) -> Self {
        Self { store }
    }

    pub async fn create(&self, input: TaskCreateInput) -> Result<Task> {
        let mut tx = self.store.begin().await?;
        let result = tx.insert(&input).await.map_err(TaskError::from);
        let task = finish(tx, result).await?;

        info!(task_id = task.id, "Task created");
        Ok(task)
    }

    /// Fetch one task. Non-positive ids are rejected before the store is touched.
    pub async fn get_by_id(&self, id: i64) -> Result<Task> {
        ensure_positive(id)?;
        let mut conn = self.store.connection().await?;
        fetch(&mut *conn, id).await
    }

    pub async fn list(&self, params: PaginationParams) -> Result<Paginated<Task>> {
        let (limit, offset) = params.validate();
        let mut conn = self.store.connection().await?;
        let (items, total) = conn.find_page(limit, offset).await?;

        debug!(
            page = params.page(),
            limit,
            returned = items.len(),
            total,
            "Listed tasks"
        );
        Ok(Paginated::new(items, &params, total))
    }

    /// Apply `changes` stamped with the version observed inside the same
    /// transaction. A concurrent write in between yields `affected: 0`.
    pub async fn update(&self, id: i64, changes: TaskChanges) -> Result<UpdateResult> {
        ensure_positive(id)?;
        let mut tx = self.store.begin().await?;
        let result = apply_update(&mut *tx, id, &changes).await;
        finish(tx, result).await
    }

    pub async fn remove(&self, id: i64) -> Result<&'static str> {
        ensure_positive(id)?;
        let mut tx = self.store.begin().await?;
        let result = remove_in(&mut *tx, id).await;
        finish(tx, result).await?;

        info!(task_id = id, "Task deleted");
        Ok(DELETE_CONFIRMATION)
    }

    /// Flip `completed`, then run the regular update path with the whole task
    /// as the change set.
    pub async fn toggle_status(&self, id: i64) -> Result<UpdateResult> {
        ensure_positive(id)?;
        let mut tx = self.store.begin().await?;
        let result = toggle_in(&mut *tx, id).await;
        finish(tx, result).await
    }
}

fn ensure_positive(id: i64) -> Result<()> {
    if id <= 0 {
        return Err(TaskError::invalid_id());
    }
    Ok(())
}

async fn fetch<R>(repo: &mut R, id: i64) -> Result<Task>
where
    R: TaskRepository + ?Sized,
{
    ensure_positive(id)?;
    repo.find_by_id(id).await?.ok_or_else(TaskError::not_found)
}

async fn apply_update<R>(repo: &mut R, id: i64, changes: &TaskChanges) -> Result<UpdateResult>
where
    R: TaskRepository + ?Sized,
{
    let task = fetch(&mut *repo, id).await?;
    let affected = repo.update(task.id, changes, task.version).await?;

    if affected == 0 {
        warn!(
            task_id = task.id,
            version = task.version,
            "Task changed between read and write, nothing updated"
        );
    } else {
        info!(task_id = task.id, version = task.version + 1, "Task updated");
    }

    Ok(UpdateResult { affected })
}

async fn remove_in<R>(repo: &mut R, id: i64) -> Result<()>
where
    R: TaskRepository + ?Sized,
{
    let task = fetch(&mut *repo, id).await?;
    repo.delete(&task).await?;
    Ok(())
}

async fn toggle_in<R>(repo: &mut R, id: i64) -> Result<UpdateResult>
where
    R: TaskRepository + ?Sized,
{
    let mut task = fetch(&mut *repo, id).await?;
    task.completed = !task.completed;

    apply_update(repo, id, &TaskChanges::from(&task)).await
}

/// Commit on success, roll back on failure. The original error wins over a
/// rollback failure.
async fn finish<T>(tx: Box<dyn TaskTransaction>, result: Result<T>) -> Result<T> {
    match result {
        Ok(value) => {
            tx.commit().await?;
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) = tx.rollback().await {
                warn!(error = %rollback_err, "Failed to roll back task transaction");
            }
            Err(err)
        }
    }
}
