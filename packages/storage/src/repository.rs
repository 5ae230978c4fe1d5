// ABOUTME: Store-access interface used by the task lifecycle logic
// ABOUTME: Separates plain connections from explicitly scoped transactions

use async_trait::async_trait;
use todolist_core::{Task, TaskChanges, TaskCreateInput};

use crate::error::Result;

/// Row-level operations against the tasks table.
///
/// Implemented both by autocommit connections and by open transactions, so
/// the same lifecycle code can run in either scope.
#[async_trait]
pub trait TaskRepository: Send {
    /// Fetch one task, `None` when no row has this id
    async fn find_by_id(&mut self, id: i64) -> Result<Option<Task>>;

    /// One page of tasks, newest first, together with the total row count
    async fn find_page(&mut self, limit: i64, offset: i64) -> Result<(Vec<Task>, i64)>;

    /// Insert a new row and return it as stored
    async fn insert(&mut self, input: &TaskCreateInput) -> Result<Task>;

    /// Apply `changes` to the row if it still carries `version`.
    ///
    /// Bumps the version and `updated_at` and returns the number of rows
    /// affected; zero means the row was missing or its version had moved on.
    async fn update(&mut self, id: i64, changes: &TaskChanges, version: i64) -> Result<u64>;

    /// Hard-delete the row backing `task`
    async fn delete(&mut self, task: &Task) -> Result<u64>;
}

/// A repository whose writes become visible only after `commit`.
///
/// Dropping a transaction without committing rolls it back.
#[async_trait]
pub trait TaskTransaction: TaskRepository {
    async fn commit(self: Box<Self>) -> Result<()>;

    async fn rollback(self: Box<Self>) -> Result<()>;
}

/// Entry point handed to the lifecycle logic
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Autocommit access for single-statement reads
    async fn connection(&self) -> Result<Box<dyn TaskRepository>>;

    /// Open a transaction for a multi-step mutation
    async fn begin(&self) -> Result<Box<dyn TaskTransaction>>;
}
