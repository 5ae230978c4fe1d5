// ABOUTME: Task storage layer using SQLite
// ABOUTME: Maps task rows to domain tasks and implements the store-access traits over sqlx

use std::ops::DerefMut;
use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{
    SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
};
use sqlx::{Sqlite, SqliteConnection, SqlitePool, Transaction};
use todolist_core::{Task, TaskChanges, TaskCreateInput};
use tracing::{debug, info};

use crate::error::{Result, StorageError};
use crate::repository::{TaskRepository, TaskStore, TaskTransaction};

const SELECT_TASK_BY_ID: &str = r#"
    SELECT id, title, description, completed, version, created_at, updated_at
    FROM tasks
    WHERE id = ?
"#;

const SELECT_TASK_PAGE: &str = r#"
    SELECT id, title, description, completed, version, created_at, updated_at
    FROM tasks
    ORDER BY created_at DESC, id DESC
    LIMIT ? OFFSET ?
"#;

/// How long a writer waits for the database lock before failing
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Mutations read then write, so they take the write lock up front and queue
/// on the busy timeout instead of failing the read-to-write upgrade.
const BEGIN_MUTATION: &str = "BEGIN IMMEDIATE";

/// Row representation of the `tasks` table
#[derive(Debug, sqlx::FromRow)]
struct TaskRow {
    id: i64,
    title: String,
    description: String,
    completed: bool,
    version: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<TaskRow> for Task {
    fn from(row: TaskRow) -> Self {
        Task {
            id: row.id,
            title: row.title,
            description: row.description,
            completed: row.completed,
            version: row.version,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Clone)]
pub struct SqliteTaskStore {
    pool: SqlitePool,
}

impl SqliteTaskStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Open a pool for `database_url` and bring the schema up to date
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self> {
        info!("Connecting to database: {}", database_url);

        let options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .foreign_keys(true)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(BUSY_TIMEOUT);

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;

        info!("Database connection established");

        sqlx::migrate!("./migrations").run(&pool).await?;

        debug!("Database migrations completed");

        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl TaskStore for SqliteTaskStore {
    async fn connection(&self) -> Result<Box<dyn TaskRepository>> {
        let conn = self.pool.acquire().await?;
        Ok(Box::new(SqliteSession { conn }))
    }

    async fn begin(&self) -> Result<Box<dyn TaskTransaction>> {
        let tx = self.pool.begin_with(BEGIN_MUTATION).await?;
        Ok(Box::new(SqliteSession { conn: tx }))
    }
}

/// A pooled connection or an open transaction, both deref to a raw connection
struct SqliteSession<C> {
    conn: C,
}

#[async_trait]
impl<C> TaskRepository for SqliteSession<C>
where
    C: DerefMut<Target = SqliteConnection> + Send,
{
    async fn find_by_id(&mut self, id: i64) -> Result<Option<Task>> {
        find_by_id(&mut self.conn, id).await
    }

    async fn find_page(&mut self, limit: i64, offset: i64) -> Result<(Vec<Task>, i64)> {
        find_page(&mut self.conn, limit, offset).await
    }

    async fn insert(&mut self, input: &TaskCreateInput) -> Result<Task> {
        insert(&mut self.conn, input).await
    }

    async fn update(&mut self, id: i64, changes: &TaskChanges, version: i64) -> Result<u64> {
        update(&mut self.conn, id, changes, version).await
    }

    async fn delete(&mut self, task: &Task) -> Result<u64> {
        delete(&mut self.conn, task).await
    }
}

#[async_trait]
impl TaskTransaction for SqliteSession<Transaction<'static, Sqlite>> {
    async fn commit(self: Box<Self>) -> Result<()> {
        let session = *self;
        session.conn.commit().await.map_err(StorageError::Sqlx)
    }

    async fn rollback(self: Box<Self>) -> Result<()> {
        let session = *self;
        session.conn.rollback().await.map_err(StorageError::Sqlx)
    }
}

async fn find_by_id(conn: &mut SqliteConnection, id: i64) -> Result<Option<Task>> {
    debug!("Fetching task: {}", id);

    let row = sqlx::query_as::<_, TaskRow>(SELECT_TASK_BY_ID)
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

    Ok(row.map(Task::from))
}

async fn find_page(
    conn: &mut SqliteConnection,
    limit: i64,
    offset: i64,
) -> Result<(Vec<Task>, i64)> {
    debug!("Fetching tasks (limit: {}, offset: {})", limit, offset);

    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tasks")
        .fetch_one(&mut *conn)
        .await?;

    let rows = sqlx::query_as::<_, TaskRow>(SELECT_TASK_PAGE)
        .bind(limit)
        .bind(offset)
        .fetch_all(&mut *conn)
        .await?;

    Ok((rows.into_iter().map(Task::from).collect(), total))
}

async fn insert(conn: &mut SqliteConnection, input: &TaskCreateInput) -> Result<Task> {
    let now = Utc::now();

    let result = sqlx::query(
        r#"
        INSERT INTO tasks (title, description, completed, version, created_at, updated_at)
        VALUES (?, ?, ?, 0, ?, ?)
        "#,
    )
    .bind(&input.title)
    .bind(&input.description)
    .bind(input.completed)
    .bind(now)
    .bind(now)
    .execute(&mut *conn)
    .await?;

    let id = result.last_insert_rowid();
    debug!("Created task: {}", id);

    let row = sqlx::query_as::<_, TaskRow>(SELECT_TASK_BY_ID)
        .bind(id)
        .fetch_one(&mut *conn)
        .await?;

    Ok(row.into())
}

async fn update(
    conn: &mut SqliteConnection,
    id: i64,
    changes: &TaskChanges,
    version: i64,
) -> Result<u64> {
    debug!("Updating task: {} at version {}", id, version);

    // Build dynamic UPDATE query based on provided fields
    let mut query = String::from("UPDATE tasks SET version = version + 1, updated_at = ?");

    if changes.title.is_some() {
        query.push_str(", title = ?");
    }
    if changes.description.is_some() {
        query.push_str(", description = ?");
    }
    if changes.completed.is_some() {
        query.push_str(", completed = ?");
    }

    query.push_str(" WHERE id = ? AND version = ?");

    let mut q = sqlx::query(&query).bind(Utc::now());

    if let Some(title) = &changes.title {
        q = q.bind(title);
    }
    if let Some(description) = &changes.description {
        q = q.bind(description);
    }
    if let Some(completed) = changes.completed {
        q = q.bind(completed);
    }

    let result = q.bind(id).bind(version).execute(&mut *conn).await?;

    Ok(result.rows_affected())
}

async fn delete(conn: &mut SqliteConnection, task: &Task) -> Result<u64> {
    debug!("Deleting task: {}", task.id);

    let result = sqlx::query("DELETE FROM tasks WHERE id = ?")
        .bind(task.id)
        .execute(&mut *conn)
        .await?;

    Ok(result.rows_affected())
}
