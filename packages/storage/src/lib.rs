// ABOUTME: Data layer for the todolist service
// ABOUTME: Store-access traits, the SQLite backend and an in-memory backend for tests

pub mod error;
pub mod repository;
pub mod sqlite;

#[cfg(any(test, feature = "test-utils"))]
pub mod memory;

pub use error::{Result, StorageError};
pub use repository::{TaskRepository, TaskStore, TaskTransaction};
pub use sqlite::SqliteTaskStore;

#[cfg(any(test, feature = "test-utils"))]
pub use memory::InMemoryTaskStore;
