// ABOUTME: Task lifecycle logic for the todolist service
// ABOUTME: Id checks, pagination and transactional orchestration over the task store

pub mod error;
pub mod pagination;
pub mod service;

pub use error::{parse_task_id, Result, TaskError};
pub use pagination::{Paginated, PaginationMeta, PaginationParams};
pub use service::{TaskService, DELETE_CONFIRMATION};
