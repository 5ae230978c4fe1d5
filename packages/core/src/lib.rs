// ABOUTME: Core types and input rules for the todolist service
// ABOUTME: Foundational package shared by storage, lifecycle logic and the HTTP layer

pub mod constants;
pub mod types;
pub mod validation;

// Re-export main types
pub use types::{Task, TaskChanges, TaskCreateInput, UpdateResult};

// Re-export constants
pub use constants::{MAX_DESCRIPTION_LENGTH, MAX_TITLE_LENGTH};

// Re-export validation
pub use validation::{sanitize, validate_create_payload, validate_update_payload, ValidationError};
