/// Maximum number of characters allowed in a task title
pub const MAX_TITLE_LENGTH: usize = 100;

/// Maximum number of characters allowed in a task description
pub const MAX_DESCRIPTION_LENGTH: usize = 500;

/// Properties accepted in task payloads; anything else is rejected
pub const TASK_FIELDS: [&str; 3] = ["title", "description", "completed"];
