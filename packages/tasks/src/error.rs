use thiserror::Error;
use todolist_storage::StorageError;

const INVALID_ID_MESSAGE: &str = "ID must be a positive number";
const NOT_FOUND_MESSAGE: &str = "Task not found";

#[derive(Error, Debug)]
pub enum TaskError {
    #[error("{0}")]
    InvalidArgument(String),

    #[error("{0}")]
    NotFound(String),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl TaskError {
    pub fn invalid_id() -> Self {
        TaskError::InvalidArgument(INVALID_ID_MESSAGE.to_string())
    }

    pub fn not_found() -> Self {
        TaskError::NotFound(NOT_FOUND_MESSAGE.to_string())
    }
}

pub type Result<T> = std::result::Result<T, TaskError>;

/// Parse a raw path segment into a task id.
///
/// Anything that is not a plain integer, or is zero or negative, is an
/// invalid argument. Integers too large for `i64` are accepted as ids that
/// cannot exist, so they surface as not found.
pub fn parse_task_id(raw: &str) -> Result<i64> {
    let trimmed = raw.trim();
    let digits = trimmed.strip_prefix('+').unwrap_or(trimmed);

    if digits.is_empty() {
        return Err(TaskError::invalid_id());
    }

    if digits.bytes().all(|b| b.is_ascii_digit()) {
        return match digits.parse::<i64>() {
            Ok(0) => Err(TaskError::invalid_id()),
            Ok(id) => Ok(id),
            Err(_) => Ok(i64::MAX),
        };
    }

    Err(TaskError::invalid_id())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("1", 1)]
    #[case("42", 42)]
    #[case(" 7 ", 7)]
    #[case("+3", 3)]
    #[case("9999999999999999", 9_999_999_999_999_999)]
    #[case("99999999999999999999999", i64::MAX)]
    fn test_parse_valid_ids(#[case] raw: &str, #[case] expected: i64) {
        assert_eq!(parse_task_id(raw).unwrap(), expected);
    }

    #[rstest]
    #[case("0")]
    #[case("-1")]
    #[case("NaN")]
    #[case("abc")]
    #[case("1.5")]
    #[case("")]
    #[case("+")]
    fn test_parse_invalid_ids(#[case] raw: &str) {
        let err = parse_task_id(raw).unwrap_err();
        assert!(matches!(err, TaskError::InvalidArgument(ref msg) if msg == INVALID_ID_MESSAGE));
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(TaskError::invalid_id().to_string(), "ID must be a positive number");
        assert_eq!(TaskError::not_found().to_string(), "Task not found");
    }
}
