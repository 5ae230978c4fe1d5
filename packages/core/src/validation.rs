// ABOUTME: Payload validation and sanitization for task inputs
// ABOUTME: Strips markup, enforces field types and length limits, rejects unknown properties

use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::constants::{MAX_DESCRIPTION_LENGTH, MAX_TITLE_LENGTH, TASK_FIELDS};
use crate::types::{TaskChanges, TaskCreateInput};

static MARKUP_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("markup pattern is valid"));

/// A tag opener left without its closing `>`, through to the end of input
static UNCLOSED_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[A-Za-z/!?][^>]*$").expect("unclosed tag pattern is valid"));

/// All field-level problems found in one payload
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Validation failed: {}", .messages.join("; "))]
pub struct ValidationError {
    pub messages: Vec<String>,
}

impl ValidationError {
    pub fn new(messages: Vec<String>) -> Self {
        Self { messages }
    }

    pub fn single(message: impl Into<String>) -> Self {
        Self {
            messages: vec![message.into()],
        }
    }
}

/// Rules and user-facing messages for one string field
struct TextRule {
    field: &'static str,
    max_length: usize,
    not_a_string: &'static str,
    empty: &'static str,
    too_long: &'static str,
}

const TITLE_RULE: TextRule = TextRule {
    field: "title",
    max_length: MAX_TITLE_LENGTH,
    not_a_string: "O título deve ser uma string.",
    empty: "O título não pode estar vazio.",
    too_long: "O título não pode ter mais de 100 caracteres.",
};

const DESCRIPTION_RULE: TextRule = TextRule {
    field: "description",
    max_length: MAX_DESCRIPTION_LENGTH,
    not_a_string: "A descrição deve ser uma string.",
    empty: "A descrição não pode estar vazia.",
    too_long: "A descrição não pode ter mais de 500 caracteres.",
};

const COMPLETED_NOT_BOOLEAN: &str = "the completed should to be a boolean";

/// Remove markup tags and null bytes, then trim surrounding whitespace
pub fn sanitize(input: &str) -> String {
    let stripped = MARKUP_TAG.replace_all(input, "");
    let stripped = UNCLOSED_TAG.replace_all(&stripped, "");
    stripped.replace('\0', "").trim().to_string()
}

/// Validate a create payload. Every field is required.
pub fn validate_create_payload(body: &Value) -> Result<TaskCreateInput, ValidationError> {
    let map = as_object(body)?;
    let mut messages = unknown_properties(map);

    let title = check_text(map.get(TITLE_RULE.field), &TITLE_RULE, true, &mut messages);
    let description = check_text(
        map.get(DESCRIPTION_RULE.field),
        &DESCRIPTION_RULE,
        true,
        &mut messages,
    );
    let completed = check_completed(map.get("completed"), true, &mut messages);

    match (title, description, completed) {
        (Some(title), Some(description), Some(completed)) if messages.is_empty() => {
            Ok(TaskCreateInput {
                title,
                description,
                completed,
            })
        }
        _ => Err(ValidationError::new(messages)),
    }
}

/// Validate an update payload. Fields are optional; `null` counts as absent.
pub fn validate_update_payload(body: &Value) -> Result<TaskChanges, ValidationError> {
    let map = as_object(body)?;
    let mut messages = unknown_properties(map);

    let changes = TaskChanges {
        title: check_text(map.get(TITLE_RULE.field), &TITLE_RULE, false, &mut messages),
        description: check_text(
            map.get(DESCRIPTION_RULE.field),
            &DESCRIPTION_RULE,
            false,
            &mut messages,
        ),
        completed: check_completed(map.get("completed"), false, &mut messages),
    };

    if messages.is_empty() {
        Ok(changes)
    } else {
        Err(ValidationError::new(messages))
    }
}

fn as_object(body: &Value) -> Result<&Map<String, Value>, ValidationError> {
    body.as_object()
        .ok_or_else(|| ValidationError::single("request body must be a JSON object"))
}

fn unknown_properties(map: &Map<String, Value>) -> Vec<String> {
    map.keys()
        .filter(|key| !TASK_FIELDS.contains(&key.as_str()))
        .map(|key| format!("property {} should not exist", key))
        .collect()
}

fn check_text(
    value: Option<&Value>,
    rule: &TextRule,
    required: bool,
    messages: &mut Vec<String>,
) -> Option<String> {
    match value {
        None | Some(Value::Null) if !required => None,
        None | Some(Value::Null) => {
            messages.push(rule.not_a_string.to_string());
            messages.push(rule.empty.to_string());
            None
        }
        Some(Value::String(raw)) => {
            let cleaned = sanitize(raw);
            if cleaned.is_empty() {
                messages.push(rule.empty.to_string());
                return None;
            }
            if cleaned.chars().count() > rule.max_length {
                messages.push(rule.too_long.to_string());
                return None;
            }
            Some(cleaned)
        }
        Some(_) => {
            messages.push(rule.not_a_string.to_string());
            None
        }
    }
}

fn check_completed(
    value: Option<&Value>,
    required: bool,
    messages: &mut Vec<String>,
) -> Option<bool> {
    match value {
        Some(Value::Bool(flag)) => Some(*flag),
        None | Some(Value::Null) if !required => None,
        _ => {
            messages.push(COMPLETED_NOT_BOOLEAN.to_string());
            None
        }
    }
}
