// ABOUTME: Request body extractor that validates task payloads
// ABOUTME: Malformed JSON and field violations both surface as validation errors

use axum::{
    extract::{FromRequest, Request},
    Json,
};
use serde_json::Value;
use todolist_core::{
    validate_create_payload, validate_update_payload, TaskChanges, TaskCreateInput,
    ValidationError,
};

use crate::error::AppError;

/// A request body shape that can be checked against raw JSON
pub trait Payload: Sized {
    fn from_json(body: &Value) -> Result<Self, ValidationError>;
}

impl Payload for TaskCreateInput {
    fn from_json(body: &Value) -> Result<Self, ValidationError> {
        validate_create_payload(body)
    }
}

impl Payload for TaskChanges {
    fn from_json(body: &Value) -> Result<Self, ValidationError> {
        validate_update_payload(body)
    }
}

/// JSON body that has passed sanitization and field validation
#[derive(Debug)]
pub struct ValidatedJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: Payload,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(body) = Json::<Value>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::Validation(vec![rejection.body_text()]))?;

        Ok(Self(T::from_json(&body)?))
    }
}
