//! Explicit binding of JSON request bodies into typed payloads.
//!
//! Bodies are parsed into a [`serde_json::Value`] and checked field by field
//! against a [`Schema`]. A required string must be present, non-null and
//! non-empty. Unknown fields are ignored and the `Content-Type` header is not
//! inspected.

use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::warn;
use utoipa::ToSchema;

use super::handlers::Resource;
use crate::error::BindError;
use crate::metrics;

/// A payload that can be validated out of a JSON object.
pub trait Schema: Sized {
    /// Resource the payload belongs to.
    const RESOURCE: Resource;

    /// Build the payload from an already-parsed JSON object.
    fn from_object(object: &Map<String, Value>) -> Result<Self, BindError>;
}

/// Bind raw body bytes into `T`.
pub fn bind<T: Schema>(body: &[u8]) -> Result<T, BindError> {
    let value: Value = serde_json::from_slice(body)?;
    match value {
        Value::Object(object) => T::from_object(&object),
        other => Err(BindError::NotAnObject {
            found: json_kind(&other),
        }),
    }
}

/// Read a required, non-empty string field.
pub fn required_str(object: &Map<String, Value>, field: &'static str) -> Result<String, BindError> {
    match object.get(field) {
        None | Some(Value::Null) => Err(BindError::MissingField { field }),
        Some(Value::String(s)) if s.is_empty() => Err(BindError::EmptyField { field }),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(other) => Err(BindError::WrongType {
            field,
            expected: "string",
            found: json_kind(other),
        }),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Extractor yielding a validated payload, or rejecting with 400.
#[derive(Debug, Clone)]
pub struct Validated<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for Validated<T>
where
    S: Send + Sync,
    T: Schema + Send,
{
    type Rejection = Rejected;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let result = match Bytes::from_request(req, state).await {
            Ok(body) => bind::<T>(&body),
            Err(e) => Err(BindError::Body(e.body_text())),
        };

        result.map(Validated).map_err(|error| {
            warn!(resource = %T::RESOURCE, %error, "rejected payload");
            metrics::record_rejected(T::RESOURCE);
            Rejected(error)
        })
    }
}

/// Rejection produced by [`Validated`].
#[derive(Debug)]
pub struct Rejected(pub BindError);

/// Error body returned for a rejected payload.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Why the payload was rejected.
    #[schema(example = "missing required field `health`")]
    pub error: String,
}

impl IntoResponse for Rejected {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: self.0.to_string(),
        };
        (StatusCode::BAD_REQUEST, Json(body)).into_response()
    }
}
