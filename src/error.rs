// src/error.rs

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::fmt;

/// The kinds of entity an operation can fail to resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Quiz,
    Question,
    AnswerOption,
    Attempt,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntityKind::Quiz => "Quiz",
            EntityKind::Question => "Question",
            EntityKind::AnswerOption => "AnswerOption",
            EntityKind::Attempt => "Attempt",
        };
        f.write_str(name)
    }
}

/// Global Application Error Enum.
/// Centralizes error handling and mapping to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    // 500 Internal Server Error
    InternalServerError(String),

    // 400 Bad Request (missing or malformed identifiers in the request)
    BadRequest(String),

    // 404 Not Found
    NotFound(EntityKind, i64),

    // 409 Conflict (e.g., attempt on an unpublished quiz)
    InvalidState(String),

    // 400 Bad Request (cross-entity reference mismatch)
    ConsistencyViolation(String),

    // 409 Conflict (store detected a concurrent write)
    Conflict(String),
}

impl AppError {
    pub fn is_conflict(&self) -> bool {
        matches!(self, AppError::Conflict(_))
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::InternalServerError(msg) => write!(f, "internal error: {}", msg),
            AppError::BadRequest(msg) => write!(f, "validation error: {}", msg),
            AppError::NotFound(kind, id) => write!(f, "{} with id {} not found", kind, id),
            AppError::InvalidState(msg) => write!(f, "invalid state: {}", msg),
            AppError::ConsistencyViolation(msg) => write!(f, "consistency violation: {}", msg),
            AppError::Conflict(msg) => write!(f, "write conflict: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

/// Implements `IntoResponse` for `AppError`.
/// Converts the error into a JSON response with appropriate HTTP status code.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let message = self.to_string();
        let (status, error_message) = match self {
            AppError::InternalServerError(msg) => {
                tracing::error!("Internal Server Error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
            }
            AppError::BadRequest(_) => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound(_, _) => (StatusCode::NOT_FOUND, message),
            AppError::InvalidState(_) => (StatusCode::CONFLICT, message),
            AppError::ConsistencyViolation(_) => (StatusCode::BAD_REQUEST, message),
            AppError::Conflict(msg) => {
                tracing::warn!("Write conflict surfaced to client: {}", msg);
                (StatusCode::CONFLICT, message)
            }
        };
        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

/// Converts `sqlx::Error` into `AppError`.
/// Serialization failures and deadlocks become `Conflict` so the write retry can pick them up.
/// Allows using `?` operator on database queries.
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if matches!(db_err.code().as_deref(), Some("40001") | Some("40P01")) {
                return AppError::Conflict(db_err.message().to_string());
            }
        }
        AppError::InternalServerError(err.to_string())
    }
}
