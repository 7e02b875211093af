// HTTP API Error Types
use std::any::Any;

use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use crate::auth::AuthError;
use crate::database::DatabaseError;

/// HTTP API error with appropriate status codes and client-friendly messages.
///
/// The default response body is the envelope used by the contact/message
/// routes: `{"success": false, "message": ...}`. Routes that answer with a
/// bare `{"error": ...}` body wrap the error in [`PlainError`].
#[derive(Debug)]
pub enum ApiError {
    // 400 Bad Request
    BadRequest(String),

    // 401 Unauthorized
    Unauthorized(String),

    // 403 Forbidden
    Forbidden(String),

    // 404 Not Found
    NotFound(String),

    // 413 Payload Too Large
    PayloadTooLarge(String),

    // 500 Internal Server Error, storage layer
    Storage { message: String, detail: String },

    // 500 Internal Server Error
    InternalServerError(String),
}

/// Server-side error detail carried on the response for the development-mode
/// middleware. `field` names the body key the detail is written under.
#[derive(Debug, Clone)]
pub struct ErrorDetail {
    pub field: &'static str,
    pub detail: String,
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Storage { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get client-safe error message
    pub fn message(&self) -> &str {
        match self {
            ApiError::BadRequest(msg) => msg,
            ApiError::Unauthorized(msg) => msg,
            ApiError::Forbidden(msg) => msg,
            ApiError::NotFound(msg) => msg,
            ApiError::PayloadTooLarge(msg) => msg,
            ApiError::Storage { message, .. } => message,
            ApiError::InternalServerError(msg) => msg,
        }
    }

    pub fn detail(&self) -> Option<&str> {
        match self {
            ApiError::Storage { detail, .. } => Some(detail),
            _ => None,
        }
    }

    /// `{"success": false, "message": ...}`
    pub fn to_json(&self) -> Value {
        json!({
            "success": false,
            "message": self.message(),
        })
    }

    /// `{"error": ...}`
    pub fn to_plain_json(&self) -> Value {
        json!({ "error": self.message() })
    }

    fn respond(self, body: Value, detail_field: &'static str) -> axum::response::Response {
        let mut response = (self.status_code(), Json(body)).into_response();
        if let Some(detail) = self.detail() {
            response.extensions_mut().insert(ErrorDetail {
                field: detail_field,
                detail: detail.to_string(),
            });
        }
        response
    }
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::Unauthorized(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        ApiError::Forbidden(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn payload_too_large(message: impl Into<String>) -> Self {
        ApiError::PayloadTooLarge(message.into())
    }

    pub fn internal_server_error(message: impl Into<String>) -> Self {
        ApiError::InternalServerError(message.into())
    }

    /// Log the storage failure and keep its detail off the default response.
    pub fn storage(message: impl Into<String>, err: &DatabaseError) -> Self {
        let message = message.into();
        tracing::error!("{}: {}", message, err);
        ApiError::Storage {
            message,
            detail: err.to_string(),
        }
    }
}

/// Attach a route-specific client message to storage failures.
pub trait StorageContext<T> {
    fn or_storage(self, message: &str) -> Result<T, ApiError>;
}

impl<T> StorageContext<T> for Result<T, DatabaseError> {
    fn or_storage(self, message: &str) -> Result<T, ApiError> {
        self.map_err(|err| match err {
            DatabaseError::NotFound(what) => ApiError::NotFound(what),
            other => ApiError::storage(message, &other),
        })
    }
}

impl From<DatabaseError> for ApiError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::NotFound(what) => ApiError::NotFound(what),
            other => ApiError::storage("Database error occurred", &other),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::MissingToken | AuthError::InvalidCredentials => {
                ApiError::unauthorized(err.to_string())
            }
            AuthError::InvalidToken => ApiError::forbidden(err.to_string()),
            AuthError::Signing(_) | AuthError::PasswordHash(_) => {
                tracing::error!("Authentication failure: {}", err);
                ApiError::internal_server_error("Internal server error")
            }
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let body = self.to_json();
        self.respond(body, "error")
    }
}

/// An [`ApiError`] rendered as `{"error": ...}` for the project, admin and
/// upload routes.
#[derive(Debug)]
pub struct PlainError(pub ApiError);

impl From<ApiError> for PlainError {
    fn from(err: ApiError) -> Self {
        PlainError(err)
    }
}

impl From<DatabaseError> for PlainError {
    fn from(err: DatabaseError) -> Self {
        PlainError(err.into())
    }
}

impl From<AuthError> for PlainError {
    fn from(err: AuthError) -> Self {
        PlainError(err.into())
    }
}

impl IntoResponse for PlainError {
    fn into_response(self) -> axum::response::Response {
        let body = self.0.to_plain_json();
        self.0.respond(body, "message")
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
pub type PlainResult<T> = Result<T, PlainError>;

/// Last-resort response for a panicking handler.
pub fn handle_panic(err: Box<dyn Any + Send + 'static>) -> axum::response::Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };
    tracing::error!("Unhandled error: {}", detail);

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": "Internal server error" })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_and_plain_shapes() {
        let err = ApiError::not_found("Message not found");
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            err.to_json(),
            json!({ "success": false, "message": "Message not found" })
        );
        assert_eq!(err.to_plain_json(), json!({ "error": "Message not found" }));
    }

    #[test]
    fn auth_errors_map_to_401_and_403() {
        assert_eq!(
            ApiError::from(AuthError::MissingToken).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::from(AuthError::InvalidCredentials).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::from(AuthError::InvalidToken).status_code(),
            StatusCode::FORBIDDEN
        );
    }

    #[test]
    fn storage_detail_rides_on_extensions_only() {
        let err = ApiError::storage("Failed to fetch projects", &DatabaseError::PoolTimedOut);
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);

        let response = PlainError(err).into_response();
        let detail = response
            .extensions()
            .get::<ErrorDetail>()
            .cloned()
            .expect("detail extension");
        assert_eq!(detail.field, "message");
        assert!(detail.detail.contains("connection"));
    }

    #[test]
    fn missing_rows_are_404_not_storage_failures() {
        let result: Result<(), DatabaseError> =
            Err(DatabaseError::NotFound("Project not found".to_string()));
        let err = result.or_storage("Failed to fetch project").unwrap_err();
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(err.message(), "Project not found");
    }

    #[test]
    fn panic_payload_becomes_generic_500() {
        let response = handle_panic(Box::new("boom"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
