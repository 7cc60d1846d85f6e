//! API error handling for the VIDHUB Web API.
//!
//! This is the single boundary layer that converts error kinds into the
//! wire envelope `{success, message, data, errors}`; handlers never build
//! status codes themselves.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// API error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Bad request / validation failure (400).
    BadRequest,
    /// Unauthorized (401).
    Unauthorized,
    /// Not found (404).
    NotFound,
    /// Conflict (409).
    Conflict,
    /// Internal server error (500).
    InternalError,
}

impl ErrorCode {
    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ErrorCode::BadRequest => StatusCode::BAD_REQUEST,
            ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::Conflict => StatusCode::CONFLICT,
            ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Error response body in the common envelope shape.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Always false for errors.
    pub success: bool,
    /// Human-readable message.
    pub message: String,
    /// Always null for errors.
    pub data: Option<()>,
    /// Field-level detail messages, if any.
    pub errors: Vec<String>,
}

/// API error type.
#[derive(Debug)]
pub struct ApiError {
    code: ErrorCode,
    message: String,
    errors: Vec<String>,
}

impl ApiError {
    /// Create a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            errors: Vec::new(),
        }
    }

    /// Create a bad request error.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::BadRequest, message)
    }

    /// Create an unauthorized error.
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Unauthorized, message)
    }

    /// Create a not found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }

    /// Create a conflict error.
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Conflict, message)
    }

    /// Create an internal server error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    /// Create a validation error from validator::ValidationErrors with
    /// field-level messages.
    pub fn from_validation_errors(errors: validator::ValidationErrors) -> Self {
        let mut details = Vec::new();

        for (field, field_errors) in errors.field_errors() {
            for e in field_errors {
                let message = e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("invalid value for {field}"));
                details.push(format!("{field}: {message}"));
            }
        }
        details.sort();

        Self {
            code: ErrorCode::BadRequest,
            message: "Validation failed".to_string(),
            errors: details,
        }
    }

    /// Error code, for tests.
    pub fn code(&self) -> ErrorCode {
        self.code
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.code.status_code();
        let body = ErrorBody {
            success: false,
            message: self.message,
            data: None,
            errors: self.errors,
        };
        (status, Json(body)).into_response()
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

impl From<crate::VidhubError> for ApiError {
    fn from(err: crate::VidhubError) -> Self {
        match &err {
            crate::VidhubError::Auth(msg) => ApiError::unauthorized(msg.clone()),
            crate::VidhubError::Validation(msg) => ApiError::bad_request(msg.clone()),
            crate::VidhubError::Conflict(msg) => ApiError::conflict(msg.clone()),
            crate::VidhubError::NotFound(msg) => ApiError::not_found(format!("{msg} not found")),
            _ => {
                // Cause stays in server-side diagnostics only
                tracing::error!("internal error: {}", err);
                ApiError::internal("An internal error occurred")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::VidhubError;

    #[test]
    fn test_error_code_status() {
        assert_eq!(ErrorCode::BadRequest.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ErrorCode::Unauthorized.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(ErrorCode::NotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(ErrorCode::Conflict.status_code(), StatusCode::CONFLICT);
        assert_eq!(
            ErrorCode::InternalError.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_api_error_constructors() {
        assert_eq!(ApiError::bad_request("bad").code(), ErrorCode::BadRequest);
        assert_eq!(
            ApiError::unauthorized("unauth").code(),
            ErrorCode::Unauthorized
        );
        assert_eq!(ApiError::not_found("missing").code(), ErrorCode::NotFound);
        assert_eq!(ApiError::conflict("dup").code(), ErrorCode::Conflict);
        assert_eq!(ApiError::internal("boom").code(), ErrorCode::InternalError);
    }

    #[test]
    fn test_domain_error_mapping() {
        let err: ApiError = VidhubError::Auth("bad token".to_string()).into();
        assert_eq!(err.code(), ErrorCode::Unauthorized);

        let err: ApiError = VidhubError::Validation("empty".to_string()).into();
        assert_eq!(err.code(), ErrorCode::BadRequest);

        let err: ApiError = VidhubError::Conflict("dup".to_string()).into();
        assert_eq!(err.code(), ErrorCode::Conflict);

        let err: ApiError = VidhubError::NotFound("user".to_string()).into();
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[test]
    fn test_internal_errors_are_generic() {
        let err: ApiError = VidhubError::Database("secret table details".to_string()).into();
        assert_eq!(err.code(), ErrorCode::InternalError);
        assert!(!err.message.contains("secret"));

        let err: ApiError = VidhubError::DatabaseTimeout.into();
        assert_eq!(err.code(), ErrorCode::InternalError);
    }
}
