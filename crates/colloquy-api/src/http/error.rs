//! Application error type mapping to HTTP status codes and the
//! `{"error", "details"}` body format.
//!
//! Persistence failures never reach this type on the turn path (the turn
//! service swallows them); on the read paths they surface here as
//! `Internal`.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use colloquy_types::error::{ChatReadError, ProviderError, TurnError};

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Malformed or missing input.
    BadRequest(String),
    /// Caller identity required but absent or invalid.
    Unauthorized(String),
    /// Record absent or not owned by the caller.
    NotFound(String),
    /// The model provider call failed.
    Upstream { error: String, details: String },
    /// Generic internal error.
    Internal(String),
}

impl From<TurnError> for AppError {
    fn from(e: TurnError) -> Self {
        match e {
            TurnError::BadRequest(msg) => AppError::BadRequest(msg),
            TurnError::Upstream(provider) => AppError::from(provider),
        }
    }
}

impl From<ProviderError> for AppError {
    fn from(e: ProviderError) -> Self {
        AppError::Upstream {
            error: "Upstream provider failure".to_string(),
            details: e.to_string(),
        }
    }
}

impl From<ChatReadError> for AppError {
    fn from(e: ChatReadError) -> Self {
        match e {
            ChatReadError::NotFound => AppError::NotFound("Chat not found".to_string()),
            ChatReadError::Unauthorized => AppError::Unauthorized("Unauthorized".to_string()),
            ChatReadError::Storage(msg) => AppError::Internal(msg),
        }
    }
}

impl AppError {
    /// The HTTP status this error maps to.
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Upstream { .. } => StatusCode::BAD_GATEWAY,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            AppError::Upstream { error, details } => json!({
                "error": error,
                "details": details,
            }),
            AppError::BadRequest(msg)
            | AppError::Unauthorized(msg)
            | AppError::NotFound(msg) => json!({ "error": msg }),
            AppError::Internal(msg) => json!({
                "error": "Internal server error",
                "details": msg,
            }),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            AppError::BadRequest("No messages".to_string()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::Unauthorized("Unauthorized".to_string()).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::NotFound("Chat not found".to_string()).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::Upstream {
                error: "Upstream provider failure".to_string(),
                details: "HTTP 503".to_string(),
            }
            .status(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            AppError::Internal("boom".to_string()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_turn_error_conversion() {
        let err: AppError = TurnError::BadRequest("No messages".to_string()).into();
        assert!(matches!(err, AppError::BadRequest(_)));

        let err: AppError = TurnError::Upstream(ProviderError::RateLimited).into();
        assert!(matches!(err, AppError::Upstream { .. }));
    }

    #[test]
    fn test_read_error_conversion() {
        let err: AppError = ChatReadError::NotFound.into();
        assert!(matches!(err, AppError::NotFound(_)));

        let err: AppError = ChatReadError::Unauthorized.into();
        assert!(matches!(err, AppError::Unauthorized(_)));

        // Read-path storage failures surface instead of being swallowed.
        let err: AppError = ChatReadError::Storage("disk I/O error".to_string()).into();
        assert!(matches!(err, AppError::Internal(_)));
    }

    #[test]
    fn test_into_response_status() {
        let response = AppError::NotFound("Chat not found".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
