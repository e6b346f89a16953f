//! Error types shared across the Colloquy crates.

use thiserror::Error;

/// Errors from repository operations (used by trait definitions in colloquy-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("entity not found")]
    NotFound,
}

/// Errors from the model provider collaborator.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("provider error: {message}")]
    Upstream { message: String },

    #[error("deserialization error: {0}")]
    Deserialization(String),

    #[error("authentication failed")]
    AuthenticationFailed,

    #[error("rate limited")]
    RateLimited,
}

/// Errors the turn service can return to its caller.
///
/// Persistence failures are deliberately absent: they are swallowed and
/// logged on the turn path so the generated reply is never lost to a
/// storage hiccup.
#[derive(Debug, Error)]
pub enum TurnError {
    #[error("bad request: {0}")]
    BadRequest(String),

    #[error(transparent)]
    Upstream(#[from] ProviderError),
}

/// Errors from the chat read endpoints.
///
/// Unlike the turn path, storage failures here are surfaced: a failed
/// read has no compensating value to protect.
#[derive(Debug, Error)]
pub enum ChatReadError {
    #[error("chat not found")]
    NotFound,

    #[error("authentication required")]
    Unauthorized,

    #[error("storage error: {0}")]
    Storage(String),
}

impl From<RepositoryError> for ChatReadError {
    fn from(e: RepositoryError) -> Self {
        match e {
            RepositoryError::NotFound => ChatReadError::NotFound,
            other => ChatReadError::Storage(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_turn_error_display() {
        let err = TurnError::BadRequest("messages must be a non-empty array".to_string());
        assert_eq!(
            err.to_string(),
            "bad request: messages must be a non-empty array"
        );

        let err = TurnError::from(ProviderError::Upstream {
            message: "HTTP 503".to_string(),
        });
        assert_eq!(err.to_string(), "provider error: HTTP 503");
    }

    #[test]
    fn test_repository_error_maps_to_read_error() {
        let err: ChatReadError = RepositoryError::NotFound.into();
        assert!(matches!(err, ChatReadError::NotFound));

        let err: ChatReadError = RepositoryError::Query("disk I/O error".to_string()).into();
        assert!(matches!(err, ChatReadError::Storage(_)));
    }
}
