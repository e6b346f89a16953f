//! Client-side session types.
//!
//! A session is the client-held, non-persisted view of one chat: the
//! visible message sequence plus in-flight-request state. These types are
//! consumed by the `SessionController` in colloquy-core.

use serde::{Deserialize, Serialize};

use crate::chat::MessageRole;

/// Lifecycle phase of a client session's turn state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionPhase {
    /// No turn in flight; ready to submit.
    #[default]
    Idle,
    /// Exactly one turn in flight.
    Sending,
    /// The last turn failed; cleared optimistically on the next submit.
    Error,
}

/// A message held in the client session.
///
/// Provisional messages carry a client-minted id (uuid v7, so the id
/// embeds a timestamp component); messages loaded from the server keep
/// their server-assigned ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionMessage {
    pub id: String,
    pub role: MessageRole,
    pub content: String,
}

/// Why a turn (or a history preload) failed, as shown to the user.
///
/// The three variants distinguish "the server responded with an error"
/// (carrying server-provided detail), "the response was not parseable",
/// and "the request did not complete".
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("server error ({status}): {detail}")]
    Server { status: u16, detail: String },

    #[error("invalid response: {0}")]
    Malformed(String),

    #[error("request did not complete: {0}")]
    Network(String),
}

impl SessionError {
    /// Whether this failure is an authorization rejection.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, SessionError::Server { status: 401, .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_phase_default() {
        assert_eq!(SessionPhase::default(), SessionPhase::Idle);
    }

    #[test]
    fn test_session_error_display() {
        let err = SessionError::Server {
            status: 500,
            detail: "upstream failure".to_string(),
        };
        assert_eq!(err.to_string(), "server error (500): upstream failure");

        let err = SessionError::Network("connection refused".to_string());
        assert!(err.to_string().starts_with("request did not complete"));
    }

    #[test]
    fn test_is_unauthorized() {
        let unauthorized = SessionError::Server {
            status: 401,
            detail: "Unauthorized".to_string(),
        };
        assert!(unauthorized.is_unauthorized());

        let not_found = SessionError::Server {
            status: 404,
            detail: "Chat not found".to_string(),
        };
        assert!(!not_found.is_unauthorized());
        assert!(!SessionError::Malformed("bad json".to_string()).is_unauthorized());
    }
}
