//! Session controller: the client-side turn state machine.
//!
//! Owns the in-memory message list for one chat session, issues one
//! exchange per user submission, enforces the preload timeout, and
//! reconciles optimistic local state with confirmed or failed outcomes.
//!
//! The state machine is split into synchronous halves (`begin_turn` /
//! `finish_turn`) around the single awaited exchange, so the optimistic
//! append observably happens before any network activity and the
//! one-turn-in-flight rule is enforced by state, not just by `&mut`
//! exclusivity.

use std::time::Duration;

use colloquy_types::chat::MessageRole;
use colloquy_types::session::{SessionError, SessionMessage, SessionPhase};
use colloquy_types::turn::{TurnReply, TurnRequest, WireMessage};
use tracing::debug;
use uuid::Uuid;

use crate::session::transport::TurnTransport;

/// Bound on the history preload; a read that has not completed within
/// this window is abandoned and treated as "no history".
pub const HISTORY_FETCH_TIMEOUT: Duration = Duration::from_secs(8);

/// Client-side controller for one chat session.
pub struct SessionController<T: TurnTransport> {
    transport: T,
    chat_id: String,
    messages: Vec<SessionMessage>,
    phase: SessionPhase,
    last_error: Option<SessionError>,
}

impl<T: TurnTransport> SessionController<T> {
    /// Create a controller, resuming `chat_id` if supplied or minting a
    /// fresh identifier otherwise.
    pub fn new(transport: T, chat_id: Option<String>) -> Self {
        let chat_id = chat_id.unwrap_or_else(mint_chat_id);
        Self {
            transport,
            chat_id,
            messages: Vec::new(),
            phase: SessionPhase::Idle,
            last_error: None,
        }
    }

    /// The session's chat identifier.
    pub fn chat_id(&self) -> &str {
        &self.chat_id
    }

    /// The visible message history.
    pub fn messages(&self) -> &[SessionMessage] {
        &self.messages
    }

    /// Current phase of the turn state machine.
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// The last turn's failure, if the session is in the error phase.
    pub fn last_error(&self) -> Option<&SessionError> {
        self.last_error.as_ref()
    }

    /// Best-effort preload of persisted history for a resumed chat.
    ///
    /// Replaces the in-memory sequence wholesale on success. Degrades to
    /// an empty history on an unauthorized read, and silently abandons
    /// the attempt on timeout or any other failure -- the fetch is never
    /// left to resolve in the background and overwrite later state, and
    /// abandoning it has no effect on the server.
    pub async fn load_history(&mut self) {
        match tokio::time::timeout(
            HISTORY_FETCH_TIMEOUT,
            self.transport.fetch_chat(&self.chat_id),
        )
        .await
        {
            Ok(Ok(Some(chat))) => {
                self.messages = chat
                    .messages
                    .into_iter()
                    .map(|m| SessionMessage {
                        id: m.id.to_string(),
                        role: m.role,
                        content: m.content,
                    })
                    .collect();
            }
            Ok(Ok(None)) => {}
            Ok(Err(e)) if e.is_unauthorized() => {
                debug!(chat_id = %self.chat_id, "unauthorized history read; starting empty");
            }
            Ok(Err(e)) => {
                debug!(chat_id = %self.chat_id, error = %e, "history preload failed");
            }
            Err(_) => {
                debug!(chat_id = %self.chat_id, "history preload timed out; abandoned");
            }
        }
    }

    /// Submit one turn: optimistic append, exchange, reconcile.
    ///
    /// Returns `false` without any state change when the input is
    /// empty/whitespace or a turn is already in flight.
    pub async fn submit(&mut self, input: &str) -> bool {
        let Some(request) = self.begin_turn(input) else {
            return false;
        };
        let outcome = self.transport.post_turn(&request).await;
        self.finish_turn(outcome);
        true
    }

    /// First half of a turn: validate, optimistically append the user
    /// message, and enter the sending phase. Returns the request to
    /// exchange, or `None` when the submission is rejected.
    pub fn begin_turn(&mut self, input: &str) -> Option<TurnRequest> {
        let trimmed = input.trim();
        if trimmed.is_empty() || self.phase == SessionPhase::Sending {
            return None;
        }

        self.messages.push(SessionMessage {
            id: Uuid::now_v7().to_string(),
            role: MessageRole::User,
            content: trimmed.to_string(),
        });
        self.last_error = None;
        self.phase = SessionPhase::Sending;

        Some(TurnRequest {
            messages: Some(
                self.messages
                    .iter()
                    .map(|m| WireMessage {
                        role: m.role,
                        content: m.content.clone(),
                    })
                    .collect(),
            ),
            chat_id: Some(self.chat_id.clone()),
        })
    }

    /// Second half of a turn: reconcile the exchange outcome.
    ///
    /// Success appends the assistant reply and returns to idle; failure
    /// records the error and keeps the already-appended user message --
    /// it is never rolled back.
    pub fn finish_turn(&mut self, outcome: Result<TurnReply, SessionError>) {
        match outcome {
            Ok(reply) => {
                self.messages.push(SessionMessage {
                    id: Uuid::now_v7().to_string(),
                    role: MessageRole::Assistant,
                    content: reply.text,
                });
                self.phase = SessionPhase::Idle;
            }
            Err(e) => {
                self.last_error = Some(e);
                self.phase = SessionPhase::Error;
            }
        }
    }
}

/// Mint a fresh opaque chat identifier.
///
/// UUID v7 combines a monotonic time component with a random component,
/// which keeps concurrently created sessions collision-free without any
/// coordination with the server.
pub fn mint_chat_id() -> String {
    format!("chat_{}", Uuid::now_v7())
}
