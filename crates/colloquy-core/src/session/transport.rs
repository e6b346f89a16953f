//! TurnTransport trait definition.
//!
//! The session controller's only view of the network: one POST exchange
//! per turn, one GET for the history preload. Implementations classify
//! failures into the three `SessionError` variants so the controller can
//! render a single, specific error affordance per failed turn.
//!
//! Uses native async fn in traits (RPITIT, Rust 2024 edition).
//! The production implementation lives in colloquy-infra
//! (`HttpTurnTransport`).

use colloquy_types::chat::ChatWithMessages;
use colloquy_types::session::SessionError;
use colloquy_types::turn::{TurnRequest, TurnReply};

/// Client-side transport for the turn and history endpoints.
pub trait TurnTransport: Send + Sync {
    /// Submit one turn. No client-side timeout: the call waits for the
    /// server, bounded only by the provider's behavior server-side.
    fn post_turn(
        &self,
        request: &TurnRequest,
    ) -> impl std::future::Future<Output = Result<TurnReply, SessionError>> + Send;

    /// Fetch a chat's persisted history. `Ok(None)` means the chat does
    /// not exist (or is not visible to this caller). The controller
    /// applies the preload timeout; implementations should not.
    fn fetch_chat(
        &self,
        chat_id: &str,
    ) -> impl std::future::Future<Output = Result<Option<ChatWithMessages>, SessionError>> + Send;
}
