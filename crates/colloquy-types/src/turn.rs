//! Wire types for the turn endpoint.
//!
//! One turn is a single POST exchange: the session's message history plus
//! an optional chat identifier go up, the generated text comes back.

use serde::{Deserialize, Serialize};

use crate::chat::MessageRole;

/// A message as carried on the wire: role and content only.
///
/// Provisional client-side ids are never sent to the server; the server
/// assigns its own ids and timestamps on persistence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireMessage {
    pub role: MessageRole,
    pub content: String,
}

/// Request body of the turn endpoint.
///
/// `messages` is `Option` so an absent field reaches validation (and is
/// rejected there) instead of failing deserialization. When `chat_id` is
/// absent, no persistence is attempted for the turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub messages: Option<Vec<WireMessage>>,
    #[serde(
        default,
        rename = "chatId",
        skip_serializing_if = "Option::is_none"
    )]
    pub chat_id: Option<String>,
}

/// Successful response body of the turn endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnReply {
    pub text: String,
}
