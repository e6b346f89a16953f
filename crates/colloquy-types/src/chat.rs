//! Chat and message types for Colloquy.
//!
//! These types model the durable side of a conversation: the `Chat`
//! record grouping a message sequence under one owner, and the immutable
//! `Message` rows within it. They double as the JSON wire shapes for the
//! read endpoints, so serde renames follow the camelCase API convention.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;
use std::str::FromStr;

/// Role of a message within a chat.
///
/// Maps to the CHECK constraint in the SQLite schema:
/// `CHECK (role IN ('user', 'assistant'))`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

impl fmt::Display for MessageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageRole::User => write!(f, "user"),
            MessageRole::Assistant => write!(f, "assistant"),
        }
    }
}

impl FromStr for MessageRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "user" => Ok(MessageRole::User),
            "assistant" => Ok(MessageRole::Assistant),
            other => Err(format!("invalid message role: '{other}'")),
        }
    }
}

/// A durable chat record grouping a message sequence under one owner.
///
/// Created lazily by the first successful turn (never on page load).
/// `updated_at` advances on every persisted turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chat {
    /// Client-minted opaque identifier, stable for the session lifetime.
    pub id: String,
    /// Authenticated caller identity, or the literal `guest`.
    pub owner_id: String,
    /// Derived from the first user message, truncated to 30 characters.
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A single persisted message within a chat.
///
/// Messages are immutable once persisted and totally ordered by
/// `created_at` within their chat; a turn's user message strictly
/// precedes its paired assistant message.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: Uuid,
    pub chat_id: String,
    pub role: MessageRole,
    pub content: String,
    /// Server-assigned ordering timestamp.
    pub created_at: DateTime<Utc>,
}

/// A chat record with its messages embedded in ascending creation order.
///
/// Response shape of the chat-by-id endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatWithMessages {
    pub id: String,
    pub owner_id: String,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub messages: Vec<Message>,
}

/// Reduced chat projection returned by the list endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatSummary {
    pub id: String,
    pub title: String,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_role_roundtrip() {
        for role in [MessageRole::User, MessageRole::Assistant] {
            let s = role.to_string();
            let parsed: MessageRole = s.parse().unwrap();
            assert_eq!(role, parsed);
        }
    }

    #[test]
    fn test_message_role_rejects_unknown() {
        assert!("system".parse::<MessageRole>().is_err());
        assert!("".parse::<MessageRole>().is_err());
    }

    #[test]
    fn test_message_role_serde() {
        let json = serde_json::to_string(&MessageRole::Assistant).unwrap();
        assert_eq!(json, "\"assistant\"");
        let parsed: MessageRole = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, MessageRole::Assistant);
    }

    #[test]
    fn test_chat_summary_camel_case() {
        let summary = ChatSummary {
            id: "chat_1".to_string(),
            title: "Hello".to_string(),
            updated_at: Utc::now(),
        };
        let json = serde_json::to_string(&summary).unwrap();
        assert!(json.contains("\"updatedAt\""));
        assert!(!json.contains("updated_at"));
    }

    #[test]
    fn test_chat_with_messages_serde_roundtrip() {
        let now = Utc::now();
        let chat = ChatWithMessages {
            id: "chat_1".to_string(),
            owner_id: "guest".to_string(),
            title: "Hello, are you working?".to_string(),
            created_at: now,
            updated_at: now,
            messages: vec![Message {
                id: Uuid::now_v7(),
                chat_id: "chat_1".to_string(),
                role: MessageRole::User,
                content: "Hello, are you working?".to_string(),
                created_at: now,
            }],
        };
        let json = serde_json::to_string(&chat).unwrap();
        assert!(json.contains("\"ownerId\":\"guest\""));
        assert!(json.contains("\"chatId\":\"chat_1\""));

        let parsed: ChatWithMessages = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.messages.len(), 1);
        assert_eq!(parsed.messages[0].role, MessageRole::User);
    }
}
