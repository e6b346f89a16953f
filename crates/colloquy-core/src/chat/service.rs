//! Chat read service: owner-scoped retrieval and listing.
//!
//! Generic over `ChatRepository` to maintain clean architecture
//! (colloquy-core never depends on colloquy-infra). Storage failures are
//! surfaced here, not swallowed -- the availability trade-off on the turn
//! path does not apply to reads.

use colloquy_types::chat::{ChatSummary, ChatWithMessages};
use colloquy_types::error::ChatReadError;
use colloquy_types::identity::Caller;

use crate::chat::repository::ChatRepository;

/// Owner-scoped chat retrieval.
pub struct ChatService<R: ChatRepository> {
    repo: R,
}

impl<R: ChatRepository> ChatService<R> {
    /// Create a new chat service backed by the given repository.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Fetch a chat and its messages in ascending creation order.
    ///
    /// The record is returned only when its owner matches the caller's
    /// scope (authenticated id, or `guest` for unauthenticated access).
    /// A missing chat and an owner mismatch both yield `NotFound`.
    pub async fn get_chat(
        &self,
        chat_id: &str,
        caller: &Caller,
    ) -> Result<ChatWithMessages, ChatReadError> {
        let chat = self
            .repo
            .get_chat(chat_id, caller.scope_id())
            .await?
            .ok_or(ChatReadError::NotFound)?;

        let messages = self.repo.get_messages(chat_id).await?;

        Ok(ChatWithMessages {
            id: chat.id,
            owner_id: chat.owner_id,
            title: chat.title,
            created_at: chat.created_at,
            updated_at: chat.updated_at,
            messages,
        })
    }

    /// List the caller's chats, most recently active first.
    ///
    /// Requires an authenticated identity: unlike the single-chat read,
    /// there is no guest fallback here.
    pub async fn list_chats(&self, caller: &Caller) -> Result<Vec<ChatSummary>, ChatReadError> {
        let user_id = caller.user_id().ok_or(ChatReadError::Unauthorized)?;
        Ok(self.repo.list_chats(user_id).await?)
    }
}
