//! ChatRepository trait definition.
//!
//! Persistence operations for chats and messages. Implementations live in
//! colloquy-infra (e.g., `SqliteChatRepository`). Uses native async fn in
//! traits (RPITIT, Rust 2024 edition).

use chrono::{DateTime, Utc};
use colloquy_types::chat::{Chat, ChatSummary, Message};
use colloquy_types::error::RepositoryError;

/// Repository trait for chat and message persistence.
pub trait ChatRepository: Send + Sync {
    /// Create the chat record if absent; leave an existing record
    /// unchanged.
    ///
    /// This is the one concurrency-sensitive operation in the system: it
    /// must be a single conditional insert (upsert-by-key), never an
    /// existence check followed by a create, so concurrent first turns
    /// for the same chat id converge on exactly one record.
    fn upsert_chat(
        &self,
        chat: &Chat,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Append a message to a chat.
    ///
    /// Messages have no uniqueness constraint beyond their id; ordering
    /// is carried entirely by `created_at`.
    fn append_message(
        &self,
        message: &Message,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Advance a chat's `updated_at` to the given instant.
    fn touch_chat(
        &self,
        chat_id: &str,
        at: DateTime<Utc>,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Fetch a chat scoped by owner.
    ///
    /// Returns `None` both when the chat is absent and when it exists
    /// under a different owner, so a mismatch is indistinguishable from
    /// a miss.
    fn get_chat(
        &self,
        chat_id: &str,
        owner_id: &str,
    ) -> impl std::future::Future<Output = Result<Option<Chat>, RepositoryError>> + Send;

    /// Messages of a chat in ascending creation order.
    fn get_messages(
        &self,
        chat_id: &str,
    ) -> impl std::future::Future<Output = Result<Vec<Message>, RepositoryError>> + Send;

    /// All chats owned by `owner_id`, most recently active first.
    fn list_chats(
        &self,
        owner_id: &str,
    ) -> impl std::future::Future<Output = Result<Vec<ChatSummary>, RepositoryError>> + Send;
}
