//! Chat retrieval HTTP handlers.
//!
//! Endpoints:
//! - GET /api/chat/{id} - A chat with its messages in ascending order
//! - GET /api/chats     - The caller's chats, most recently active first
//!
//! Both are owner-scoped: a chat that exists under another owner is
//! indistinguishable from one that does not exist. Storage failures on
//! these paths are surfaced, never swallowed.

use axum::Json;
use axum::extract::{Path, State};

use colloquy_types::chat::{ChatSummary, ChatWithMessages};

use crate::http::error::AppError;
use crate::http::extractors::auth::CallerIdentity;
use crate::state::AppState;

/// GET /api/chat/{id} - Fetch a chat and its messages.
pub async fn get_chat(
    State(state): State<AppState>,
    CallerIdentity(caller): CallerIdentity,
    Path(chat_id): Path<String>,
) -> Result<Json<ChatWithMessages>, AppError> {
    if chat_id.trim().is_empty() {
        return Err(AppError::BadRequest("Missing chatId".to_string()));
    }

    let chat = state.chat_service.get_chat(&chat_id, &caller).await?;
    Ok(Json(chat))
}

/// GET /api/chats - List the caller's chats.
///
/// Requires an authenticated caller; there is no guest fallback on this
/// path.
pub async fn list_chats(
    State(state): State<AppState>,
    CallerIdentity(caller): CallerIdentity,
) -> Result<Json<Vec<ChatSummary>>, AppError> {
    let chats = state.chat_service.list_chats(&caller).await?;
    Ok(Json(chats))
}
