//! Turn endpoint handler.
//!
//! POST /api/chat
//!
//! Body: `{messages: [{role, content}], chatId?}`. Runs one turn through
//! the turn service: generate a reply, then best-effort persist the
//! exchange when a chat id was supplied. The response is `{text}` on
//! success; the only failures surfaced are validation (400) and provider
//! failure (502).

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;

use colloquy_types::turn::{TurnReply, TurnRequest};

use crate::http::error::AppError;
use crate::http::extractors::auth::CallerIdentity;
use crate::state::AppState;

/// POST /api/chat - Run one conversation turn.
pub async fn create_turn(
    State(state): State<AppState>,
    CallerIdentity(caller): CallerIdentity,
    body: Result<Json<TurnRequest>, JsonRejection>,
) -> Result<Json<TurnReply>, AppError> {
    // A body that is not an object with an array `messages` never reaches
    // the service; it is the same BadRequest as an empty sequence.
    let Json(request) =
        body.map_err(|e| AppError::BadRequest(format!("Malformed request body: {e}")))?;

    let text = state.turn_service.run_turn(&caller, &request).await?;

    Ok(Json(TurnReply { text }))
}
