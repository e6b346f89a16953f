//! Caller identity extractor.
//!
//! Identity is supplied by the external auth collaborator as an
//! `Authorization: Bearer <token>` header. Tokens are SHA-256 hashed and
//! compared against the `api_tokens` table, resolving to the user id the
//! token was minted for.
//!
//! Absence of a header is not an error: the request proceeds as the
//! `guest` caller. A presented-but-unknown token is rejected outright --
//! a wrong credential is an error, anonymity is not. Endpoints that
//! require a real identity (the chat list) enforce that themselves via
//! `Caller::user_id()`.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use sha2::{Digest, Sha256};
use sqlx::Row;

use colloquy_types::identity::Caller;

use crate::http::error::AppError;
use crate::state::AppState;

/// Extracted caller identity: an authenticated user or guest.
pub struct CallerIdentity(pub Caller);

impl FromRequestParts<AppState> for CallerIdentity {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(token) = extract_bearer_token(parts)? else {
            return Ok(CallerIdentity(Caller::Guest));
        };

        let token_hash = hash_token(&token);
        let result = sqlx::query("SELECT id, user_id FROM api_tokens WHERE token_hash = ?")
            .bind(&token_hash)
            .fetch_optional(&state.db_pool.reader)
            .await
            .map_err(|e| AppError::Internal(format!("Database error: {e}")))?;

        match result {
            Some(row) => {
                // Update last_used_at (best effort, don't fail the request)
                let id: String = row.get("id");
                let now = chrono::Utc::now().to_rfc3339();
                let _ = sqlx::query("UPDATE api_tokens SET last_used_at = ? WHERE id = ?")
                    .bind(&now)
                    .bind(&id)
                    .execute(&state.db_pool.writer)
                    .await;

                let user_id: String = row.get("user_id");
                Ok(CallerIdentity(Caller::User(user_id)))
            }
            None => Err(AppError::Unauthorized("Invalid API token".to_string())),
        }
    }
}

/// Extract the bearer token from the Authorization header, if present.
fn extract_bearer_token(parts: &Parts) -> Result<Option<String>, AppError> {
    let Some(auth) = parts.headers.get("authorization") else {
        return Ok(None);
    };
    let auth_str = auth
        .to_str()
        .map_err(|_| AppError::Unauthorized("Invalid Authorization header encoding".to_string()))?;
    match auth_str.strip_prefix("Bearer ") {
        Some(token) => Ok(Some(token.trim().to_string())),
        None => Err(AppError::Unauthorized(
            "Authorization header must use the Bearer scheme".to_string(),
        )),
    }
}

/// Compute SHA-256 hash of an API token (lowercase hex).
pub fn hash_token(token: &str) -> String {
    let digest = Sha256::digest(token.as_bytes());
    format!("{digest:x}")
}

/// Mint a new API token for a user and store its hash.
///
/// Returns the plaintext token; it is shown once and never recoverable
/// afterwards.
pub async fn create_token(
    pool: &colloquy_infra::sqlite::pool::DatabasePool,
    user_id: &str,
) -> anyhow::Result<String> {
    let plaintext = format!(
        "cqy_{}{}",
        uuid::Uuid::new_v4().simple(),
        uuid::Uuid::new_v4().simple()
    );
    let token_hash = hash_token(&plaintext);
    let id = uuid::Uuid::now_v7().to_string();
    let now = chrono::Utc::now().to_rfc3339();

    sqlx::query(
        "INSERT INTO api_tokens (id, token_hash, user_id, created_at) VALUES (?, ?, ?, ?)",
    )
    .bind(&id)
    .bind(&token_hash)
    .bind(user_id)
    .bind(&now)
    .execute(&pool.writer)
    .await?;

    Ok(plaintext)
}
