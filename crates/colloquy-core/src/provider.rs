//! TextProvider trait definition.
//!
//! The model provider collaborator is opaque and unary: it accepts a
//! single text prompt and returns generated text, or fails. No streaming,
//! no native multi-turn context. How much conversation history ends up in
//! the prompt is decided by the turn service's history policy, not here.
//!
//! Uses native async fn in traits (RPITIT, Rust 2024 edition).
//! Implementations live in colloquy-infra (e.g., `GeminiProvider`).

use colloquy_types::error::ProviderError;

/// Trait for model provider backends.
pub trait TextProvider: Send + Sync {
    /// Human-readable provider name (e.g., "gemini").
    fn name(&self) -> &str;

    /// Generate a reply for a single text prompt.
    ///
    /// This is the dominant-latency, unreliable step of a turn: it may
    /// fail or take arbitrarily long, and callers do not retry it.
    fn generate(
        &self,
        prompt: &str,
    ) -> impl std::future::Future<Output = Result<String, ProviderError>> + Send;
}
