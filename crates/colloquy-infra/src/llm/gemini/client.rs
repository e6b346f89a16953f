//! GeminiProvider -- concrete [`TextProvider`] implementation for the
//! Generative Language API.
//!
//! Sends non-streaming `generateContent` requests with the API key in
//! the `x-goog-api-key` header.
//!
//! # API Key Security
//!
//! The API key is stored as a [`SecretString`] and is only exposed when
//! constructing HTTP request headers. It never appears in Debug output,
//! Display output, or tracing logs.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};

use colloquy_core::provider::TextProvider;
use colloquy_types::error::ProviderError;

use super::types::{GeminiRequest, GeminiResponse};

/// Environment variable holding the API key.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Google Gemini model provider.
pub struct GeminiProvider {
    client: reqwest::Client,
    api_key: SecretString,
    base_url: String,
    model: String,
}

impl GeminiProvider {
    /// Create a new Gemini provider.
    ///
    /// # Arguments
    ///
    /// * `api_key` - Generative Language API key wrapped in SecretString
    /// * `model` - Model identifier (e.g., "gemini-flash-latest")
    pub fn new(api_key: SecretString, model: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(300)) // 5 min timeout for long generations
            .build()
            .expect("failed to create reqwest client");

        Self {
            client,
            api_key,
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            model,
        }
    }

    /// Create a provider from the `GEMINI_API_KEY` environment variable.
    pub fn from_env(model: String) -> anyhow::Result<Self> {
        let key = std::env::var(API_KEY_ENV)
            .map_err(|_| anyhow::anyhow!("{API_KEY_ENV} is not set"))?;
        Ok(Self::new(SecretString::from(key), model))
    }

    /// The model this provider sends requests for.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Override the base URL (useful for testing or proxies).
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    fn url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }
}

// GeminiProvider intentionally does NOT derive Debug. The SecretString
// field ensures the API key is never printed, but we also omit Debug
// entirely.

impl TextProvider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn generate(&self, prompt: &str) -> Result<String, ProviderError> {
        let body = GeminiRequest::from_prompt(prompt);

        let response = self
            .client
            .post(self.url())
            .header("x-goog-api-key", self.api_key.expose_secret())
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::Upstream {
                message: format!("HTTP request failed: {e}"),
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(match status.as_u16() {
                401 | 403 => ProviderError::AuthenticationFailed,
                429 => ProviderError::RateLimited,
                _ => ProviderError::Upstream {
                    message: format!("HTTP {status}: {error_body}"),
                },
            });
        }

        let gemini_resp: GeminiResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Deserialization(format!("failed to parse response: {e}")))?;

        gemini_resp.text().ok_or_else(|| {
            ProviderError::Deserialization("response contained no candidates".to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_includes_model() {
        let provider = GeminiProvider::new(
            SecretString::from("test-key"),
            "gemini-flash-latest".to_string(),
        );
        assert_eq!(
            provider.url(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-flash-latest:generateContent"
        );
    }

    #[test]
    fn test_with_base_url_override() {
        let provider = GeminiProvider::new(SecretString::from("test-key"), "m".to_string())
            .with_base_url("http://127.0.0.1:9999".to_string());
        assert_eq!(
            provider.url(),
            "http://127.0.0.1:9999/v1beta/models/m:generateContent"
        );
    }
}
