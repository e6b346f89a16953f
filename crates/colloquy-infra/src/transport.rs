//! HTTP implementation of the client-side turn transport.
//!
//! Used by the interactive CLI session to talk to a running Colloquy
//! server. Classifies failures into the three `SessionError` variants:
//! a non-success status becomes `Server` (carrying the server's error
//! detail when the body parses), an undecodable success body becomes
//! `Malformed`, and a request that never completes becomes `Network`.
//!
//! No timeouts are applied here: turn submission deliberately has none,
//! and the history preload bound belongs to the session controller.

use secrecy::{ExposeSecret, SecretString};

use colloquy_core::session::transport::TurnTransport;
use colloquy_types::chat::ChatWithMessages;
use colloquy_types::session::SessionError;
use colloquy_types::turn::{TurnReply, TurnRequest};

/// Error body shape returned by the Colloquy API.
#[derive(Debug, serde::Deserialize)]
struct ErrorBody {
    error: Option<String>,
    details: Option<String>,
}

/// Reqwest-backed transport for the turn and chat endpoints.
pub struct HttpTurnTransport {
    client: reqwest::Client,
    base_url: String,
    token: Option<SecretString>,
}

impl HttpTurnTransport {
    /// Create a transport against the given server base URL, with an
    /// optional bearer token for authenticated sessions.
    pub fn new(base_url: String, token: Option<SecretString>) -> Self {
        let client = reqwest::Client::builder()
            .build()
            .expect("failed to create reqwest client");

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        }
    }

    fn request(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => builder.bearer_auth(token.expose_secret()),
            None => builder,
        }
    }

    /// Extract the most specific error detail from a failure body.
    async fn error_detail(response: reqwest::Response) -> String {
        match response.json::<ErrorBody>().await {
            Ok(body) => body
                .details
                .or(body.error)
                .unwrap_or_else(|| "no specific details provided".to_string()),
            Err(_) => "the server returned an invalid response".to_string(),
        }
    }
}

impl TurnTransport for HttpTurnTransport {
    async fn post_turn(&self, request: &TurnRequest) -> Result<TurnReply, SessionError> {
        let response = self
            .request(self.client.post(format!("{}/api/chat", self.base_url)))
            .json(request)
            .send()
            .await
            .map_err(|e| SessionError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SessionError::Server {
                status: status.as_u16(),
                detail: Self::error_detail(response).await,
            });
        }

        response
            .json::<TurnReply>()
            .await
            .map_err(|e| SessionError::Malformed(e.to_string()))
    }

    async fn fetch_chat(&self, chat_id: &str) -> Result<Option<ChatWithMessages>, SessionError> {
        let response = self
            .request(
                self.client
                    .get(format!("{}/api/chat/{chat_id}", self.base_url)),
            )
            .send()
            .await
            .map_err(|e| SessionError::Network(e.to_string()))?;

        let status = response.status();
        if status.as_u16() == 404 {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(SessionError::Server {
                status: status.as_u16(),
                detail: Self::error_detail(response).await,
            });
        }

        response
            .json::<ChatWithMessages>()
            .await
            .map(Some)
            .map_err(|e| SessionError::Malformed(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let transport = HttpTurnTransport::new("http://localhost:8080/".to_string(), None);
        assert_eq!(transport.base_url, "http://localhost:8080");
    }

    #[test]
    fn test_error_body_detail_preference() {
        // details wins over error when both are present
        let body: ErrorBody =
            serde_json::from_str(r#"{"error":"Upstream failure","details":"HTTP 503"}"#).unwrap();
        assert_eq!(body.details.as_deref(), Some("HTTP 503"));

        let body: ErrorBody = serde_json::from_str(r#"{"error":"No messages"}"#).unwrap();
        assert_eq!(body.details, None);
        assert_eq!(body.error.as_deref(), Some("No messages"));
    }
}
