//! Global configuration types.
//!
//! Deserialized from `{data_dir}/config.toml` by the infra loader.
//! Every field has a default so a missing or partial file still yields a
//! working configuration.

use serde::{Deserialize, Serialize};

/// Default Gemini model identifier.
pub const DEFAULT_MODEL: &str = "gemini-flash-latest";

/// How much conversation history is forwarded to the model provider.
///
/// The source system forwarded only the latest user message while still
/// displaying and persisting full history; that stays the default here,
/// but the window is a policy choice rather than hard-coded behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryPolicy {
    /// Forward only the latest user message.
    Latest,
    /// Forward the trailing window of `n` messages.
    LastN { n: usize },
    /// Forward the entire conversation.
    Full,
}

impl Default for HistoryPolicy {
    fn default() -> Self {
        HistoryPolicy::Latest
    }
}

/// Model provider settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Model identifier sent to the provider.
    pub model: String,
    /// Base URL override (testing or proxies). None uses the provider default.
    pub base_url: Option<String>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            base_url: None,
        }
    }
}

/// Top-level configuration loaded from `config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobalConfig {
    pub provider: ProviderConfig,
    /// History forwarded to the provider per turn.
    pub history: HistoryPolicy,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GlobalConfig::default();
        assert_eq!(config.provider.model, DEFAULT_MODEL);
        assert!(config.provider.base_url.is_none());
        assert_eq!(config.history, HistoryPolicy::Latest);
    }

    #[test]
    fn test_parse_partial_toml() {
        let config: GlobalConfig = toml::from_str(
            r#"
[provider]
model = "gemini-2.0-pro"
"#,
        )
        .unwrap();
        assert_eq!(config.provider.model, "gemini-2.0-pro");
        assert_eq!(config.history, HistoryPolicy::Latest);
    }

    #[test]
    fn test_parse_history_window() {
        let config: GlobalConfig = toml::from_str(
            r#"
[history.last_n]
n = 8
"#,
        )
        .unwrap();
        assert_eq!(config.history, HistoryPolicy::LastN { n: 8 });

        let config: GlobalConfig = toml::from_str(r#"history = "full""#).unwrap();
        assert_eq!(config.history, HistoryPolicy::Full);
    }
}
