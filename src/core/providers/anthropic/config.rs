//! Anthropic provider configuration

use serde::{Deserialize, Serialize};

/// Configuration for the Anthropic adapter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnthropicConfig {
    /// API key, sent in the x-api-key header
    pub api_key: Option<String>,
    /// Base URL, overridable for tests and proxies
    pub base_url: String,
    /// API version header value
    pub api_version: String,
    /// Outbound request timeout in seconds
    pub request_timeout_secs: u64,
    /// TCP connect timeout in seconds
    pub connect_timeout_secs: u64,
}

impl Default for AnthropicConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.anthropic.com".to_string(),
            api_version: "2023-06-01".to_string(),
            request_timeout_secs: 60,
            connect_timeout_secs: 10,
        }
    }
}

impl AnthropicConfig {
    /// Create a configuration with an explicit API key
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
            ..Self::default()
        }
    }

    /// Override the base URL
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}
