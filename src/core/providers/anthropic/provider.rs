//! Anthropic provider implementation

use async_trait::async_trait;

use crate::core::providers::{ChatProvider, ProviderError, ProviderResult};
use crate::core::types::ChatRequest;

use super::client::AnthropicClient;
use super::config::AnthropicConfig;

/// Anthropic-shaped provider
#[derive(Debug, Clone)]
pub struct AnthropicProvider {
    client: AnthropicClient,
}

impl AnthropicProvider {
    pub fn new(config: AnthropicConfig) -> Result<Self, ProviderError> {
        Ok(Self {
            client: AnthropicClient::new(config)?,
        })
    }
}

#[async_trait]
impl ChatProvider for AnthropicProvider {
    fn name(&self) -> &'static str {
        "anthropic"
    }

    async fn chat(&self, request: &ChatRequest) -> ProviderResult {
        self.client.chat(request).await
    }
}
