//! OpenAI provider implementation

use async_trait::async_trait;

use crate::core::providers::{ChatProvider, ProviderError, ProviderResult};
use crate::core::types::ChatRequest;

use super::client::OpenAiClient;
use super::config::OpenAiConfig;

/// OpenAI-shaped provider
#[derive(Debug, Clone)]
pub struct OpenAiProvider {
    client: OpenAiClient,
}

impl OpenAiProvider {
    pub fn new(config: OpenAiConfig) -> Result<Self, ProviderError> {
        Ok(Self {
            client: OpenAiClient::new(config)?,
        })
    }
}

#[async_trait]
impl ChatProvider for OpenAiProvider {
    fn name(&self) -> &'static str {
        "openai"
    }

    async fn chat(&self, request: &ChatRequest) -> ProviderResult {
        self.client.chat(request).await
    }
}
