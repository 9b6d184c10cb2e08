//! Anthropic API client

use std::time::Duration;

use reqwest::{Client, ClientBuilder};
use serde_json::{json, Value};

use crate::core::providers::{ProviderError, ProviderResult};
use crate::core::types::{ChatRequest, ChatResponse, FinishReason, MessageRole, Usage};

use super::config::AnthropicConfig;

const PROVIDER: &str = "anthropic";

/// max_tokens sent when the caller leaves it unset; the messages API
/// requires the field
const DEFAULT_MAX_TOKENS: u32 = 4096;

/// HTTP client for the Anthropic messages endpoint
#[derive(Debug, Clone)]
pub struct AnthropicClient {
    config: AnthropicConfig,
    http_client: Client,
}

impl AnthropicClient {
    pub fn new(config: AnthropicConfig) -> Result<Self, ProviderError> {
        let http_client = ClientBuilder::new()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .build()
            .map_err(|e| {
                ProviderError::network(PROVIDER, format!("failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            config,
            http_client,
        })
    }

    /// Execute one chat completion call
    pub async fn chat(&self, request: &ChatRequest) -> ProviderResult {
        let url = format!("{}/v1/messages", self.config.base_url.trim_end_matches('/'));
        let body = build_request_body(request);

        let mut builder = self
            .http_client
            .post(&url)
            .header("anthropic-version", &self.config.api_version)
            .json(&body);
        if let Some(api_key) = &self.config.api_key {
            builder = builder.header("x-api-key", api_key);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| classify_transport_error(&e, self.config.request_timeout_secs * 1000))?;

        let status = response.status().as_u16();
        let text = response.text().await.map_err(|e| {
            ProviderError::network(PROVIDER, format!("failed to read response: {}", e))
        })?;

        if !(200..300).contains(&status) {
            return Err(ProviderError::from_http_status(PROVIDER, status, &text));
        }

        parse_response_body(&text)
    }
}

fn classify_transport_error(error: &reqwest::Error, timeout_ms: u64) -> ProviderError {
    if error.is_timeout() {
        ProviderError::timeout(PROVIDER, timeout_ms)
    } else {
        ProviderError::network(PROVIDER, error.to_string())
    }
}

/// Build the vendor request body
///
/// The first system message becomes the top-level `system` directive;
/// all other messages keep their relative order.
pub(super) fn build_request_body(request: &ChatRequest) -> Value {
    let mut system: Option<&str> = None;
    let mut messages = Vec::with_capacity(request.messages.len());

    for message in &request.messages {
        if system.is_none() && message.role == MessageRole::System {
            system = Some(&message.content);
            continue;
        }
        messages.push(json!({
            "role": message.role,
            "content": message.content,
        }));
    }

    let mut body = json!({
        "model": request.model,
        "messages": messages,
        "max_tokens": request.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
    });

    if let Some(system) = system {
        body["system"] = json!(system);
    }
    if let Some(temperature) = request.temperature {
        body["temperature"] = json!(temperature);
    }

    body
}

/// Translate the vendor response into the uniform shape
pub(super) fn parse_response_body(text: &str) -> ProviderResult {
    let value: Value = serde_json::from_str(text)
        .map_err(|e| ProviderError::parse(PROVIDER, e.to_string()))?;

    let content = value
        .get("content")
        .and_then(Value::as_array)
        .map(|blocks| {
            blocks
                .iter()
                .filter_map(|block| block.get("text").and_then(Value::as_str))
                .collect::<Vec<_>>()
                .join("")
        })
        .ok_or_else(|| ProviderError::parse(PROVIDER, "response has no content blocks"))?;

    // The messages API has no content-filter stop reason; everything but
    // max_tokens collapses to Stop.
    let finish_reason = match value.get("stop_reason").and_then(Value::as_str) {
        Some("max_tokens") => FinishReason::Length,
        _ => FinishReason::Stop,
    };

    let usage = value
        .get("usage")
        .map(|usage| {
            let field = |name: &str| usage.get(name).and_then(Value::as_u64).unwrap_or(0) as u32;
            Usage::new(field("input_tokens"), field("output_tokens"))
        })
        .unwrap_or_default();

    Ok(ChatResponse {
        id: value
            .get("id")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        content,
        model: value
            .get("model")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        finish_reason,
        usage,
    })
}
