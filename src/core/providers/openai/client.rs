//! OpenAI API client

use std::time::Duration;

use reqwest::{Client, ClientBuilder};
use serde_json::{json, Value};

use crate::core::providers::{ProviderError, ProviderResult};
use crate::core::types::{ChatRequest, ChatResponse, FinishReason, Usage};

use super::config::OpenAiConfig;

const PROVIDER: &str = "openai";

/// HTTP client for the OpenAI chat completions endpoint
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    config: OpenAiConfig,
    http_client: Client,
}

impl OpenAiClient {
    pub fn new(config: OpenAiConfig) -> Result<Self, ProviderError> {
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
        let url = format!(
            "{}/v1/chat/completions",
            self.config.base_url.trim_end_matches('/')
        );
        let body = build_request_body(request);

        let mut builder = self.http_client.post(&url).json(&body);
        if let Some(api_key) = &self.config.api_key {
            builder = builder.bearer_auth(api_key);
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

/// Build the vendor request body; messages pass through unchanged
pub(super) fn build_request_body(request: &ChatRequest) -> Value {
    let mut body = json!({
        "model": request.model,
        "messages": request.messages,
    });

    if let Some(temperature) = request.temperature {
        body["temperature"] = json!(temperature);
    }
    if let Some(max_tokens) = request.max_tokens {
        body["max_tokens"] = json!(max_tokens);
    }

    body
}

/// Translate the vendor response into the uniform shape
pub(super) fn parse_response_body(text: &str) -> ProviderResult {
    let value: Value = serde_json::from_str(text)
        .map_err(|e| ProviderError::parse(PROVIDER, e.to_string()))?;

    let choice = value
        .get("choices")
        .and_then(|c| c.get(0))
        .ok_or_else(|| ProviderError::parse(PROVIDER, "response has no choices"))?;

    let content = choice
        .pointer("/message/content")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    let finish_reason = match choice.get("finish_reason").and_then(Value::as_str) {
        Some("length") => FinishReason::Length,
        Some("content_filter") => FinishReason::ContentFilter,
        _ => FinishReason::Stop,
    };

    let usage = value.get("usage").map(parse_usage).unwrap_or_default();

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

fn parse_usage(value: &Value) -> Usage {
    let field = |name: &str| value.get(name).and_then(Value::as_u64).unwrap_or(0) as u32;
    Usage {
        prompt_tokens: field("prompt_tokens"),
        completion_tokens: field("completion_tokens"),
        total_tokens: field("total_tokens"),
    }
}
