//! HTTP-edge request schema
//!
//! The wire shape of `POST /v1/chat/completions`. Serde handles shape
//! errors (missing fields, wrong types); range checks live in
//! [`crate::utils::validation`].

use serde::{Deserialize, Serialize};

use crate::core::types::{ChatMessage, ChatRequest};

/// Request body for the chat completions endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatCompletionRequest {
    /// Model identifier
    pub model: String,
    /// Conversation, at least one message
    pub messages: Vec<ChatMessage>,
    /// Sampling temperature in [0, 2]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    /// Maximum tokens to generate
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    /// Explicit provider name; the configured default applies when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    /// Per-request ceiling in milliseconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
}

impl ChatCompletionRequest {
    /// Strip the routing fields, leaving the provider-facing request
    pub fn into_chat_request(self) -> ChatRequest {
        ChatRequest {
            model: self.model,
            messages: self.messages,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        }
    }
}
