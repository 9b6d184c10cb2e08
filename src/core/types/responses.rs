//! Response types
//!
//! Defines the unified chat response every adapter emits. Serialization
//! uses the camelCase wire names the HTTP surface exposes, so a cached
//! response replays byte-for-byte.

use serde::{Deserialize, Serialize};

/// Unified chat completion response
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    /// Vendor-assigned response identifier
    pub id: String,

    /// Generated text
    pub content: String,

    /// Model that produced the response
    pub model: String,

    /// Why generation stopped
    pub finish_reason: FinishReason,

    /// Token accounting, zeroed when the vendor omits it
    pub usage: Usage,
}

/// Completion reason
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    /// Natural end of output
    Stop,
    /// Output truncated by the max-token budget
    Length,
    /// Vendor explicitly filtered the content
    ContentFilter,
}

/// Token usage statistics
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Usage {
    /// Tokens consumed by the prompt
    pub prompt_tokens: u32,
    /// Tokens generated in the completion
    pub completion_tokens: u32,
    /// Sum reported by the vendor
    pub total_tokens: u32,
}

impl Usage {
    pub fn new(prompt_tokens: u32, completion_tokens: u32) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens + completion_tokens,
        }
    }
}
