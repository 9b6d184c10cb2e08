//! Provider adapters
//!
//! Each adapter encapsulates one vendor's chat API behind the uniform
//! [`ChatProvider`] capability. Adapters classify their own failures so
//! the retry driver can decide eligibility without inspecting vendor
//! payloads.

pub mod anthropic;
pub mod openai;
pub mod registry;

pub use anthropic::AnthropicProvider;
pub use openai::OpenAiProvider;
pub use registry::ProviderRegistry;

use crate::core::types::{ChatRequest, ChatResponse};
use async_trait::async_trait;

/// Result of a single provider call
///
/// A provider either yields a finished response or a classified error;
/// it never throws past this boundary.
pub type ProviderResult = std::result::Result<ChatResponse, ProviderError>;

/// Uniform chat capability over one vendor
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Registry name of this provider
    fn name(&self) -> &'static str;

    /// Execute one chat completion against the vendor
    async fn chat(&self, request: &ChatRequest) -> ProviderResult;
}

/// Unified provider error type - single error for all providers
///
/// Retryability is a property of the variant, not of the caller:
/// HTTP >= 500 and 429 are retryable, other vendor statuses are not,
/// transport-level failures are.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ProviderError {
    #[error("Authentication failed for {provider}: {message}")]
    Authentication {
        provider: &'static str,
        message: String,
    },

    #[error("Rate limit exceeded for {provider}: {message}")]
    RateLimit {
        provider: &'static str,
        message: String,
    },

    #[error("Invalid request for {provider}: {message}")]
    InvalidRequest {
        provider: &'static str,
        message: String,
    },

    #[error("API error from {provider} (status {status}): {message}")]
    Api {
        provider: &'static str,
        status: u16,
        message: String,
    },

    #[error("Network error for {provider}: {message}")]
    Network {
        provider: &'static str,
        message: String,
    },

    #[error("Request to {provider} timed out after {timeout_ms}ms")]
    Timeout {
        provider: &'static str,
        timeout_ms: u64,
    },

    #[error("Call to {provider} exceeded the {timeout_ms}ms call deadline")]
    CallTimeout {
        provider: &'static str,
        timeout_ms: u64,
    },

    #[error("Malformed response from {provider}: {message}")]
    Parse {
        provider: &'static str,
        message: String,
    },

    #[error("Circuit breaker is OPEN")]
    CircuitOpen { provider: &'static str },

    #[error("Configuration error for {provider}: {message}")]
    Configuration {
        provider: &'static str,
        message: String,
    },
}

impl ProviderError {
    /// Create an authentication error
    pub fn authentication(provider: &'static str, message: impl Into<String>) -> Self {
        Self::Authentication {
            provider,
            message: message.into(),
        }
    }

    /// Create a rate limit error
    pub fn rate_limit(provider: &'static str, message: impl Into<String>) -> Self {
        Self::RateLimit {
            provider,
            message: message.into(),
        }
    }

    /// Create an invalid request error
    pub fn invalid_request(provider: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            provider,
            message: message.into(),
        }
    }

    /// Create an API error from an HTTP status and body
    pub fn api(provider: &'static str, status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            provider,
            status,
            message: message.into(),
        }
    }

    /// Create a network error
    pub fn network(provider: &'static str, message: impl Into<String>) -> Self {
        Self::Network {
            provider,
            message: message.into(),
        }
    }

    /// Create a transport-level timeout error
    pub fn timeout(provider: &'static str, timeout_ms: u64) -> Self {
        Self::Timeout {
            provider,
            timeout_ms,
        }
    }

    /// Create the error for a call that outlived its enforced deadline
    pub fn call_timeout(provider: &'static str, timeout_ms: u64) -> Self {
        Self::CallTimeout {
            provider,
            timeout_ms,
        }
    }

    /// Create a parse error
    pub fn parse(provider: &'static str, message: impl Into<String>) -> Self {
        Self::Parse {
            provider,
            message: message.into(),
        }
    }

    /// Create the open-circuit fallback error
    pub fn circuit_open(provider: &'static str) -> Self {
        Self::CircuitOpen { provider }
    }

    /// Create a configuration error
    pub fn configuration(provider: &'static str, message: impl Into<String>) -> Self {
        Self::Configuration {
            provider,
            message: message.into(),
        }
    }

    /// Map an HTTP status plus response body to a classified error
    pub fn from_http_status(provider: &'static str, status: u16, body: &str) -> Self {
        match status {
            400 => Self::invalid_request(provider, body),
            401 | 403 => Self::authentication(provider, "invalid or missing API key"),
            429 => Self::rate_limit(provider, body),
            _ => Self::api(provider, status, body),
        }
    }

    /// Whether a retry could plausibly succeed
    ///
    /// An enforced call deadline is terminal: re-running a call that
    /// already outlived its deadline only spends the remaining request
    /// budget on the same wait.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::RateLimit { .. } | Self::Network { .. } | Self::Timeout { .. } => true,
            Self::Parse { .. } => true,
            Self::Api { status, .. } => *status >= 500 || *status == 429,
            Self::Authentication { .. }
            | Self::InvalidRequest { .. }
            | Self::CallTimeout { .. }
            | Self::CircuitOpen { .. }
            | Self::Configuration { .. } => false,
        }
    }

    /// Name of the provider that produced this error
    pub fn provider(&self) -> &'static str {
        match self {
            Self::Authentication { provider, .. }
            | Self::RateLimit { provider, .. }
            | Self::InvalidRequest { provider, .. }
            | Self::Api { provider, .. }
            | Self::Network { provider, .. }
            | Self::Timeout { provider, .. }
            | Self::CallTimeout { provider, .. }
            | Self::Parse { provider, .. }
            | Self::CircuitOpen { provider }
            | Self::Configuration { provider, .. } => provider,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_errors_and_429_are_retryable() {
        assert!(ProviderError::api("openai", 500, "boom").is_retryable());
        assert!(ProviderError::api("openai", 503, "overloaded").is_retryable());
        assert!(ProviderError::rate_limit("openai", "slow down").is_retryable());
    }

    #[test]
    fn client_errors_are_not_retryable() {
        assert!(!ProviderError::from_http_status("openai", 400, "bad").is_retryable());
        assert!(!ProviderError::from_http_status("openai", 401, "").is_retryable());
        assert!(!ProviderError::api("openai", 404, "missing").is_retryable());
    }

    #[test]
    fn transport_failures_are_retryable() {
        assert!(ProviderError::network("anthropic", "connection reset").is_retryable());
        assert!(ProviderError::timeout("anthropic", 30_000).is_retryable());
    }

    #[test]
    fn enforced_call_deadline_is_not_retryable() {
        assert!(!ProviderError::call_timeout("anthropic", 30_000).is_retryable());
    }

    #[test]
    fn circuit_open_is_terminal_and_named() {
        let err = ProviderError::circuit_open("openai");
        assert!(!err.is_retryable());
        assert_eq!(err.to_string(), "Circuit breaker is OPEN");
    }
}
