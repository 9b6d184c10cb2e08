//! Error handling for the gateway
//!
//! This module defines the top-level error type used throughout the
//! gateway. Provider-level failures live in
//! [`crate::core::providers::ProviderError`] and are funneled into
//! [`GatewayError`] at the orchestrator boundary. HTTP response shaping
//! lives with the routes and middleware; errors here never render
//! themselves.

use crate::core::providers::ProviderError;
use crate::core::retry::RetryError;
use thiserror::Error;

/// Result type alias for the gateway
pub type Result<T> = std::result::Result<T, GatewayError>;

/// Main error type for the gateway
#[derive(Error, Debug)]
pub enum GatewayError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Unknown provider name
    #[error("Provider not found: {0}")]
    ProviderNotFound(String),

    /// A provider call that failed without entering the retry loop
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// A provider call whose retry budget was exhausted or short-circuited
    #[error("{0}")]
    Upstream(#[from] RetryError<ProviderError>),

    /// Per-request deadline elapsed
    #[error("Timeout error: {0}")]
    Timeout(String),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Metrics registry errors
    #[error("Monitoring error: {0}")]
    Monitoring(#[from] prometheus::Error),

    /// Internal server errors
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl GatewayError {
    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
