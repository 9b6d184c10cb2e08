//! Configuration management for the gateway
//!
//! Configuration is environment-driven: every knob has a documented
//! default and an environment variable override. Unparseable values are
//! configuration errors, not silent fallbacks.

pub mod models;

pub use models::*;

use std::env;
use std::str::FromStr;

use tracing::{debug, info};

use crate::utils::error::{GatewayError, Result};

/// Main configuration struct for the gateway
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Gateway configuration
    pub gateway: GatewayConfig,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        info!("Loading configuration from environment variables");

        let mut gateway = GatewayConfig::default();

        gateway.server.port = env_parse("PORT", gateway.server.port)?;
        gateway.default_provider =
            env::var("DEFAULT_PROVIDER").unwrap_or(gateway.default_provider);

        gateway.openai.api_key = env::var("OPENAI_API_KEY").ok();
        gateway.openai.base_url = env::var("OPENAI_BASE_URL").ok();
        gateway.anthropic.api_key = env::var("ANTHROPIC_API_KEY").ok();
        gateway.anthropic.base_url = env::var("ANTHROPIC_BASE_URL").ok();

        gateway.rate_limit.max_requests =
            env_parse("RATE_LIMIT_MAX", gateway.rate_limit.max_requests)?;
        gateway.rate_limit.window_ms =
            env_parse("RATE_LIMIT_WINDOW_MS", gateway.rate_limit.window_ms)?;

        gateway.retry.max_attempts = env_parse("RETRY_MAX_ATTEMPTS", gateway.retry.max_attempts)?;
        gateway.retry.initial_delay_ms =
            env_parse("RETRY_INITIAL_DELAY_MS", gateway.retry.initial_delay_ms)?;
        gateway.retry.max_delay_ms = env_parse("RETRY_MAX_DELAY_MS", gateway.retry.max_delay_ms)?;

        gateway.circuit_breaker.timeout_ms =
            env_parse("CIRCUIT_TIMEOUT_MS", gateway.circuit_breaker.timeout_ms)?;
        gateway.circuit_breaker.error_threshold_percentage = env_parse(
            "CIRCUIT_ERROR_THRESHOLD",
            gateway.circuit_breaker.error_threshold_percentage,
        )?;
        gateway.circuit_breaker.reset_timeout_ms = env_parse(
            "CIRCUIT_RESET_TIMEOUT_MS",
            gateway.circuit_breaker.reset_timeout_ms,
        )?;

        gateway.idempotency.ttl_ms = env_parse("IDEMPOTENCY_TTL_MS", gateway.idempotency.ttl_ms)?;

        let config = Self { gateway };
        config.validate()?;

        debug!("Configuration loaded successfully");
        Ok(config)
    }

    /// Check cross-field constraints
    pub fn validate(&self) -> Result<()> {
        let gateway = &self.gateway;

        if gateway.default_provider != "openai" && gateway.default_provider != "anthropic" {
            return Err(GatewayError::config(format!(
                "unknown default provider: {}",
                gateway.default_provider
            )));
        }
        if gateway.retry.max_attempts == 0 {
            return Err(GatewayError::config("RETRY_MAX_ATTEMPTS must be at least 1"));
        }
        if gateway.retry.factor <= 1.0 {
            return Err(GatewayError::config("retry factor must be greater than 1"));
        }
        if gateway.circuit_breaker.error_threshold_percentage > 100 {
            return Err(GatewayError::config(
                "CIRCUIT_ERROR_THRESHOLD must be a percentage (0-100)",
            ));
        }
        if gateway.rate_limit.max_requests == 0 {
            return Err(GatewayError::config("RATE_LIMIT_MAX must be at least 1"));
        }
        if gateway.rate_limit.window_ms == 0 {
            return Err(GatewayError::config("RATE_LIMIT_WINDOW_MS must be positive"));
        }

        Ok(())
    }

    /// Get server configuration
    pub fn server(&self) -> &ServerConfig {
        &self.gateway.server
    }
}

fn env_parse<T: FromStr>(name: &str, default: T) -> Result<T> {
    match env::var(name) {
        Ok(raw) => raw
            .parse()
            .map_err(|_| GatewayError::config(format!("invalid value for {}: {}", name, raw))),
        Err(_) => Ok(default),
    }
}
