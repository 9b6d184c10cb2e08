//! Configuration models
//!
//! One sub-config per gateway component, each carrying the documented
//! defaults so a bare environment still yields a runnable gateway.

use serde::{Deserialize, Serialize};

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address
    pub host: String,
    /// Listen port
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

/// One upstream provider's credentials and endpoint
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// API key; unset means unauthenticated calls that will fail upstream
    pub api_key: Option<String>,
    /// Base URL override for tests and proxies
    pub base_url: Option<String>,
}

/// Retry driver configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Total attempts including the first
    pub max_attempts: u32,
    /// Delay before the second attempt, in milliseconds
    pub initial_delay_ms: u64,
    /// Ceiling on any backoff delay, in milliseconds
    pub max_delay_ms: u64,
    /// Backoff multiplier
    pub factor: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay_ms: 100,
            max_delay_ms: 5000,
            factor: 2.0,
        }
    }
}

/// Circuit breaker configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CircuitBreakerConfig {
    /// Per-call timeout, in milliseconds
    pub timeout_ms: u64,
    /// Error percentage that opens the circuit
    pub error_threshold_percentage: u32,
    /// Minimum outcomes before the threshold applies
    pub min_samples: u32,
    /// Rolling statistics window, in milliseconds
    pub window_ms: u64,
    /// Open duration before a probe is admitted, in milliseconds
    pub reset_timeout_ms: u64,
}

impl Default for CircuitBreakerConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 30_000,
            error_threshold_percentage: 50,
            min_samples: 5,
            window_ms: 10_000,
            reset_timeout_ms: 60_000,
        }
    }
}

/// Rate limiter configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Requests admitted per key per window
    pub max_requests: u32,
    /// Window length, in milliseconds
    pub window_ms: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: 100,
            window_ms: 60_000,
        }
    }
}

/// Idempotency cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdempotencyConfig {
    /// Entry lifetime, in milliseconds
    pub ttl_ms: u64,
}

impl Default for IdempotencyConfig {
    fn default() -> Self {
        Self { ttl_ms: 3_600_000 }
    }
}

/// Request coalescer configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoalescerConfig {
    /// Whether concurrent duplicate requests share one upstream call
    pub enabled: bool,
    /// Maximum staleness of a joinable in-flight entry, in milliseconds
    pub window_ms: u64,
}

impl Default for CoalescerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            window_ms: 100,
        }
    }
}

/// Top-level gateway configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    pub server: ServerConfig,
    pub openai: ProviderConfig,
    pub anthropic: ProviderConfig,
    /// Provider used when a request names none
    pub default_provider: String,
    /// Default ceiling for one whole orchestrated request, in milliseconds
    pub request_timeout_ms: u64,
    pub retry: RetryConfig,
    pub circuit_breaker: CircuitBreakerConfig,
    pub rate_limit: RateLimitConfig,
    pub idempotency: IdempotencyConfig,
    pub coalescer: CoalescerConfig,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            openai: ProviderConfig::default(),
            anthropic: ProviderConfig::default(),
            default_provider: "openai".to_string(),
            request_timeout_ms: 30_000,
            retry: RetryConfig::default(),
            circuit_breaker: CircuitBreakerConfig::default(),
            rate_limit: RateLimitConfig::default(),
            idempotency: IdempotencyConfig::default(),
            coalescer: CoalescerConfig::default(),
        }
    }
}
