//! Prometheus metrics registry
//!
//! One process-wide registry created at server build time and shared
//! through the application state. Collectors are registered once here;
//! the rest of the gateway records through the helper methods.

use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounterVec, IntGaugeVec, Opts, Registry, TextEncoder,
};

use crate::core::circuit_breaker::CircuitState;
use crate::utils::error::Result;

/// Kinds of cache lookups distinguished by the hit/miss counters
#[derive(Debug, Clone, Copy)]
pub enum CacheKind {
    Idempotency,
    Coalescer,
}

impl CacheKind {
    fn label(self) -> &'static str {
        match self {
            CacheKind::Idempotency => "idempotency",
            CacheKind::Coalescer => "coalescer",
        }
    }
}

/// Process-wide metrics surface
pub struct GatewayMetrics {
    registry: Registry,
    http_request_duration: HistogramVec,
    http_requests_total: IntCounterVec,
    provider_latency: HistogramVec,
    tokens_total: IntCounterVec,
    cache_hits_total: IntCounterVec,
    cache_misses_total: IntCounterVec,
    circuit_breaker_state: IntGaugeVec,
    rate_limit_exceeded_total: IntCounterVec,
}

impl GatewayMetrics {
    pub fn new() -> Result<Self> {
        let registry = Registry::new();

        let http_request_duration = HistogramVec::new(
            HistogramOpts::new(
                "llm_gateway_http_request_duration_seconds",
                "HTTP request duration in seconds",
            )
            .buckets(vec![0.01, 0.05, 0.1, 0.3, 0.5, 1.0, 2.0, 5.0, 10.0]),
            &["method", "route", "status_code"],
        )?;

        let http_requests_total = IntCounterVec::new(
            Opts::new("llm_gateway_http_requests_total", "Total HTTP requests"),
            &["method", "route", "status_code"],
        )?;

        let provider_latency = HistogramVec::new(
            HistogramOpts::new(
                "llm_gateway_provider_latency_seconds",
                "Upstream provider call latency in seconds",
            )
            .buckets(vec![0.5, 1.0, 2.0, 5.0, 10.0, 20.0, 30.0, 60.0]),
            &["provider", "model", "status"],
        )?;

        let tokens_total = IntCounterVec::new(
            Opts::new("llm_gateway_tokens_total", "Tokens consumed by provider calls"),
            &["provider", "model", "type"],
        )?;

        let cache_hits_total = IntCounterVec::new(
            Opts::new("llm_gateway_cache_hits_total", "Cache hits"),
            &["type"],
        )?;

        let cache_misses_total = IntCounterVec::new(
            Opts::new("llm_gateway_cache_misses_total", "Cache misses"),
            &["type"],
        )?;

        let circuit_breaker_state = IntGaugeVec::new(
            Opts::new(
                "llm_gateway_circuit_breaker_state",
                "Circuit breaker state (0=closed, 1=open, 2=half-open)",
            ),
            &["provider"],
        )?;

        let rate_limit_exceeded_total = IntCounterVec::new(
            Opts::new(
                "llm_gateway_rate_limit_exceeded_total",
                "Requests rejected by the rate limiter",
            ),
            &["key"],
        )?;

        registry.register(Box::new(http_request_duration.clone()))?;
        registry.register(Box::new(http_requests_total.clone()))?;
        registry.register(Box::new(provider_latency.clone()))?;
        registry.register(Box::new(tokens_total.clone()))?;
        registry.register(Box::new(cache_hits_total.clone()))?;
        registry.register(Box::new(cache_misses_total.clone()))?;
        registry.register(Box::new(circuit_breaker_state.clone()))?;
        registry.register(Box::new(rate_limit_exceeded_total.clone()))?;

        #[cfg(target_os = "linux")]
        registry.register(Box::new(
            prometheus::process_collector::ProcessCollector::for_self(),
        ))?;

        Ok(Self {
            registry,
            http_request_duration,
            http_requests_total,
            provider_latency,
            tokens_total,
            cache_hits_total,
            cache_misses_total,
            circuit_breaker_state,
            rate_limit_exceeded_total,
        })
    }

    /// Record one completed HTTP request
    pub fn observe_http_request(
        &self,
        method: &str,
        route: &str,
        status_code: u16,
        duration_secs: f64,
    ) {
        let status = status_code.to_string();
        self.http_request_duration
            .with_label_values(&[method, route, &status])
            .observe(duration_secs);
        self.http_requests_total
            .with_label_values(&[method, route, &status])
            .inc();
    }

    /// Record one upstream provider call
    pub fn observe_provider_call(
        &self,
        provider: &str,
        model: &str,
        success: bool,
        duration_secs: f64,
    ) {
        let status = if success { "success" } else { "error" };
        self.provider_latency
            .with_label_values(&[provider, model, status])
            .observe(duration_secs);
    }

    /// Record token usage for a successful call
    pub fn add_tokens(&self, provider: &str, model: &str, prompt: u64, completion: u64) {
        self.tokens_total
            .with_label_values(&[provider, model, "prompt"])
            .inc_by(prompt);
        self.tokens_total
            .with_label_values(&[provider, model, "completion"])
            .inc_by(completion);
    }

    /// Record a cache hit
    pub fn cache_hit(&self, kind: CacheKind) {
        self.cache_hits_total
            .with_label_values(&[kind.label()])
            .inc();
    }

    /// Record a cache miss
    pub fn cache_miss(&self, kind: CacheKind) {
        self.cache_misses_total
            .with_label_values(&[kind.label()])
            .inc();
    }

    /// Record a breaker transition on the state gauge
    pub fn set_circuit_breaker_state(&self, provider: &str, state: CircuitState) {
        self.circuit_breaker_state
            .with_label_values(&[provider])
            .set(state.as_gauge());
    }

    /// Record a rate-limit rejection
    pub fn rate_limit_exceeded(&self, key: &str) {
        self.rate_limit_exceeded_total
            .with_label_values(&[key])
            .inc();
    }

    /// Render the registry in Prometheus text exposition format
    pub fn export(&self) -> Result<(String, String)> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        let body = String::from_utf8(buffer)
            .map_err(|e| crate::utils::error::GatewayError::internal(e.to_string()))?;
        Ok((body, encoder.format_type().to_string()))
    }
}
