//! Orchestrator
//!
//! Owns the provider registry, the per-provider breakers, the coalescer
//! and the retry policy, and composes them into one `chat` operation:
//! retry(coalesce(breaker(provider.chat))), bounded by the per-request
//! deadline. Non-retryable provider results, including the breaker's
//! open-circuit fallback, short-circuit the retry loop.

use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use futures::future::Either;
use tracing::{debug, error};

use crate::config::GatewayConfig;
use crate::core::circuit_breaker::{CircuitBreaker, CircuitBreakerConfig, CircuitState};
use crate::core::coalescer::RequestCoalescer;
use crate::core::providers::{ChatProvider, ProviderError, ProviderRegistry, ProviderResult};
use crate::core::retry::{self, RetryPolicy};
use crate::core::types::{ChatRequest, ChatResponse};
use crate::monitoring::metrics::GatewayMetrics;
use crate::utils::error::{GatewayError, Result};

/// Composition root of the reliability pipeline
pub struct Orchestrator {
    registry: ProviderRegistry,
    breakers: DashMap<&'static str, Arc<CircuitBreaker>>,
    coalescer: Option<RequestCoalescer>,
    retry_policy: RetryPolicy,
    breaker_config: CircuitBreakerConfig,
    default_provider: String,
    default_request_timeout: Duration,
    metrics: Arc<GatewayMetrics>,
}

impl Orchestrator {
    pub fn new(
        registry: ProviderRegistry,
        config: &GatewayConfig,
        metrics: Arc<GatewayMetrics>,
    ) -> Self {
        let coalescer = config.coalescer.enabled.then(|| {
            RequestCoalescer::new(
                Duration::from_millis(config.coalescer.window_ms),
                Arc::clone(&metrics),
            )
        });

        Self {
            registry,
            breakers: DashMap::new(),
            coalescer,
            retry_policy: RetryPolicy {
                max_attempts: config.retry.max_attempts,
                initial_delay: Duration::from_millis(config.retry.initial_delay_ms),
                max_delay: Duration::from_millis(config.retry.max_delay_ms),
                factor: config.retry.factor,
            },
            breaker_config: CircuitBreakerConfig {
                call_timeout: Duration::from_millis(config.circuit_breaker.timeout_ms),
                error_threshold_percentage: config.circuit_breaker.error_threshold_percentage,
                min_samples: config.circuit_breaker.min_samples,
                window: Duration::from_millis(config.circuit_breaker.window_ms),
                reset_timeout: Duration::from_millis(config.circuit_breaker.reset_timeout_ms),
            },
            default_provider: config.default_provider.clone(),
            default_request_timeout: Duration::from_millis(config.request_timeout_ms),
            metrics,
        }
    }

    /// Run one chat completion through the full pipeline
    ///
    /// `provider_name` falls back to the configured default; `timeout`
    /// falls back to the configured per-request ceiling.
    pub async fn chat(
        &self,
        request: ChatRequest,
        provider_name: Option<&str>,
        timeout: Option<Duration>,
    ) -> Result<ChatResponse> {
        let name = provider_name.unwrap_or(&self.default_provider);
        let provider = self
            .registry
            .get(name)
            .ok_or_else(|| GatewayError::ProviderNotFound(name.to_string()))?;
        let provider_name = provider.name();

        let breaker = self.breaker_for(provider_name);
        let key = fingerprint(provider_name, &request)?;
        let deadline = timeout.unwrap_or(self.default_request_timeout);

        debug!(provider = provider_name, model = %request.model, "dispatching chat request");

        let attempt = || {
            let call = protected_call(
                Arc::clone(&provider),
                Arc::clone(&breaker),
                Arc::clone(&self.metrics),
                request.clone(),
            );
            match &self.coalescer {
                Some(coalescer) => Either::Left(coalescer.execute(&key, move || call)),
                None => Either::Right(call),
            }
        };

        let outcome = tokio::time::timeout(
            deadline,
            retry::run(&self.retry_policy, ProviderError::is_retryable, attempt),
        )
        .await;

        match outcome {
            Err(_) => Err(GatewayError::Timeout(format!(
                "request timed out after {}ms",
                deadline.as_millis()
            ))),
            Ok(Err(retry_err)) => {
                error!(
                    provider = provider_name,
                    attempts = retry_err.attempts,
                    error = %retry_err.last,
                    "chat request failed"
                );
                Err(GatewayError::Upstream(retry_err))
            }
            Ok(Ok(response)) => {
                self.metrics.add_tokens(
                    provider_name,
                    &response.model,
                    response.usage.prompt_tokens as u64,
                    response.usage.completion_tokens as u64,
                );
                Ok(response)
            }
        }
    }

    /// Breaker state for a provider, if one has been created
    pub fn breaker_state(&self, provider: &str) -> Option<CircuitState> {
        self.breakers.get(provider).map(|breaker| breaker.state())
    }

    /// Registered provider names
    pub fn providers(&self) -> Vec<String> {
        self.registry.list()
    }

    fn breaker_for(&self, provider: &'static str) -> Arc<CircuitBreaker> {
        self.breakers
            .entry(provider)
            .or_insert_with(|| {
                Arc::new(CircuitBreaker::new(
                    provider,
                    self.breaker_config.clone(),
                    Arc::clone(&self.metrics),
                ))
            })
            .clone()
    }
}

/// One breaker-protected provider call with latency accounting
fn protected_call(
    provider: Arc<dyn ChatProvider>,
    breaker: Arc<CircuitBreaker>,
    metrics: Arc<GatewayMetrics>,
    request: ChatRequest,
) -> impl std::future::Future<Output = ProviderResult> + Send + 'static {
    async move {
        breaker
            .fire(move || async move {
                let started = Instant::now();
                let result = provider.chat(&request).await;
                metrics.observe_provider_call(
                    provider.name(),
                    &request.model,
                    result.is_ok(),
                    started.elapsed().as_secs_f64(),
                );
                result
            })
            .await
    }
}

/// Canonical textual fingerprint of a request for coalescing
///
/// Key equality is textual; two requests coalesce only when they
/// serialize identically.
pub fn fingerprint(provider: &str, request: &ChatRequest) -> Result<String> {
    let canonical = serde_json::json!({
        "provider": provider,
        "model": request.model,
        "messages": request.messages,
        "temperature": request.temperature,
        "maxTokens": request.max_tokens,
    });
    Ok(serde_json::to_string(&canonical)?)
}
