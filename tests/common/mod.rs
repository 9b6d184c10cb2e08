//! Shared test infrastructure

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use llm_gateway::config::{Config, GatewayConfig};
use llm_gateway::core::providers::{ChatProvider, ProviderError, ProviderRegistry, ProviderResult};
use llm_gateway::core::idempotency::IdempotencyCache;
use llm_gateway::core::orchestrator::Orchestrator;
use llm_gateway::core::rate_limiter::RateLimiter;
use llm_gateway::monitoring::metrics::GatewayMetrics;
use llm_gateway::server::AppState;
use llm_gateway::{ChatMessage, ChatRequest, ChatResponse, FinishReason, Usage};

/// Behavior of a scripted provider
pub enum Behavior {
    /// Always succeed
    Succeed,
    /// Always fail with a clone of this error
    Fail(ProviderError),
    /// Fail the first N calls, then succeed
    FailFirst(u32, ProviderError),
}

/// Test provider with a scripted outcome and a call counter
pub struct ScriptedProvider {
    name: &'static str,
    behavior: Behavior,
    delay: Option<Duration>,
    calls: AtomicU32,
}

impl ScriptedProvider {
    pub fn new(behavior: Behavior) -> Self {
        Self {
            name: "openai",
            behavior,
            delay: None,
            calls: AtomicU32::new(0),
        }
    }

    pub fn named(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// How many times `chat` has been invoked
    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChatProvider for ScriptedProvider {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn chat(&self, request: &ChatRequest) -> ProviderResult {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match &self.behavior {
            Behavior::Succeed => Ok(test_response(&format!("resp-{}", call), &request.model)),
            Behavior::Fail(error) => Err(error.clone()),
            Behavior::FailFirst(n, error) => {
                if call <= *n {
                    Err(error.clone())
                } else {
                    Ok(test_response(&format!("resp-{}", call), &request.model))
                }
            }
        }
    }
}

/// A finished response with the given id
pub fn test_response(id: &str, model: &str) -> ChatResponse {
    ChatResponse {
        id: id.to_string(),
        content: "scripted reply".to_string(),
        model: model.to_string(),
        finish_reason: FinishReason::Stop,
        usage: Usage::new(12, 5),
    }
}

/// A minimal valid chat request
pub fn chat_request(model: &str) -> ChatRequest {
    ChatRequest {
        model: model.to_string(),
        messages: vec![ChatMessage::user("hello")],
        temperature: None,
        max_tokens: None,
    }
}

/// Gateway config tuned for fast tests: millisecond backoff, small
/// breaker window
pub fn fast_config() -> GatewayConfig {
    let mut config = GatewayConfig::default();
    config.retry.initial_delay_ms = 1;
    config.retry.max_delay_ms = 5;
    config.circuit_breaker.min_samples = 4;
    config.circuit_breaker.timeout_ms = 500;
    config.circuit_breaker.reset_timeout_ms = 40;
    config
}

/// Build an orchestrator over a single scripted provider
pub fn orchestrator_with(
    provider: Arc<ScriptedProvider>,
    config: &GatewayConfig,
) -> Orchestrator {
    let mut registry = ProviderRegistry::new();
    registry.register(provider);
    Orchestrator::new(
        registry,
        config,
        Arc::new(GatewayMetrics::new().unwrap()),
    )
}

/// Build full app state over a single scripted provider, mirroring the
/// production assembly
pub fn state_with(provider: Arc<ScriptedProvider>, gateway: GatewayConfig) -> AppState {
    let metrics = Arc::new(GatewayMetrics::new().unwrap());
    let mut registry = ProviderRegistry::new();
    registry.register(provider);

    let orchestrator = Orchestrator::new(registry, &gateway, Arc::clone(&metrics));
    let rate_limiter = RateLimiter::new(
        gateway.rate_limit.max_requests,
        gateway.rate_limit.window_ms,
        Arc::clone(&metrics),
    );
    let idempotency = IdempotencyCache::new(Duration::from_millis(gateway.idempotency.ttl_ms));

    AppState::new(
        Config { gateway },
        orchestrator,
        rate_limiter,
        idempotency,
        metrics,
    )
}
