//! Orchestrator pipeline tests
//!
//! Exercises the retry/breaker/provider composition with scripted
//! providers.

use std::sync::Arc;
use std::time::Duration;

use llm_gateway::core::circuit_breaker::CircuitState;
use llm_gateway::core::providers::ProviderError;
use llm_gateway::utils::error::GatewayError;

use crate::common::{chat_request, fast_config, orchestrator_with, Behavior, ScriptedProvider};

#[tokio::test]
async fn recovers_from_transient_failures() {
    let provider = Arc::new(ScriptedProvider::new(Behavior::FailFirst(
        2,
        ProviderError::api("openai", 503, "overloaded"),
    )));
    let orchestrator = orchestrator_with(Arc::clone(&provider), &fast_config());

    let response = orchestrator
        .chat(chat_request("gpt-4"), None, None)
        .await
        .unwrap();

    assert_eq!(response.id, "resp-3");
    assert_eq!(provider.calls(), 3);
}

#[tokio::test]
async fn exhausts_retry_budget_on_persistent_failure() {
    let provider = Arc::new(ScriptedProvider::new(Behavior::Fail(ProviderError::api(
        "openai",
        500,
        "down hard",
    ))));
    let orchestrator = orchestrator_with(Arc::clone(&provider), &fast_config());

    let err = orchestrator
        .chat(chat_request("gpt-4"), None, None)
        .await
        .unwrap_err();

    assert_eq!(provider.calls(), 3);
    let message = err.to_string();
    assert!(message.contains("3 attempts"), "got: {}", message);
    assert!(message.contains("down hard"), "got: {}", message);
}

#[tokio::test]
async fn non_retryable_failure_short_circuits() {
    let provider = Arc::new(ScriptedProvider::new(Behavior::Fail(
        ProviderError::invalid_request("openai", "bad prompt"),
    )));
    let orchestrator = orchestrator_with(Arc::clone(&provider), &fast_config());

    let err = orchestrator
        .chat(chat_request("gpt-4"), None, None)
        .await
        .unwrap_err();

    assert_eq!(provider.calls(), 1);
    assert!(err.to_string().contains("bad prompt"));
}

#[tokio::test]
async fn open_breaker_returns_fallback_without_calling_provider() {
    let provider = Arc::new(ScriptedProvider::new(Behavior::Fail(ProviderError::api(
        "openai",
        500,
        "meltdown",
    ))));
    let mut config = fast_config();
    // Keep the breaker open well past the end of the test.
    config.circuit_breaker.reset_timeout_ms = 60_000;
    let orchestrator = orchestrator_with(Arc::clone(&provider), &config);

    // Burn enough failures to cross the threshold (min_samples = 4).
    for _ in 0..2 {
        let _ = orchestrator.chat(chat_request("gpt-4"), None, None).await;
    }
    assert_eq!(
        orchestrator.breaker_state("openai"),
        Some(CircuitState::Open)
    );

    let calls_before = provider.calls();
    let err = orchestrator
        .chat(chat_request("gpt-4"), None, None)
        .await
        .unwrap_err();

    assert_eq!(provider.calls(), calls_before);
    assert!(err.to_string().contains("Circuit breaker is OPEN"));
}

#[tokio::test]
async fn breaker_recovers_through_half_open_probe() {
    let provider = Arc::new(ScriptedProvider::new(Behavior::FailFirst(
        4,
        ProviderError::api("openai", 500, "flapping"),
    )));
    let orchestrator = orchestrator_with(Arc::clone(&provider), &fast_config());

    // Open the breaker.
    for _ in 0..2 {
        let _ = orchestrator.chat(chat_request("gpt-4"), None, None).await;
    }
    assert_eq!(
        orchestrator.breaker_state("openai"),
        Some(CircuitState::Open)
    );

    // Wait out the reset timeout; the next call is the probe and succeeds.
    tokio::time::sleep(Duration::from_millis(60)).await;
    let response = orchestrator
        .chat(chat_request("gpt-4"), None, None)
        .await
        .unwrap();
    assert_eq!(response.content, "scripted reply");
    assert_eq!(
        orchestrator.breaker_state("openai"),
        Some(CircuitState::Closed)
    );
}

#[tokio::test]
async fn breaker_call_deadline_is_not_retried() {
    let provider = Arc::new(
        ScriptedProvider::new(Behavior::Succeed).with_delay(Duration::from_millis(100)),
    );
    let mut config = fast_config();
    config.circuit_breaker.timeout_ms = 30;
    let orchestrator = orchestrator_with(Arc::clone(&provider), &config);

    let err = orchestrator
        .chat(chat_request("gpt-4"), None, None)
        .await
        .unwrap_err();

    // The call outlived the breaker's deadline; the retry driver does
    // not re-run it.
    assert_eq!(provider.calls(), 1);
    let message = err.to_string();
    assert!(message.contains("1 attempts"), "got: {}", message);
    assert!(message.contains("call deadline"), "got: {}", message);
}

#[tokio::test]
async fn per_request_timeout_abandons_retries() {
    let provider = Arc::new(
        ScriptedProvider::new(Behavior::Succeed).with_delay(Duration::from_millis(200)),
    );
    let orchestrator = orchestrator_with(Arc::clone(&provider), &fast_config());

    let err = orchestrator
        .chat(
            chat_request("gpt-4"),
            None,
            Some(Duration::from_millis(30)),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, GatewayError::Timeout(_)));
}

#[tokio::test]
async fn provider_resolution_uses_request_name() {
    let provider = Arc::new(ScriptedProvider::new(Behavior::Succeed).named("anthropic"));
    let orchestrator = orchestrator_with(Arc::clone(&provider), &fast_config());

    // The default provider (openai) is not registered here.
    let err = orchestrator
        .chat(chat_request("claude-3-haiku-20240307"), None, None)
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Provider not found: openai");

    let response = orchestrator
        .chat(chat_request("claude-3-haiku-20240307"), Some("anthropic"), None)
        .await
        .unwrap();
    assert_eq!(response.model, "claude-3-haiku-20240307");
}
