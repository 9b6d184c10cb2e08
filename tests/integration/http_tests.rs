//! HTTP surface tests
//!
//! Drives the in-process Actix app through the same assembly the binary
//! uses: middleware, JSON config and routes over scripted providers.

use std::sync::Arc;

use actix_web::{test, web, App};
use serde_json::{json, Value};

use llm_gateway::core::providers::ProviderError;
use llm_gateway::server::{self, middleware, routes, AppState};

use crate::common::{fast_config, state_with, Behavior, ScriptedProvider};

macro_rules! init_app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($state))
                .app_data(server::json_config())
                .wrap(middleware::MetricsMiddleware)
                .wrap(middleware::RequestIdMiddleware)
                .configure(routes::configure),
        )
        .await
    };
}

fn default_state() -> (Arc<ScriptedProvider>, AppState) {
    let provider = Arc::new(ScriptedProvider::new(Behavior::Succeed));
    let state = state_with(Arc::clone(&provider), fast_config());
    (provider, state)
}

fn valid_body() -> Value {
    json!({
        "model": "gpt-4",
        "messages": [{"role": "user", "content": "hello"}]
    })
}

#[actix_web::test]
async fn health_reports_healthy_with_request_id() {
    let (_, state) = default_state();
    let app = init_app!(state);

    let resp = test::call_service(&app, test::TestRequest::get().uri("/health").to_request()).await;
    assert_eq!(resp.status(), 200);
    assert!(!resp
        .headers()
        .get("x-request-id")
        .unwrap()
        .to_str()
        .unwrap()
        .is_empty());

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "healthy");
    assert!(body["uptime"].is_number());
    assert!(body["requestId"].is_string());
}

#[actix_web::test]
async fn metrics_exposes_prometheus_text() {
    let (_, state) = default_state();
    let app = init_app!(state);

    let resp =
        test::call_service(&app, test::TestRequest::get().uri("/metrics").to_request()).await;
    assert_eq!(resp.status(), 200);
    let body = test::read_body(resp).await;
    let text = String::from_utf8(body.to_vec()).unwrap();
    assert!(text.contains("llm_gateway_http_requests_total"));
}

#[actix_web::test]
async fn rejects_unknown_schema() {
    let (_, state) = default_state();
    let app = init_app!(state);

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/v1/chat/completions")
            .set_json(json!({"invalid": "schema"}))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 400);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Validation error");
}

#[actix_web::test]
async fn rejects_malformed_json() {
    let (_, state) = default_state();
    let app = init_app!(state);

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/v1/chat/completions")
            .insert_header(("content-type", "application/json"))
            .set_payload("invalid json{{{")
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 400);
}

#[actix_web::test]
async fn rejects_missing_messages() {
    let (_, state) = default_state();
    let app = init_app!(state);

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/v1/chat/completions")
            .set_json(json!({"model": "gpt-4"}))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 400);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Validation error");
}

#[actix_web::test]
async fn rejects_semantic_violations_with_details() {
    let (_, state) = default_state();
    let app = init_app!(state);

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/v1/chat/completions")
            .set_json(json!({
                "model": "gpt-4",
                "messages": [{"role": "user", "content": "hi"}],
                "temperature": 3.5
            }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 400);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Validation error");
    assert_eq!(body["details"][0]["field"], "temperature");
}

#[actix_web::test]
async fn successful_completion_with_rate_limit_headers() {
    let (provider, state) = default_state();
    let app = init_app!(state);

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/v1/chat/completions")
            .set_json(valid_body())
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 200);

    let headers = resp.headers();
    assert_eq!(headers.get("x-ratelimit-limit").unwrap(), "100");
    let remaining: u32 = headers
        .get("x-ratelimit-remaining")
        .unwrap()
        .to_str()
        .unwrap()
        .parse()
        .unwrap();
    assert_eq!(remaining, 99);
    let reset = headers.get("x-ratelimit-reset").unwrap().to_str().unwrap();
    assert!(chrono::DateTime::parse_from_rfc3339(reset).is_ok());

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["content"], "scripted reply");
    assert_eq!(body["finishReason"], "stop");
    assert_eq!(body["usage"]["promptTokens"], 12);
    assert_eq!(provider.calls(), 1);
}

#[actix_web::test]
async fn rate_limit_rejects_past_the_budget() {
    let provider = Arc::new(ScriptedProvider::new(Behavior::Succeed));
    let mut config = fast_config();
    config.rate_limit.max_requests = 3;
    let state = state_with(Arc::clone(&provider), config);
    let app = init_app!(state);

    let mut saw_rejection = false;
    for _ in 0..5 {
        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/v1/chat/completions")
                .set_json(valid_body())
                .to_request(),
        )
        .await;
        if resp.status() == 429 {
            saw_rejection = true;
            assert_eq!(resp.headers().get("x-ratelimit-remaining").unwrap(), "0");
            let body: Value = test::read_body_json(resp).await;
            assert_eq!(body["error"], "Too many requests");
            assert!(body["retryAfter"].is_number());
        }
    }
    assert!(saw_rejection);
    assert!(provider.calls() <= 3);
}

#[actix_web::test]
async fn idempotent_replay_returns_cached_body() {
    let (provider, state) = default_state();
    let app = init_app!(state);

    let first = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/v1/chat/completions")
            .insert_header(("x-idempotency-key", "abc-123"))
            .set_json(valid_body())
            .to_request(),
    )
    .await;
    assert_eq!(first.status(), 200);
    assert!(first.headers().get("x-cached").is_none());
    let first_body = test::read_body(first).await;

    // Different body, same key: the cached response replays verbatim.
    let second = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/v1/chat/completions")
            .insert_header(("x-idempotency-key", "abc-123"))
            .set_json(json!({
                "model": "gpt-4o",
                "messages": [{"role": "user", "content": "something else"}]
            }))
            .to_request(),
    )
    .await;
    assert_eq!(second.status(), 200);
    assert_eq!(second.headers().get("x-cached").unwrap(), "true");
    let second_body = test::read_body(second).await;

    assert_eq!(first_body, second_body);
    assert_eq!(provider.calls(), 1);
}

#[actix_web::test]
async fn failed_requests_are_not_cached() {
    let provider = Arc::new(ScriptedProvider::new(Behavior::FailFirst(
        3,
        ProviderError::api("openai", 500, "down"),
    )));
    let state = state_with(Arc::clone(&provider), fast_config());
    let app = init_app!(state);

    let first = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/v1/chat/completions")
            .insert_header(("x-idempotency-key", "key-9"))
            .set_json(valid_body())
            .to_request(),
    )
    .await;
    assert_eq!(first.status(), 500);
    let body: Value = test::read_body_json(first).await;
    assert_eq!(body["error"], "Internal server error");
    assert!(body["requestId"].is_string());

    // The failure was not stored; the next call reaches the provider.
    let second = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/v1/chat/completions")
            .insert_header(("x-idempotency-key", "key-9"))
            .set_json(valid_body())
            .to_request(),
    )
    .await;
    assert_eq!(second.status(), 200);
    assert!(second.headers().get("x-cached").is_none());
}

#[actix_web::test]
async fn request_id_is_echoed() {
    let (_, state) = default_state();
    let app = init_app!(state);

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/health")
            .insert_header(("x-request-id", "trace-42"))
            .to_request(),
    )
    .await;
    assert_eq!(resp.headers().get("x-request-id").unwrap(), "trace-42");
}
