//! HTTP server implementation
//!
//! Assembles the application state, middleware and routes, and runs the
//! Actix server.

pub mod middleware;
pub mod routes;
pub mod state;
pub mod types;

pub use state::AppState;

use std::sync::Arc;
use std::time::Duration;

use actix_cors::Cors;
use actix_web::{web, App, HttpServer as ActixHttpServer};
use tracing::info;

use crate::config::Config;
use crate::core::idempotency::IdempotencyCache;
use crate::core::orchestrator::Orchestrator;
use crate::core::providers::anthropic::{AnthropicConfig, AnthropicProvider};
use crate::core::providers::openai::{OpenAiConfig, OpenAiProvider};
use crate::core::providers::ProviderRegistry;
use crate::core::rate_limiter::RateLimiter;
use crate::monitoring::metrics::GatewayMetrics;
use crate::utils::error::{GatewayError, Result};

/// Load configuration from the environment and run the server
pub async fn run_server() -> Result<()> {
    let config = Config::from_env()?;
    run_with_config(config).await
}

/// Run the server with an explicit configuration
pub async fn run_with_config(config: Config) -> Result<()> {
    let state = build_state(config)?;
    let host = state.config.server().host.clone();
    let port = state.config.server().port;

    info!("Starting LLM gateway on {}:{}", host, port);

    let data = web::Data::new(state);
    ActixHttpServer::new(move || {
        App::new()
            .app_data(data.clone())
            .app_data(json_config())
            .wrap(middleware::MetricsMiddleware)
            .wrap(middleware::RequestIdMiddleware)
            .wrap(Cors::permissive())
            .configure(routes::configure)
    })
    .bind((host, port))?
    .run()
    .await?;

    info!("Server stopped");
    Ok(())
}

/// Build the shared application state from configuration
///
/// Public so integration tests can assemble the same app the binary runs.
pub fn build_state(config: Config) -> Result<AppState> {
    let metrics = Arc::new(GatewayMetrics::new()?);
    let registry = build_registry(&config)?;

    let orchestrator = Orchestrator::new(registry, &config.gateway, Arc::clone(&metrics));
    let rate_limiter = RateLimiter::new(
        config.gateway.rate_limit.max_requests,
        config.gateway.rate_limit.window_ms,
        Arc::clone(&metrics),
    );
    let idempotency = IdempotencyCache::new(Duration::from_millis(config.gateway.idempotency.ttl_ms));

    Ok(AppState::new(
        config,
        orchestrator,
        rate_limiter,
        idempotency,
        metrics,
    ))
}

/// JSON extractor configuration: malformed bodies become 400s with the
/// standard validation shape instead of Actix's default error text
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        let detail = err.to_string();
        actix_web::error::InternalError::from_response(
            err,
            actix_web::HttpResponse::BadRequest().json(serde_json::json!({
                "error": "Validation error",
                "details": [{"field": "body", "message": detail}],
            })),
        )
        .into()
    })
}

fn build_registry(config: &Config) -> Result<ProviderRegistry> {
    let mut registry = ProviderRegistry::new();

    let mut openai_config = OpenAiConfig {
        api_key: config.gateway.openai.api_key.clone(),
        ..OpenAiConfig::default()
    };
    if let Some(base_url) = &config.gateway.openai.base_url {
        openai_config.base_url = base_url.clone();
    }
    let openai = OpenAiProvider::new(openai_config)
        .map_err(|e| GatewayError::config(format!("openai provider: {}", e)))?;
    registry.register(Arc::new(openai));

    let mut anthropic_config = AnthropicConfig {
        api_key: config.gateway.anthropic.api_key.clone(),
        ..AnthropicConfig::default()
    };
    if let Some(base_url) = &config.gateway.anthropic.base_url {
        anthropic_config.base_url = base_url.clone();
    }
    let anthropic = AnthropicProvider::new(anthropic_config)
        .map_err(|e| GatewayError::config(format!("anthropic provider: {}", e)))?;
    registry.register(Arc::new(anthropic));

    info!(providers = ?registry.list(), "provider registry initialized");
    Ok(registry)
}
