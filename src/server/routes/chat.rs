//! Chat completions endpoint
//!
//! The route glue over the reliability pipeline. Rate limiting runs in
//! the scope middleware before this handler; within the handler, the
//! idempotency lookup strictly precedes validation, which precedes the
//! orchestrator call, which precedes the idempotency store.

use std::time::Duration;

use actix_web::{web, HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{error, info, warn};

use crate::monitoring::metrics::CacheKind;
use crate::server::routes::{internal_error, request_id, validation_error};
use crate::server::types::ChatCompletionRequest;
use crate::server::AppState;
use crate::utils::error::GatewayError;
use crate::utils::validation::RequestValidator;

const IDEMPOTENCY_HEADER: &str = "x-idempotency-key";

/// Chat completions endpoint
pub async fn chat_completions(
    state: web::Data<AppState>,
    req: HttpRequest,
    body: web::Json<ChatCompletionRequest>,
) -> ActixResult<HttpResponse> {
    let request_id = request_id(req.headers());

    // Idempotency lookup before validation: a cached response replays
    // byte-for-byte regardless of the new body.
    let idempotency_key = req
        .headers()
        .get(IDEMPOTENCY_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);

    if let Some(key) = &idempotency_key {
        if let Some(cached) = state.idempotency.get(key) {
            state.metrics.cache_hit(CacheKind::Idempotency);
            info!(%key, "idempotency cache hit");
            return Ok(HttpResponse::Ok()
                .insert_header(("X-Cached", "true"))
                .json(cached));
        }
        state.metrics.cache_miss(CacheKind::Idempotency);
    }

    if let Err(details) = RequestValidator::validate_chat_completion(&body) {
        warn!(?details, "invalid chat completion request");
        return Ok(validation_error(&details));
    }

    info!(model = %body.model, provider = ?body.provider, "chat completion request");

    let provider = body.provider.clone();
    let timeout = body.timeout.map(Duration::from_millis);
    let request = body.into_inner().into_chat_request();

    match state
        .orchestrator
        .chat(request, provider.as_deref(), timeout)
        .await
    {
        Ok(response) => {
            // Defense in depth: never cache or emit a malformed response.
            if let Err(details) = RequestValidator::validate_chat_response(&response) {
                error!(?details, "provider response failed validation");
                return Ok(internal_error(&request_id));
            }

            if let Some(key) = idempotency_key {
                state.idempotency.set(key, response.clone());
            }

            Ok(HttpResponse::Ok().json(response))
        }
        Err(err) => {
            match &err {
                GatewayError::Timeout(message) => {
                    warn!(%request_id, %message, "chat completion timed out")
                }
                other => error!(%request_id, error = %other, "chat completion failed"),
            }
            Ok(internal_error(&request_id))
        }
    }
}
