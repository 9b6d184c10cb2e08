//! HTTP route modules

pub mod chat;
pub mod health;

use actix_web::http::header::HeaderMap;
use actix_web::{web, HttpResponse};

use crate::server::middleware::RateLimitMiddleware;
use crate::utils::validation::FieldError;

/// Register all gateway routes
///
/// The `/v1` scope sits behind the rate limiter; health and metrics do
/// not consume request budget.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health::health_check))
        .route("/metrics", web::get().to(health::metrics))
        .service(
            web::scope("/v1")
                .wrap(RateLimitMiddleware)
                .route("/chat/completions", web::post().to(chat::chat_completions)),
        );
}

/// Extract the request ID installed by the middleware
pub fn request_id(headers: &HeaderMap) -> String {
    headers
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string())
}

/// 400 with the standard validation body
pub fn validation_error(details: &[FieldError]) -> HttpResponse {
    HttpResponse::BadRequest().json(serde_json::json!({
        "error": "Validation error",
        "details": details,
    }))
}

/// 500 with the standard opaque body
pub fn internal_error(request_id: &str) -> HttpResponse {
    HttpResponse::InternalServerError().json(serde_json::json!({
        "error": "Internal server error",
        "requestId": request_id,
    }))
}
