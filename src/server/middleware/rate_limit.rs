//! Rate limiting middleware
//!
//! Consults the fixed-window limiter before any other per-request work
//! and stamps the `X-RateLimit-*` snapshot headers onto every response
//! that passes through, rejected or not.

use crate::core::rate_limiter::RateLimitDecision;
use crate::server::state::AppState;
use actix_web::body::EitherBody;
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header::{HeaderName, HeaderValue};
use actix_web::{web, HttpResponse};
use futures::future::{ready, Ready};
use std::future::Future;
use std::pin::Pin;
use tracing::info;

/// Rate limit middleware for Actix-web
pub struct RateLimitMiddleware;

impl<S, B> Transform<S, ServiceRequest> for RateLimitMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = actix_web::Error;
    type InitError = ();
    type Transform = RateLimitMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RateLimitMiddlewareService { service }))
    }
}

/// Service implementation for rate limit middleware
pub struct RateLimitMiddlewareService<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for RateLimitMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = actix_web::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let decision = req
            .app_data::<web::Data<AppState>>()
            .map(|state| state.rate_limiter.check(&client_ip(&req)));

        if let Some(decision) = &decision {
            if !decision.allowed {
                info!(path = req.path(), "rate limit exceeded");
                let mut response = HttpResponse::TooManyRequests().json(serde_json::json!({
                    "error": "Too many requests",
                    "retryAfter": decision.retry_after_secs.unwrap_or(0),
                }));
                set_rate_limit_headers(response.headers_mut(), decision);
                let response = req.into_response(response).map_into_right_body();
                return Box::pin(ready(Ok(response)));
            }
        }

        let fut = self.service.call(req);
        Box::pin(async move {
            let mut res = fut.await?.map_into_left_body();
            if let Some(decision) = &decision {
                set_rate_limit_headers(res.headers_mut(), decision);
            }
            Ok(res)
        })
    }
}

/// Rate-limit key: the client IP, falling back when unresolvable
fn client_ip(req: &ServiceRequest) -> String {
    req.connection_info()
        .realip_remote_addr()
        .map(str::to_string)
        .unwrap_or_else(|| "unknown".to_string())
}

fn set_rate_limit_headers(
    headers: &mut actix_web::http::header::HeaderMap,
    decision: &RateLimitDecision,
) {
    let pairs = [
        ("x-ratelimit-limit", decision.limit.to_string()),
        ("x-ratelimit-remaining", decision.remaining.to_string()),
        ("x-ratelimit-reset", decision.reset_time.to_rfc3339()),
    ];
    for (name, value) in pairs {
        if let Ok(value) = HeaderValue::from_str(&value) {
            headers.insert(HeaderName::from_static(name), value);
        }
    }
}
