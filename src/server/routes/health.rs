//! Health check and metrics endpoints

use actix_web::{web, HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{debug, error};

use crate::server::routes::request_id;
use crate::server::AppState;

/// Basic health check endpoint
///
/// Used by load balancers and monitoring systems; reports liveness and
/// uptime only, no dependency probing.
pub async fn health_check(
    state: web::Data<AppState>,
    req: HttpRequest,
) -> ActixResult<HttpResponse> {
    debug!("Health check requested");

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "uptime": state.started_at.elapsed().as_secs(),
        "requestId": request_id(req.headers()),
    })))
}

/// Metrics endpoint (Prometheus text exposition format)
pub async fn metrics(state: web::Data<AppState>) -> ActixResult<HttpResponse> {
    match state.metrics.export() {
        Ok((body, content_type)) => Ok(HttpResponse::Ok().content_type(content_type).body(body)),
        Err(e) => {
            error!("Failed to encode metrics: {}", e);
            Ok(HttpResponse::InternalServerError().finish())
        }
    }
}
