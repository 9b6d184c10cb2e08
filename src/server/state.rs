//! Application state shared across HTTP handlers

use std::sync::Arc;
use std::time::Instant;

use crate::config::Config;
use crate::core::idempotency::IdempotencyCache;
use crate::core::orchestrator::Orchestrator;
use crate::core::rate_limiter::RateLimiter;
use crate::monitoring::metrics::GatewayMetrics;

/// HTTP server state shared across handlers
///
/// All fields are wrapped in Arc for efficient sharing across worker
/// threads; each stateful map is owned here for the life of the process.
#[derive(Clone)]
pub struct AppState {
    /// Gateway configuration (shared read-only)
    pub config: Arc<Config>,
    /// Reliability pipeline
    pub orchestrator: Arc<Orchestrator>,
    /// Fixed-window rate limiter
    pub rate_limiter: Arc<RateLimiter>,
    /// Idempotency cache of finalized responses
    pub idempotency: Arc<IdempotencyCache>,
    /// Metrics registry
    pub metrics: Arc<GatewayMetrics>,
    /// Process start, for uptime reporting
    pub started_at: Instant,
}

impl AppState {
    pub fn new(
        config: Config,
        orchestrator: Orchestrator,
        rate_limiter: RateLimiter,
        idempotency: IdempotencyCache,
        metrics: Arc<GatewayMetrics>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            orchestrator: Arc::new(orchestrator),
            rate_limiter: Arc::new(rate_limiter),
            idempotency: Arc::new(idempotency),
            metrics,
            started_at: Instant::now(),
        }
    }
}
