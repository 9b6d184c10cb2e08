//! HTTP middleware
//!
//! Request-ID propagation, per-request metrics and rate limiting,
//! written as Transform/Service pairs.

pub mod metrics;
pub mod rate_limit;
pub mod request_id;

pub use metrics::MetricsMiddleware;
pub use rate_limit::RateLimitMiddleware;
pub use request_id::RequestIdMiddleware;
