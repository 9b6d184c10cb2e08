//! Monitoring and observability
//!
//! Prometheus metrics for the gateway's HTTP surface, provider calls,
//! caches, breakers and rate limiting.

pub mod metrics;

pub use metrics::GatewayMetrics;
