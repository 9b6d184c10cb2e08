//! Core gateway functionality
//!
//! The reliability pipeline and the types it carries. Components compose
//! as nested wrappers around a provider call:
//! retry -> coalesce -> breaker -> provider.

pub mod circuit_breaker;
pub mod coalescer;
pub mod idempotency;
pub mod orchestrator;
pub mod providers;
pub mod rate_limiter;
pub mod retry;
pub mod types;
