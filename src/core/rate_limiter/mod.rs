//! Rate limiter
//!
//! Fixed-window request counting per client key with a header-ready
//! snapshot of the current window.

pub mod limiter;
pub mod types;


pub use limiter::RateLimiter;
pub use types::{RateLimitDecision, RateLimitEntry};
