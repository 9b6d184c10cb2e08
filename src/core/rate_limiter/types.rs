//! Rate limiter types and data structures

use chrono::{DateTime, Utc};

/// Outcome of a rate-limit check, ready for response headers
#[derive(Debug, Clone)]
pub struct RateLimitDecision {
    /// Whether the request is admitted
    pub allowed: bool,
    /// Maximum requests allowed per window
    pub limit: u32,
    /// Requests remaining in the current window
    pub remaining: u32,
    /// When the current window resets
    pub reset_time: DateTime<Utc>,
    /// Seconds until retry is worthwhile, set only when rejected
    pub retry_after_secs: Option<u64>,
}

/// Per-key counter for the current window
#[derive(Debug, Clone)]
pub struct RateLimitEntry {
    /// Requests recorded in the window
    pub count: u32,
    /// End of the window
    pub reset_time: DateTime<Utc>,
}
