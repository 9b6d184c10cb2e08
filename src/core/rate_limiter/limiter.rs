//! Core rate limiter implementation

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{Duration as ChronoDuration, Utc};
use parking_lot::Mutex;

use super::types::{RateLimitDecision, RateLimitEntry};
use crate::monitoring::metrics::GatewayMetrics;

/// Fixed-window rate limiter
///
/// `check` performs the read and the record in a single lock
/// acquisition, so concurrent checks on the same key cannot both claim
/// the last slot of a window.
pub struct RateLimiter {
    max_requests: u32,
    window_ms: i64,
    entries: Mutex<HashMap<String, RateLimitEntry>>,
    metrics: Arc<GatewayMetrics>,
}

impl RateLimiter {
    pub fn new(max_requests: u32, window_ms: u64, metrics: Arc<GatewayMetrics>) -> Self {
        Self {
            max_requests,
            window_ms: window_ms as i64,
            entries: Mutex::new(HashMap::new()),
            metrics,
        }
    }

    /// Atomically check and record one request for `key`
    pub fn check(&self, key: &str) -> RateLimitDecision {
        let now = Utc::now();
        let window = ChronoDuration::milliseconds(self.window_ms);
        let mut entries = self.entries.lock();

        let entry = entries
            .entry(key.to_string())
            .or_insert_with(|| RateLimitEntry {
                count: 0,
                reset_time: now + window,
            });

        if now > entry.reset_time {
            entry.count = 1;
            entry.reset_time = now + window;
            return RateLimitDecision {
                allowed: true,
                limit: self.max_requests,
                remaining: self.max_requests.saturating_sub(1),
                reset_time: entry.reset_time,
                retry_after_secs: None,
            };
        }

        if entry.count >= self.max_requests {
            let reset_time = entry.reset_time;
            drop(entries);
            self.metrics.rate_limit_exceeded(key);
            let millis_left = (reset_time - now).num_milliseconds().max(0) as u64;
            return RateLimitDecision {
                allowed: false,
                limit: self.max_requests,
                remaining: 0,
                reset_time,
                retry_after_secs: Some(millis_left.div_ceil(1000)),
            };
        }

        entry.count += 1;
        RateLimitDecision {
            allowed: true,
            limit: self.max_requests,
            remaining: self.max_requests - entry.count,
            reset_time: entry.reset_time,
            retry_after_secs: None,
        }
    }
}
