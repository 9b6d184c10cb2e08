//! Idempotency cache
//!
//! TTL map from a client-supplied key to a finalized successful response.
//! Expiration is lazy: an entry past its TTL is deleted on the read that
//! finds it, so no observable read ever returns a stale response.

use std::time::{Duration, Instant};

use dashmap::DashMap;

use crate::core::types::ChatResponse;

struct IdempotencyEntry {
    response: ChatResponse,
    inserted_at: Instant,
}

/// TTL cache of finalized chat responses keyed by idempotency token
pub struct IdempotencyCache {
    ttl: Duration,
    entries: DashMap<String, IdempotencyEntry>,
}

impl IdempotencyCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: DashMap::new(),
        }
    }

    /// Fetch a cached response if it is still fresh
    pub fn get(&self, key: &str) -> Option<ChatResponse> {
        match self.entries.get(key) {
            Some(entry) if entry.inserted_at.elapsed() <= self.ttl => {
                return Some(entry.response.clone());
            }
            Some(_) => {}
            None => return None,
        }
        // Expired: drop the read guard before removing.
        self.entries.remove(key);
        None
    }

    /// Store a finalized response, overwriting any previous entry
    pub fn set(&self, key: impl Into<String>, response: ChatResponse) {
        self.entries.insert(
            key.into(),
            IdempotencyEntry {
                response,
                inserted_at: Instant::now(),
            },
        );
    }

    /// Whether a fresh entry exists for the key
    pub fn has(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Number of live entries, expired ones included until touched
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache holds no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
