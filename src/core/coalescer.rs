//! Request coalescer
//!
//! Deduplicates concurrent identical calls: the first caller for a key
//! starts the upstream computation, later callers arriving within the
//! staleness window share its future and observe the same resolution.
//! Entries remove themselves when their future settles; a generation id
//! keeps a settling call from evicting a successor that replaced it.

use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::future::{BoxFuture, FutureExt, Shared};
use parking_lot::Mutex;
use tracing::debug;

use crate::core::providers::{ProviderError, ProviderResult};
use crate::core::types::ChatResponse;
use crate::monitoring::metrics::{CacheKind, GatewayMetrics};

type SharedCall = Shared<BoxFuture<'static, Result<ChatResponse, ProviderError>>>;

struct PendingCall {
    future: SharedCall,
    started_at: Instant,
    id: u64,
}

/// Coalesces concurrent identical in-flight calls
pub struct RequestCoalescer {
    window: Duration,
    pending: Arc<Mutex<HashMap<String, PendingCall>>>,
    next_id: AtomicU64,
    metrics: Arc<GatewayMetrics>,
}

impl RequestCoalescer {
    pub fn new(window: Duration, metrics: Arc<GatewayMetrics>) -> Self {
        Self {
            window,
            pending: Arc::new(Mutex::new(HashMap::new())),
            next_id: AtomicU64::new(0),
            metrics,
        }
    }

    /// Execute `op` for `key`, or join an in-flight call for the same key
    ///
    /// At most one `op` future runs per `(key, window)`; every joined
    /// caller receives a clone of the same value or error. An entry
    /// pending longer than the window is treated as absent for admission,
    /// though its own callers still receive its eventual result.
    pub async fn execute<F, Fut>(&self, key: &str, op: F) -> ProviderResult
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = ProviderResult> + Send + 'static,
    {
        let shared = {
            let mut pending = self.pending.lock();
            match pending.get(key) {
                Some(call) if call.started_at.elapsed() < self.window => {
                    debug!(key, "joining in-flight call");
                    self.metrics.cache_hit(CacheKind::Coalescer);
                    call.future.clone()
                }
                _ => {
                    self.metrics.cache_miss(CacheKind::Coalescer);
                    self.insert_call(&mut pending, key, op())
                }
            }
        };

        shared.await
    }

    /// Number of entries currently pending
    pub fn pending_len(&self) -> usize {
        self.pending.lock().len()
    }

    fn insert_call(
        &self,
        pending: &mut HashMap<String, PendingCall>,
        key: &str,
        fut: impl Future<Output = ProviderResult> + Send + 'static,
    ) -> SharedCall {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let map = Arc::clone(&self.pending);
        let owned_key = key.to_string();

        let shared = async move {
            let result = fut.await;
            let mut pending = map.lock();
            // Only this generation's entry is removed; a replacement that
            // superseded a stale entry cleans up after itself.
            if pending.get(&owned_key).map(|call| call.id) == Some(id) {
                pending.remove(&owned_key);
            }
            result
        }
        .boxed()
        .shared();

        pending.insert(
            key.to_string(),
            PendingCall {
                future: shared.clone(),
                started_at: Instant::now(),
                id,
            },
        );

        shared
    }
}
