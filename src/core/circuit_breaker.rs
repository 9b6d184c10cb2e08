//! Circuit breaker
//!
//! Per-provider failure gate with three states. Closed passes calls
//! through while tracking rolling outcomes; crossing the error-rate
//! threshold opens the circuit. Open resolves every fire with the
//! fallback until `reset_timeout` has elapsed, then admits exactly one
//! half-open probe whose outcome decides the next state. All state
//! mutations are serialized behind one lock, so concurrent threshold
//! evaluations produce at most one open transition.

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tracing::{info, warn};

use crate::core::providers::{ProviderError, ProviderResult};
use crate::monitoring::metrics::GatewayMetrics;

/// Breaker tuning parameters
#[derive(Debug, Clone)]
pub struct CircuitBreakerConfig {
    /// Ceiling on a single protected call
    pub call_timeout: Duration,
    /// Error percentage at which the circuit opens
    pub error_threshold_percentage: u32,
    /// Minimum outcomes in the window before the threshold applies
    pub min_samples: u32,
    /// Length of the rolling statistics window
    pub window: Duration,
    /// Time the circuit stays open before admitting a probe
    pub reset_timeout: Duration,
}

impl Default for CircuitBreakerConfig {
    fn default() -> Self {
        Self {
            call_timeout: Duration::from_millis(30_000),
            error_threshold_percentage: 50,
            min_samples: 5,
            window: Duration::from_secs(10),
            reset_timeout: Duration::from_millis(60_000),
        }
    }
}

/// Breaker states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CircuitState {
    Closed,
    Open,
    HalfOpen,
}

impl CircuitState {
    /// Gauge encoding: 0=closed, 1=open, 2=half-open
    pub fn as_gauge(self) -> i64 {
        match self {
            CircuitState::Closed => 0,
            CircuitState::Open => 1,
            CircuitState::HalfOpen => 2,
        }
    }
}

struct BreakerInner {
    state: CircuitState,
    successes: u32,
    failures: u32,
    window_start: Instant,
    opened_at: Option<Instant>,
    probe_in_flight: bool,
}

impl BreakerInner {
    fn total(&self) -> u32 {
        self.successes + self.failures
    }

    fn error_rate(&self) -> f64 {
        if self.total() == 0 {
            return 0.0;
        }
        (self.failures as f64 / self.total() as f64) * 100.0
    }

    fn reset_window(&mut self) {
        self.successes = 0;
        self.failures = 0;
        self.window_start = Instant::now();
    }
}

enum Admission {
    Pass,
    Probe,
    Reject,
}

/// Per-provider circuit breaker
pub struct CircuitBreaker {
    provider: &'static str,
    config: CircuitBreakerConfig,
    inner: Mutex<BreakerInner>,
    metrics: Arc<GatewayMetrics>,
}

impl CircuitBreaker {
    pub fn new(
        provider: &'static str,
        config: CircuitBreakerConfig,
        metrics: Arc<GatewayMetrics>,
    ) -> Self {
        metrics.set_circuit_breaker_state(provider, CircuitState::Closed);
        Self {
            provider,
            config,
            inner: Mutex::new(BreakerInner {
                state: CircuitState::Closed,
                successes: 0,
                failures: 0,
                window_start: Instant::now(),
                opened_at: None,
                probe_in_flight: false,
            }),
            metrics,
        }
    }

    /// Execute one call through the state machine
    ///
    /// Returns the fallback without invoking `op` while the circuit is
    /// open or a probe is already in flight. The call is bounded by the
    /// configured timeout; exceeding it counts as a failure outcome.
    pub async fn fire<F, Fut>(&self, op: F) -> ProviderResult
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = ProviderResult>,
    {
        let admission = self.admit();
        let is_probe = match admission {
            Admission::Reject => return Err(ProviderError::circuit_open(self.provider)),
            Admission::Probe => true,
            Admission::Pass => false,
        };

        let outcome = match tokio::time::timeout(self.config.call_timeout, op()).await {
            Ok(result) => result,
            Err(_) => Err(ProviderError::call_timeout(
                self.provider,
                self.config.call_timeout.as_millis() as u64,
            )),
        };

        self.apply_outcome(is_probe, outcome.is_ok());
        outcome
    }

    /// Current state, for observers and tests
    pub fn state(&self) -> CircuitState {
        self.inner.lock().state
    }

    fn admit(&self) -> Admission {
        let mut inner = self.inner.lock();
        match inner.state {
            CircuitState::Closed => Admission::Pass,
            CircuitState::Open => {
                let elapsed = inner
                    .opened_at
                    .map(|at| at.elapsed())
                    .unwrap_or(Duration::ZERO);
                if elapsed >= self.config.reset_timeout {
                    inner.state = CircuitState::HalfOpen;
                    inner.probe_in_flight = true;
                    self.transitioned(CircuitState::HalfOpen);
                    Admission::Probe
                } else {
                    Admission::Reject
                }
            }
            CircuitState::HalfOpen => {
                if inner.probe_in_flight {
                    Admission::Reject
                } else {
                    inner.probe_in_flight = true;
                    Admission::Probe
                }
            }
        }
    }

    fn apply_outcome(&self, was_probe: bool, success: bool) {
        let mut inner = self.inner.lock();

        if was_probe {
            inner.probe_in_flight = false;
            if success {
                inner.state = CircuitState::Closed;
                inner.reset_window();
                inner.opened_at = None;
                self.transitioned(CircuitState::Closed);
                info!(provider = self.provider, "circuit breaker closed after probe");
            } else {
                inner.state = CircuitState::Open;
                inner.opened_at = Some(Instant::now());
                self.transitioned(CircuitState::Open);
                warn!(provider = self.provider, "circuit breaker re-opened after probe");
            }
            return;
        }

        // Stragglers from before a transition no longer influence stats.
        if inner.state != CircuitState::Closed {
            return;
        }

        if inner.window_start.elapsed() >= self.config.window {
            inner.reset_window();
        }

        if success {
            inner.successes += 1;
            return;
        }

        inner.failures += 1;
        if inner.total() >= self.config.min_samples
            && inner.error_rate() >= self.config.error_threshold_percentage as f64
        {
            inner.state = CircuitState::Open;
            inner.opened_at = Some(Instant::now());
            self.transitioned(CircuitState::Open);
            warn!(
                provider = self.provider,
                error_rate = inner.error_rate(),
                "circuit breaker opened"
            );
        }
    }

    fn transitioned(&self, state: CircuitState) {
        self.metrics.set_circuit_breaker_state(self.provider, state);
    }
}
