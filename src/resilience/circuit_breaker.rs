//! Circuit breaker for backend protection.
//!
//! # States
//! - Closed: normal operation, calls pass through
//! - Open: backend assumed down, calls fail fast
//! - Half-Open: testing if backend recovered
//!
//! # State Transitions
//! ```text
//! Closed → Open: consecutive_failures >= threshold
//! Open → Half-Open: first admit() after reset timeout (winner gets the probe)
//! Half-Open → Closed: probe succeeds
//! Half-Open → Open: probe fails, fresh timer
//! ```
//!
//! # Design Decisions
//! - One breaker per backend target, owned by the composition root and
//!   passed by handle — never ambient global state
//! - Transitions serialized by a mutex so exactly one concurrent caller
//!   wins the half-open probe slot
//! - `Probe` admission tells the caller to recreate the backend connection
//!   before executing

use std::sync::Mutex;
use std::time::{Duration, Instant};

use crate::config::CircuitBreakerConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CircuitState {
    Closed,
    Open,
    HalfOpen,
}

/// Answer to "may this attempt proceed?".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// Breaker is closed; proceed normally.
    Allowed,
    /// This caller won the half-open probe slot. The backend connection
    /// must be recreated before the attempt executes.
    Probe,
    /// Fail fast without touching the backend.
    Denied,
}

#[derive(Debug)]
struct BreakerInner {
    state: CircuitState,
    consecutive_failures: u32,
    opened_at: Option<Instant>,
}

/// Shared per-target breaker state. All methods are safe to call from
/// concurrent request tasks.
#[derive(Debug)]
pub struct CircuitBreaker {
    failure_threshold: u32,
    reset_timeout: Duration,
    inner: Mutex<BreakerInner>,
}

impl CircuitBreaker {
    /// A fresh breaker always starts closed; state is never persisted
    /// across restarts.
    pub fn new(config: &CircuitBreakerConfig) -> Self {
        Self {
            failure_threshold: config.failure_threshold,
            reset_timeout: config.reset_timeout(),
            inner: Mutex::new(BreakerInner {
                state: CircuitState::Closed,
                consecutive_failures: 0,
                opened_at: None,
            }),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BreakerInner> {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Decide whether an attempt may proceed, transitioning Open →
    /// Half-Open when the reset timeout has elapsed.
    pub fn admit(&self) -> Admission {
        let mut inner = self.lock();
        match inner.state {
            CircuitState::Closed => Admission::Allowed,
            CircuitState::Open => {
                let waited = inner.opened_at.map(|t| t.elapsed()).unwrap_or_default();
                if waited >= self.reset_timeout {
                    inner.state = CircuitState::HalfOpen;
                    inner.consecutive_failures = 0;
                    inner.opened_at = None;
                    tracing::info!("circuit breaker half-open, probing backend");
                    Admission::Probe
                } else {
                    Admission::Denied
                }
            }
            // A probe is already in flight; everyone else fails fast until
            // it resolves.
            CircuitState::HalfOpen => Admission::Denied,
        }
    }

    /// Report a successful attempt.
    pub fn record_success(&self) {
        let mut inner = self.lock();
        match inner.state {
            CircuitState::Closed => inner.consecutive_failures = 0,
            CircuitState::HalfOpen => {
                inner.state = CircuitState::Closed;
                inner.consecutive_failures = 0;
                inner.opened_at = None;
                tracing::info!("circuit breaker closed, backend recovered");
            }
            // Late success from a call that was in flight when the breaker
            // opened; recovery only goes through the probe.
            CircuitState::Open => {}
        }
    }

    /// Report a failed attempt.
    pub fn record_failure(&self) {
        let mut inner = self.lock();
        match inner.state {
            CircuitState::Closed => {
                inner.consecutive_failures += 1;
                if inner.consecutive_failures >= self.failure_threshold {
                    inner.state = CircuitState::Open;
                    inner.opened_at = Some(Instant::now());
                    tracing::warn!(
                        failures = inner.consecutive_failures,
                        "circuit breaker opened"
                    );
                }
            }
            CircuitState::HalfOpen => {
                inner.state = CircuitState::Open;
                inner.opened_at = Some(Instant::now());
                tracing::warn!("probe failed, circuit breaker re-opened");
            }
            // Late failure from a superseded connection; already open.
            CircuitState::Open => {}
        }
    }

    pub fn state(&self) -> CircuitState {
        self.lock().state
    }

    pub fn consecutive_failures(&self) -> u32 {
        self.lock().consecutive_failures
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn breaker(threshold: u32, reset: Duration) -> CircuitBreaker {
        let mut b = CircuitBreaker::new(&CircuitBreakerConfig {
            failure_threshold: threshold,
            reset_timeout_secs: 60,
        });
        b.reset_timeout = reset;
        b
    }

    #[test]
    fn stays_closed_below_threshold() {
        let b = breaker(3, Duration::from_secs(60));
        for _ in 0..2 {
            assert_eq!(b.admit(), Admission::Allowed);
            b.record_failure();
        }
        assert_eq!(b.state(), CircuitState::Closed);
        assert_eq!(b.consecutive_failures(), 2);
        assert_eq!(b.admit(), Admission::Allowed);
    }

    #[test]
    fn success_resets_failure_count() {
        let b = breaker(3, Duration::from_secs(60));
        b.record_failure();
        b.record_failure();
        b.record_success();
        assert_eq!(b.consecutive_failures(), 0);
        assert_eq!(b.state(), CircuitState::Closed);
    }

    #[test]
    fn opens_at_threshold_and_denies() {
        let b = breaker(3, Duration::from_secs(60));
        for _ in 0..3 {
            b.record_failure();
        }
        assert_eq!(b.state(), CircuitState::Open);
        assert_eq!(b.admit(), Admission::Denied);
    }

    #[test]
    fn single_probe_after_reset_timeout() {
        let b = breaker(1, Duration::from_millis(20));
        b.record_failure();
        assert_eq!(b.admit(), Admission::Denied);

        std::thread::sleep(Duration::from_millis(40));
        assert_eq!(b.admit(), Admission::Probe);
        // Probe is in flight; everyone else is treated as open.
        assert_eq!(b.admit(), Admission::Denied);
        assert_eq!(b.admit(), Admission::Denied);
    }

    #[test]
    fn probe_success_closes_breaker() {
        let b = breaker(1, Duration::from_millis(10));
        b.record_failure();
        std::thread::sleep(Duration::from_millis(20));
        assert_eq!(b.admit(), Admission::Probe);
        b.record_success();
        assert_eq!(b.state(), CircuitState::Closed);
        assert_eq!(b.consecutive_failures(), 0);
        assert_eq!(b.admit(), Admission::Allowed);
    }

    #[test]
    fn probe_failure_reopens_with_fresh_timer() {
        let b = breaker(1, Duration::from_millis(40));
        b.record_failure();
        std::thread::sleep(Duration::from_millis(60));
        assert_eq!(b.admit(), Admission::Probe);
        b.record_failure();
        assert_eq!(b.state(), CircuitState::Open);
        // Fresh timer: still denied right away.
        assert_eq!(b.admit(), Admission::Denied);
        std::thread::sleep(Duration::from_millis(60));
        assert_eq!(b.admit(), Admission::Probe);
    }

    #[test]
    fn exactly_one_concurrent_caller_wins_the_probe() {
        use std::sync::atomic::{AtomicU32, Ordering};
        use std::sync::Arc;

        let b = Arc::new(breaker(1, Duration::from_millis(10)));
        b.record_failure();
        std::thread::sleep(Duration::from_millis(20));

        let probes = Arc::new(AtomicU32::new(0));
        let denials = Arc::new(AtomicU32::new(0));
        let handles: Vec<_> = (0..16)
            .map(|_| {
                let b = b.clone();
                let probes = probes.clone();
                let denials = denials.clone();
                std::thread::spawn(move || match b.admit() {
                    Admission::Probe => {
                        probes.fetch_add(1, Ordering::SeqCst);
                    }
                    Admission::Denied => {
                        denials.fetch_add(1, Ordering::SeqCst);
                    }
                    Admission::Allowed => panic!("breaker admitted a non-probe call"),
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        assert_eq!(probes.load(Ordering::SeqCst), 1);
        assert_eq!(denials.load(Ordering::SeqCst), 15);
    }
}
