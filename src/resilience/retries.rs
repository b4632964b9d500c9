//! Retry policy for transient backend failures.
//!
//! # Responsibilities
//! - Drive 1..N attempts of one RPC call through the circuit breaker
//! - Retry transient outcomes only; application rejections are terminal
//! - Apply exponential backoff between attempts, never before the first
//!
//! # Design Decisions
//! - Admission is re-checked before every attempt, so a breaker that opens
//!   mid-loop aborts the remaining attempts
//! - A `Probe` admission recreates the backend connection before the call
//! - Backoff sleeps are scoped to the calling task; unrelated requests are
//!   never blocked

use std::future::Future;
use std::time::Duration;

use crate::resilience::backoff::calculate_backoff;
use crate::resilience::circuit_breaker::{Admission, CircuitBreaker};
use crate::rpc::backend::{Rejection, RpcFailure, RpcResult};

/// Terminal outcome of a retried call, after the loop concludes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallError {
    /// Breaker denied admission; no RPC was attempted for this outcome.
    CircuitOpen,
    /// Backend answered and declined. Never retried.
    Rejected(Rejection),
    /// Every attempt failed with a transient error; carries the last one.
    Exhausted(String),
}

#[derive(Debug, Clone)]
pub struct RetryPolicy {
    max_retries: u32,
    base_delay: Duration,
    max_delay: Duration,
}

impl RetryPolicy {
    pub fn new(config: &crate::config::RetryConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            base_delay: Duration::from_millis(config.base_delay_ms),
            max_delay: Duration::from_millis(config.max_delay_ms),
        }
    }

    /// Run `op` with bounded retries, reporting each attempt to `breaker`.
    ///
    /// `on_probe` is invoked when an attempt is admitted as the half-open
    /// probe; it must recreate the backend connection.
    pub async fn execute<T, F, Fut, P>(
        &self,
        breaker: &CircuitBreaker,
        on_probe: P,
        mut op: F,
    ) -> Result<T, CallError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = RpcResult<T>>,
        P: Fn(),
    {
        let attempts = self.max_retries + 1;
        let mut last_error = String::new();

        for attempt in 1..=attempts {
            match breaker.admit() {
                Admission::Denied => return Err(CallError::CircuitOpen),
                Admission::Probe => on_probe(),
                Admission::Allowed => {}
            }

            match op().await {
                Ok(value) => {
                    breaker.record_success();
                    return Ok(value);
                }
                Err(RpcFailure::Rejected(rejection)) => {
                    // The backend is reachable and declined the request;
                    // that counts as a breaker success.
                    breaker.record_success();
                    return Err(CallError::Rejected(rejection));
                }
                Err(RpcFailure::Transient(detail)) => {
                    breaker.record_failure();
                    tracing::warn!(attempt, error = %detail, "call attempt failed");
                    last_error = detail;

                    if attempt < attempts {
                        let delay = calculate_backoff(
                            attempt,
                            self.base_delay.as_millis() as u64,
                            self.max_delay.as_millis() as u64,
                        );
                        tracing::debug!(attempt, delay = ?delay, "backing off before retry");
                        tokio::time::sleep(delay).await;
                    }
                }
            }
        }

        Err(CallError::Exhausted(last_error))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;
    use std::time::Instant;

    use super::*;
    use crate::config::{CircuitBreakerConfig, RetryConfig};
    use crate::resilience::circuit_breaker::CircuitState;

    fn policy(max_retries: u32, base_delay_ms: u64) -> RetryPolicy {
        RetryPolicy::new(&RetryConfig {
            max_retries,
            base_delay_ms,
            max_delay_ms: 8 * base_delay_ms.max(1),
        })
    }

    fn breaker(threshold: u32) -> CircuitBreaker {
        CircuitBreaker::new(&CircuitBreakerConfig {
            failure_threshold: threshold,
            reset_timeout_secs: 60,
        })
    }

    fn scripted(steps: Vec<RpcResult<u32>>) -> Mutex<VecDeque<RpcResult<u32>>> {
        Mutex::new(steps.into())
    }

    #[tokio::test]
    async fn transient_failure_is_retried_until_success() {
        let b = breaker(5);
        let script = scripted(vec![Err(RpcFailure::Transient("refused".into())), Ok(7)]);
        let calls = AtomicU32::new(0);

        let result = policy(2, 1)
            .execute(&b, || {}, || {
                calls.fetch_add(1, Ordering::SeqCst);
                let step = script.lock().unwrap().pop_front().unwrap();
                async move { step }
            })
            .await;

        assert_eq!(result, Ok(7));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(b.consecutive_failures(), 0);
    }

    #[tokio::test]
    async fn rejection_terminates_on_first_attempt() {
        let b = breaker(5);
        let calls = AtomicU32::new(0);

        let result: Result<u32, _> = policy(2, 1)
            .execute(&b, || {}, || {
                calls.fetch_add(1, Ordering::SeqCst);
                async {
                    Err(RpcFailure::Rejected(Rejection::AlreadyExists(
                        "taken".into(),
                    )))
                }
            })
            .await;

        assert_eq!(
            result,
            Err(CallError::Rejected(Rejection::AlreadyExists(
                "taken".into()
            )))
        );
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        // Rejections never count toward the breaker's failure count.
        assert_eq!(b.consecutive_failures(), 0);
    }

    #[tokio::test]
    async fn exhaustion_surfaces_last_transient_error() {
        let b = breaker(10);
        let calls = AtomicU32::new(0);

        let result: Result<u32, _> = policy(2, 1)
            .execute(&b, || {}, || {
                let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
                async move { Err(RpcFailure::Transient(format!("attempt {n} failed"))) }
            })
            .await;

        assert_eq!(result, Err(CallError::Exhausted("attempt 3 failed".into())));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(b.consecutive_failures(), 3);
    }

    #[tokio::test]
    async fn open_breaker_aborts_without_calling() {
        let b = breaker(1);
        b.record_failure();
        assert_eq!(b.state(), CircuitState::Open);
        let calls = AtomicU32::new(0);

        let result: Result<u32, _> = policy(2, 1)
            .execute(&b, || {}, || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Ok(1) }
            })
            .await;

        assert_eq!(result, Err(CallError::CircuitOpen));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn breaker_opening_mid_loop_aborts_remaining_attempts() {
        // Threshold 1: the first transient failure opens the breaker, so
        // the second attempt must be denied instead of executed.
        let b = breaker(1);
        let calls = AtomicU32::new(0);

        let result: Result<u32, _> = policy(2, 1)
            .execute(&b, || {}, || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(RpcFailure::Transient("down".into())) }
            })
            .await;

        assert_eq!(result, Err(CallError::CircuitOpen));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn backoff_delays_at_least_double() {
        let b = breaker(10);
        let started = Instant::now();

        let result: Result<u32, _> = policy(2, 50)
            .execute(&b, || {}, || async {
                Err(RpcFailure::Transient("down".into()))
            })
            .await;

        assert!(matches!(result, Err(CallError::Exhausted(_))));
        // Waits: >= 50ms after attempt 1, >= 100ms after attempt 2.
        assert!(started.elapsed() >= Duration::from_millis(150));
    }
}
