//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Gateway operation:
//!     → circuit_breaker.rs (admit? fail fast when the backend is known bad)
//!     → retries.rs (bounded attempts, transient failures only)
//!     → backoff.rs (exponential delay between attempts)
//!     → attempt outcome feeds back into circuit_breaker.rs
//! ```
//!
//! # Design Decisions
//! - The breaker gates every attempt, not just the first of a retry loop
//! - Application rejections are breaker successes and never retried
//! - Per-attempt timeouts live with the RPC invoker, not here

pub mod backoff;
pub mod circuit_breaker;
pub mod retries;

pub use circuit_breaker::{Admission, CircuitBreaker, CircuitState};
pub use retries::{CallError, RetryPolicy};
