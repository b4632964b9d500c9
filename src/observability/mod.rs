//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! HTTP middleware + gateway operations produce:
//!     → tracing events (structured fields: attempt, delay, operation)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → log output (stdout, filtered by RUST_LOG)
//!     → Prometheus scrape of GET /metrics
//! ```
//!
//! # Design Decisions
//! - tracing spans wrap each outbound RPC call
//! - Metric updates are cheap; labels are bounded (method, endpoint,
//!   operation, outcome class)

pub mod metrics;
