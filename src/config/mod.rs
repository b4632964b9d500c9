//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! defaults (schema.rs)
//!     → loader.rs (environment variable overlay)
//!     → loader.rs validate() (semantic checks)
//!     → GatewayConfig (validated, immutable)
//!     → read-only inputs to breaker, retry policy, and server
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; no hot reload
//! - All fields have defaults so an empty environment still runs
//! - Validation separates syntactic (parse) from semantic checks

pub mod loader;
pub mod schema;

pub use loader::{load_from_env, ConfigError};
pub use schema::{
    BackendConfig, CircuitBreakerConfig, GatewayConfig, ListenerConfig, ObservabilityConfig,
    RetryConfig, TimeoutConfig,
};
