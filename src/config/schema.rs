//! Configuration schema definitions.
//!
//! All sections derive Serde traits with defaults, so a fully-default
//! config is always valid. Defaults mirror the deployed service: HTTP on
//! port 5000, backend gRPC on localhost:50051, breaker trips after 3
//! consecutive failures and re-probes after 6 seconds.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Root configuration for the gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener settings (bind address, request timeout).
    pub listener: ListenerConfig,

    /// Backend gRPC target.
    pub backend: BackendConfig,

    /// Circuit breaker settings.
    pub breaker: CircuitBreakerConfig,

    /// Retry/backoff settings.
    pub retries: RetryConfig,

    /// Per-attempt RPC timeouts.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:5000").
    pub bind_address: String,

    /// Whole-request timeout in seconds, enforced as middleware.
    pub request_timeout_secs: u64,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:5000".to_string(),
            request_timeout_secs: 30,
        }
    }
}

/// Backend gRPC target.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Backend host.
    pub host: String,

    /// Backend gRPC port.
    pub port: u16,
}

impl BackendConfig {
    /// Full target URI for the tonic endpoint.
    pub fn target_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 50051,
        }
    }
}

/// Circuit breaker configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CircuitBreakerConfig {
    /// Consecutive transient failures before the breaker opens.
    pub failure_threshold: u32,

    /// Seconds the breaker stays open before admitting a probe.
    pub reset_timeout_secs: u64,
}

impl CircuitBreakerConfig {
    pub fn reset_timeout(&self) -> Duration {
        Duration::from_secs(self.reset_timeout_secs)
    }
}

impl Default for CircuitBreakerConfig {
    fn default() -> Self {
        Self {
            failure_threshold: 3,
            reset_timeout_secs: 6,
        }
    }
}

/// Retry configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Retries after the first attempt (2 retries = 3 attempts total).
    pub max_retries: u32,

    /// Base delay for exponential backoff in milliseconds.
    pub base_delay_ms: u64,

    /// Cap on the backoff delay in milliseconds.
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 2,
            base_delay_ms: 1000,
            max_delay_ms: 8000,
        }
    }
}

/// Per-attempt RPC timeouts. Enforced per attempt, not per retry loop.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Timeout for write RPCs (AddItem, UpdateItem, DeleteItem) in ms.
    pub write_ms: u64,

    /// Timeout for read RPCs (GetItem) in ms.
    pub read_ms: u64,
}

impl TimeoutConfig {
    pub fn write(&self) -> Duration {
        Duration::from_millis(self.write_ms)
    }

    pub fn read(&self) -> Duration {
        Duration::from_millis(self.read_ms)
    }
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            write_ms: 1000,
            read_ms: 2000,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Default log filter when RUST_LOG is unset.
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_deployed_service() {
        let config = GatewayConfig::default();
        assert_eq!(config.listener.bind_address, "0.0.0.0:5000");
        assert_eq!(config.backend.target_url(), "http://localhost:50051");
        assert_eq!(config.breaker.failure_threshold, 3);
        assert_eq!(config.breaker.reset_timeout(), Duration::from_secs(6));
        assert_eq!(config.retries.max_retries, 2);
        assert_eq!(config.timeouts.write(), Duration::from_secs(1));
        assert_eq!(config.timeouts.read(), Duration::from_secs(2));
    }
}
