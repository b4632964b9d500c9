//! Configuration loading from the environment.
//!
//! The gateway is configured entirely through environment variables layered
//! over defaults; there is no config file. `GRPC_HOST`/`GRPC_PORT` name the
//! backend target, the remaining variables tune the resilience layer.

use std::env;
use std::net::SocketAddr;
use std::str::FromStr;

use crate::config::schema::GatewayConfig;

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {value:?}")]
    InvalidVar { var: &'static str, value: String },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

fn parse_var<T: FromStr>(var: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .parse()
        .map_err(|_| ConfigError::InvalidVar { var, value })
}

fn override_var<T: FromStr>(var: &'static str, slot: &mut T) -> Result<(), ConfigError> {
    if let Ok(value) = env::var(var) {
        *slot = parse_var(var, value)?;
    }
    Ok(())
}

/// Build a config from defaults overlaid with environment variables, then
/// validate it.
pub fn load_from_env() -> Result<GatewayConfig, ConfigError> {
    let mut config = GatewayConfig::default();

    if let Ok(host) = env::var("GRPC_HOST") {
        config.backend.host = host;
    }
    override_var("GRPC_PORT", &mut config.backend.port)?;

    if let Ok(addr) = env::var("BIND_ADDRESS") {
        config.listener.bind_address = addr;
    }
    override_var("REQUEST_TIMEOUT_SECS", &mut config.listener.request_timeout_secs)?;

    override_var("FAILURE_THRESHOLD", &mut config.breaker.failure_threshold)?;
    override_var("RESET_TIMEOUT_SECS", &mut config.breaker.reset_timeout_secs)?;

    override_var("MAX_RETRIES", &mut config.retries.max_retries)?;
    override_var("RETRY_BASE_DELAY_MS", &mut config.retries.base_delay_ms)?;
    override_var("RETRY_MAX_DELAY_MS", &mut config.retries.max_delay_ms)?;

    validate(&config)?;
    Ok(config)
}

/// Semantic checks; serde/parse errors are handled before this runs.
pub fn validate(config: &GatewayConfig) -> Result<(), ConfigError> {
    if SocketAddr::from_str(&config.listener.bind_address).is_err() {
        return Err(ConfigError::Invalid(format!(
            "bind_address {:?} is not a socket address",
            config.listener.bind_address
        )));
    }
    if config.backend.host.is_empty() {
        return Err(ConfigError::Invalid("backend host is empty".into()));
    }
    if config.breaker.failure_threshold == 0 {
        return Err(ConfigError::Invalid(
            "failure_threshold must be at least 1".into(),
        ));
    }
    if config.retries.base_delay_ms == 0 {
        return Err(ConfigError::Invalid("base_delay_ms must be nonzero".into()));
    }
    if config.retries.max_delay_ms < config.retries.base_delay_ms {
        return Err(ConfigError::Invalid(
            "max_delay_ms must be >= base_delay_ms".into(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(validate(&GatewayConfig::default()).is_ok());
    }

    #[test]
    fn rejects_zero_threshold() {
        let mut config = GatewayConfig::default();
        config.breaker.failure_threshold = 0;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn rejects_bad_bind_address() {
        let mut config = GatewayConfig::default();
        config.listener.bind_address = "not-an-address".into();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn env_overrides_backend_target() {
        env::set_var("GRPC_HOST", "backend.internal");
        env::set_var("GRPC_PORT", "6000");
        let config = load_from_env().unwrap();
        assert_eq!(config.backend.target_url(), "http://backend.internal:6000");
        env::remove_var("GRPC_HOST");
        env::remove_var("GRPC_PORT");
    }
}
