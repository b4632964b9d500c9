//! Terminal, client-facing error taxonomy.

use crate::resilience::retries::CallError;
use crate::rpc::backend::Rejection;

/// Every gateway operation resolves to either a payload or one of these;
/// nothing escapes as an unhandled fault. The HTTP layer maps each variant
/// onto a status code and body.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GatewayError {
    /// Breaker denied admission; no RPC was attempted.
    #[error("Service unavailable. The circuit breaker is open. Please try again later.")]
    CircuitOpen,

    /// Retries exhausted on transient failures.
    #[error("backend unavailable: {0}")]
    Unavailable(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    /// Backend rejection that maps to no specific client status.
    #[error("gRPC-service failure: {0}")]
    Backend(String),
}

impl From<CallError> for GatewayError {
    fn from(err: CallError) -> Self {
        match err {
            CallError::CircuitOpen => GatewayError::CircuitOpen,
            CallError::Exhausted(detail) => GatewayError::Unavailable(detail),
            CallError::Rejected(Rejection::NotFound(detail)) => GatewayError::NotFound(detail),
            CallError::Rejected(Rejection::AlreadyExists(detail)) => {
                GatewayError::Conflict(detail)
            }
            CallError::Rejected(Rejection::Other(detail)) => GatewayError::Backend(detail),
        }
    }
}
