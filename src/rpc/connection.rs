//! Backend channel lifecycle.
//!
//! Exactly one channel is canonical at a time. Recreating it swaps the
//! handle rather than mutating it in place, so in-flight calls on a
//! superseded channel complete or fail on their own and still report their
//! outcome to the circuit breaker.

use std::sync::Arc;

use arc_swap::ArcSwap;
use tonic::transport::{Channel, Endpoint};

/// One logical connection to the backend RPC service.
#[derive(Debug)]
pub struct BackendConnection {
    endpoint: Endpoint,
    channel: ArcSwap<Channel>,
}

impl BackendConnection {
    /// Validate the target URI and open a lazy channel to it.
    ///
    /// The channel connects on first use, so startup does not depend on the
    /// backend being reachable.
    pub fn new(target: &str) -> Result<Self, tonic::transport::Error> {
        let endpoint = Endpoint::from_shared(target.to_string())?;
        let channel = endpoint.connect_lazy();
        Ok(Self {
            endpoint,
            channel: ArcSwap::from_pointee(channel),
        })
    }

    /// Cheap clone of the current canonical channel.
    pub fn channel(&self) -> Channel {
        self.channel.load().as_ref().clone()
    }

    /// Replace the canonical channel with a fresh one.
    ///
    /// Called when the breaker admits a half-open probe: a channel that
    /// failed repeatedly may hold a broken transport-level session.
    pub fn recreate(&self) {
        tracing::debug!(target = %self.endpoint.uri(), "recreating backend channel");
        self.channel.store(Arc::new(self.endpoint.connect_lazy()));
    }
}
