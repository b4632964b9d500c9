//! Gateway operation handlers.
//!
//! # Data Flow
//! ```text
//! HTTP handler (parsed request)
//!     → ItemGateway operation (one per CRUD verb)
//!     → resilience::RetryPolicy::execute (breaker-gated attempts)
//!     → rpc::ItemBackend (typed call, timeout, classification)
//!     → terminal Result<payload, GatewayError>
//! ```
//!
//! # Design Decisions
//! - One gateway instance per backend target; breaker and retry policy are
//!   owned here and shared by all request tasks
//! - Every operation reports (operation, outcome class, latency) to the
//!   metrics recorder after its retry loop concludes
//! - "Read found nothing" is decided here, not in the RPC layer

pub mod error;

use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

pub use error::GatewayError;

use crate::observability::metrics;
use crate::resilience::retries::{CallError, RetryPolicy};
use crate::resilience::CircuitBreaker;
use crate::rpc::backend::{ItemBackend, RpcResult, UpdatedItem};
use crate::rpc::proto::Item;

/// Composition of circuit breaker + retry policy + RPC invoker for the four
/// item operations.
pub struct ItemGateway {
    backend: Arc<dyn ItemBackend>,
    breaker: CircuitBreaker,
    retry: RetryPolicy,
}

impl ItemGateway {
    pub fn new(backend: Arc<dyn ItemBackend>, breaker: CircuitBreaker, retry: RetryPolicy) -> Self {
        Self {
            backend,
            breaker,
            retry,
        }
    }

    pub fn breaker(&self) -> &CircuitBreaker {
        &self.breaker
    }

    async fn run<T, F, Fut>(&self, operation: &'static str, op: F) -> Result<T, GatewayError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = RpcResult<T>>,
    {
        let started = Instant::now();
        let result = self
            .retry
            .execute(&self.breaker, || self.backend.reset(), op)
            .await;

        let outcome = match &result {
            Ok(_) => "success",
            Err(CallError::Rejected(_)) => "rejected",
            Err(CallError::CircuitOpen) => "circuit_open",
            Err(CallError::Exhausted(_)) => "unavailable",
        };
        metrics::record_rpc_operation(operation, outcome, started.elapsed());

        result.map_err(GatewayError::from)
    }

    pub async fn create_item(&self, item: Item) -> Result<Item, GatewayError> {
        let backend = Arc::clone(&self.backend);
        self.run("AddItem", move || {
            let backend = Arc::clone(&backend);
            let item = item.clone();
            async move { backend.add_item(item).await }
        })
        .await
    }

    /// Empty result sets surface as `NotFound` so the client sees a 404
    /// rather than an empty 200.
    pub async fn get_items(&self, filter: Item) -> Result<Vec<Item>, GatewayError> {
        let backend = Arc::clone(&self.backend);
        let items = self
            .run("GetItem", move || {
                let backend = Arc::clone(&backend);
                let filter = filter.clone();
                async move { backend.get_items(filter).await }
            })
            .await?;

        if items.is_empty() {
            return Err(GatewayError::NotFound("No items found.".into()));
        }
        Ok(items)
    }

    pub async fn update_item(&self, item: Item) -> Result<UpdatedItem, GatewayError> {
        let backend = Arc::clone(&self.backend);
        self.run("UpdateItem", move || {
            let backend = Arc::clone(&backend);
            let item = item.clone();
            async move { backend.update_item(item).await }
        })
        .await
    }

    pub async fn delete_item(&self, id: i64) -> Result<Item, GatewayError> {
        let backend = Arc::clone(&self.backend);
        self.run("DeleteItem", move || {
            let backend = Arc::clone(&backend);
            async move { backend.delete_item(id).await }
        })
        .await
    }
}
