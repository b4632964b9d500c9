//! HTTP server setup.
//!
//! # Responsibilities
//! - Build the Axum router with the item routes and /metrics
//! - Wire middleware (request ID, trace, timeout, per-request metrics)
//! - Compose the gateway from config (breaker + retry policy + backend)
//! - Serve with graceful shutdown

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::extract::{MatchedPath, Request};
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::{get, post, put};
use axum::Router;
use metrics_exporter_prometheus::PrometheusHandle;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::GatewayConfig;
use crate::gateway::ItemGateway;
use crate::http::handlers;
use crate::observability::metrics;
use crate::resilience::{CircuitBreaker, RetryPolicy};
use crate::rpc::{BackendConnection, GrpcItemBackend, ItemBackend};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<ItemGateway>,
    pub metrics: PrometheusHandle,
}

/// HTTP server for the gateway.
pub struct HttpServer {
    router: Router,
    config: GatewayConfig,
}

impl HttpServer {
    /// Wire the gateway to the real gRPC backend named by the config.
    pub fn new(config: GatewayConfig) -> Result<Self, tonic::transport::Error> {
        let conn = BackendConnection::new(&config.backend.target_url())?;
        let backend = Arc::new(GrpcItemBackend::new(conn, config.timeouts.clone()));
        Ok(Self::with_backend(config, backend))
    }

    /// Wire the gateway to an arbitrary backend implementation. Tests use
    /// this to exercise the full stack without a gRPC server.
    pub fn with_backend(config: GatewayConfig, backend: Arc<dyn ItemBackend>) -> Self {
        let breaker = CircuitBreaker::new(&config.breaker);
        let retry = RetryPolicy::new(&config.retries);
        let state = AppState {
            gateway: Arc::new(ItemGateway::new(backend, breaker, retry)),
            metrics: metrics::install(),
        };

        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &GatewayConfig, state: AppState) -> Router {
        Router::new()
            .route(
                "/items",
                post(handlers::create_item).get(handlers::list_items),
            )
            .route("/items/", get(handlers::list_items))
            .route(
                "/items/{item_id}",
                put(handlers::update_item).delete(handlers::delete_item),
            )
            .route("/metrics", get(handlers::metrics))
            .route_layer(middleware::from_fn(track_metrics))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.listener.request_timeout_secs,
            )))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
            .layer(TraceLayer::new_for_http())
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }
}

/// Record latency and status for every matched route.
async fn track_metrics(request: Request, next: Next) -> Response {
    let started = Instant::now();
    let endpoint = request
        .extensions()
        .get::<MatchedPath>()
        .map(|path| path.as_str().to_string())
        .unwrap_or_else(|| request.uri().path().to_string());
    let method = request.method().clone();

    let response = next.run(request).await;

    metrics::record_http_request(
        method.as_str(),
        &endpoint,
        response.status().as_u16(),
        started.elapsed(),
    );
    response
}
