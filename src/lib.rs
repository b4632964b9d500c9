//! HTTP-to-RPC gateway for the item service.
//!
//! Exposes a CRUD HTTP API for the "item" resource and forwards each
//! request to a backend gRPC service, translating between HTTP and RPC
//! semantics in both directions.
//!
//! # Architecture Overview
//!
//! ```text
//!  Client request
//!      │
//!      ▼
//!  ┌────────┐   ┌─────────┐   ┌────────────────────────────┐   ┌─────────┐
//!  │  http  │──▶│ gateway │──▶│         resilience         │──▶│   rpc   │──▶ gRPC
//!  │ server │   │   ops   │   │ circuit breaker → retries  │   │ invoker │    backend
//!  └────────┘   └─────────┘   └────────────────────────────┘   └─────────┘
//!      │                                                            │
//!      └──────── config · observability · lifecycle ────────────────┘
//! ```
//!
//! The resilience layer is the core: the breaker fails fast while the
//! backend is down, the retry policy bounds transient-failure attempts with
//! exponential backoff, and the channel to the backend is recreated before
//! each half-open probe.

// Core subsystems
pub mod config;
pub mod gateway;
pub mod http;
pub mod rpc;

// Resilience layer
pub mod resilience;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;

pub use config::GatewayConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
