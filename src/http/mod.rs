//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware, request ID, metrics)
//!     → handlers.rs (parse + validate, invoke gateway operation)
//!     → response.rs (JSON envelopes, GatewayError → status code)
//!     → Send to client
//! ```

pub mod handlers;
pub mod response;
pub mod server;

pub use server::{AppState, HttpServer};
