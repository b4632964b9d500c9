//! Backend RPC subsystem.
//!
//! # Data Flow
//! ```text
//! Gateway operation
//!     → backend.rs (ItemBackend trait: timeout + outcome classification)
//!     → client.rs (typed tonic stub, one method per RPC)
//!     → connection.rs (canonical channel, swapped on half-open probe)
//!     → proto.rs (prost wire types)
//! ```
//!
//! # Design Decisions
//! - Every attempt is bounded by an explicit timeout (writes 1s, reads 2s)
//! - Classification happens here, next to the transport that produced it
//! - The trait seam lets tests run the full gateway without a gRPC server

pub mod backend;
pub mod client;
pub mod connection;
pub mod proto;

pub use backend::{GrpcItemBackend, ItemBackend, Rejection, RpcFailure, RpcResult, UpdatedItem};
pub use connection::BackendConnection;
pub use proto::Item;
