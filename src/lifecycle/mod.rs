//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup: load config → validate → build gateway → bind listener → serve
//! Shutdown: ctrl-c → broadcast signal → stop accepting → drain → exit
//! ```

pub mod shutdown;

pub use shutdown::Shutdown;
