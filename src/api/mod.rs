//! HTTP API module.
//!
//! Provides the axum server and its request/response types.

pub mod server;
pub mod types;

pub use server::start_server;
pub use types::*;
