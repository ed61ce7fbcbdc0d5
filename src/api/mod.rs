//! HTTP API for appointment-status prediction.
//!
//! `prediction_router()` returns a `Router` that can be mounted on any
//! axum server; `start_server()` binds it and runs it in the background.

pub mod endpoints;
pub mod error;
pub mod middleware;
pub mod router;
pub mod server;
pub mod types;

pub use router::prediction_router;
pub use server::{start_server, PredictionServer, ServerSession};
pub use types::ApiContext;
