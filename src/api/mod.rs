//! HTTP API module
//!
//! This module exposes the authentication flows over HTTP:
//! - Routing and request handling
//! - Trace ID propagation and request logging
//! - Error handling and response formatting

pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod server;

pub use handlers::AppState;
pub use middleware::{trace_id_middleware, TraceId, TRACE_ID_HEADER};
pub use server::ApiServer;
