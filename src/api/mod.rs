//! API Module
//!
//! HTTP handlers and routing for the cache service REST API. Request
//! validation (empty keys, flush confirmation) lives here at the boundary;
//! the cache core below never sees an invalid key.

pub mod handlers;
pub mod routes;

pub use handlers::AppState;
pub use routes::create_router;
