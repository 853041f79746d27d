//! Request and Response models for the cache service API
//!
//! This module defines the DTOs (Data Transfer Objects) used for
//! serializing/deserializing HTTP request and response bodies.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::{ExpireRequest, FlushParams, HistoryParams, SetRequest};
pub use responses::{
    DeleteResponse, ExistsResponse, ExpireResponse, FlushResponse, GetResponse, HealthResponse,
    ResetResponse, SetResponse, StatsResponse,
};
