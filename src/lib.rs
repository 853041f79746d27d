//! Simplicache - Multi-layer result cache for text simplification requests
//!
//! Composes a bounded in-process fast tier and a Redis-backed durable tier
//! into one logical read-through/write-through cache, with monitoring and
//! threshold-based alerting on top.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod monitor;
pub mod service;
pub mod tasks;

pub use api::AppState;
pub use config::Config;
pub use service::CacheService;
pub use tasks::spawn_cleanup_task;
