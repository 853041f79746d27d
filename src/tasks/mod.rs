//! Background Tasks Module
//!
//! Contains background tasks that run periodically during service operation.
//!
//! # Tasks
//! - Fast-layer sweep: purges expired in-process entries at configured intervals

mod cleanup;

pub use cleanup::spawn_cleanup_task;
