//! Background Tasks Module
//!
//! Contains background tasks that run periodically during server operation.
//!
//! # Tasks
//! - Expired-entry sweep: optional; caches otherwise expire lazily on read

mod sweep;

pub use sweep::spawn_sweep_task;
