// observability/mod.rs - Tracing Bootstrap

//! Structured logging setup for processes embedding the SDK.
//!
//! The SDK itself only emits `tracing` events; installing a subscriber is
//! the host process's call. This module provides a ready-made bootstrap:
//!
//! ```ignore
//! use spawn_sdk::observability::{init_tracing, TracingConfig};
//!
//! init_tracing(TracingConfig::default());
//! ```

mod tracing_setup;

pub use tracing_setup::{TracingConfig, TracingFormat, init_tracing};
