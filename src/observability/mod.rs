//! Observability subsystem.
//!
//! # Design Decisions
//! - Structured logging via tracing; every dispatch emits a debug event
//! - HTTP-level spans come from tower-http's TraceLayer in the serve glue

pub mod logging;

pub use logging::init_logging;
