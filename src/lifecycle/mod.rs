//! Process lifecycle.
//!
//! # Design Decisions
//! - Registration happens single-threaded before serving; the builder/freeze
//!   split in `app` enforces it
//! - Shutdown is cooperative: background tasks subscribe to a broadcast and
//!   exit on signal

pub mod shutdown;

pub use shutdown::Shutdown;
