//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Registration (startup, single-threaded):
//!     pattern string
//!         → rule.rs (token scan, regex compile)
//!         → RoutingTable (exact list or pattern list, in order)
//!
//! Request time (concurrent, read-only):
//!     path + method
//!         → table.rs resolve: static prefix → exact rules → pattern rules
//!         → Resolution: rule + captured params, static file, or NotFound
//! ```
//!
//! # Design Decisions
//! - Rules are compiled once at registration and frozen; lookups are lock-free
//! - A pattern-compile failure aborts startup rather than skipping the route
//! - Captured path segments surface as ordinary request parameters

pub mod rule;
pub mod table;

pub use rule::{HandlerFactory, PatternError, RoutingRule};
pub use table::{Resolution, RoutingTable};
