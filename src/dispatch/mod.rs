//! Dispatch subsystem: the per-request lifecycle.
//!
//! # Data Flow
//! ```text
//! Request
//!     → dispatcher.rs (routing lookup, stage sequencing)
//!     → scope.rs (context + template + session bundle; hook-wrapped
//!       render and output paths)
//!     → gate.rs (one-way write/finish latches)
//!     → Response
//! ```
//!
//! # Design Decisions
//! - The lifecycle is synchronous within one request's worker
//! - Early termination is observed through the gate after every stage, never
//!   through exceptions across the lifecycle boundary

pub mod gate;
pub(crate) mod dispatcher;
mod scope;

pub use gate::ResponseGate;
pub use scope::Scope;
