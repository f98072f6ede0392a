//! Security subsystem.
//!
//! # Design Decisions
//! - Fail closed: a cookie that does not verify is treated as absent
//! - No trust in client input: session ids are only ever minted server-side

pub mod signing;
