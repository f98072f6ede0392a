//! Session subsystem.
//!
//! # Data Flow
//! ```text
//! Request → SessionHandle (lazy: signed cookie → id, or mint id + cookie)
//!     → SessionManager (init-once, forwards CRUD)
//!     → SessionStorage (pluggable; MemoryStorage is the reference impl)
//!
//! Background: MemoryStorage sweeper (1s cadence) deletes expired records.
//! ```
//!
//! # Design Decisions
//! - A session id is only ever created server-side; the cookie carrying it is
//!   signed, and a forged or expired cookie reads as "no cookie"
//! - Unknown and expired ids yield an empty map, never an error

pub mod handle;
pub mod manager;
pub mod memory;
pub mod storage;

pub use handle::SessionHandle;
pub use manager::SessionManager;
pub use memory::MemoryStorage;
pub use storage::SessionStorage;
