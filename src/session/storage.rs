//! Pluggable session storage.

use std::collections::HashMap;

/// Persistence backend for session records.
///
/// Implementations are shared across every in-flight request and must be
/// internally synchronized. `init` is called lazily before the first
/// operation and must be idempotent; a backend that has already allocated
/// its store ignores a second call.
pub trait SessionStorage: Send + Sync {
    /// Prepare the store with the idle TTL. Idempotent.
    fn init(&self, ttl_secs: u64);

    /// Mint a new session identifier. Uniqueness strategy is the backend's
    /// choice; ids are only ever created server-side.
    fn create_session_id(&self) -> String;

    /// Upsert the full data map for `id` and reset its expiry.
    fn set(&self, id: &str, data: HashMap<String, String>);

    /// Fetch the data map for `id`, refreshing its expiry. Unknown or
    /// expired ids yield an empty map, indistinguishable from a fresh
    /// session.
    fn get(&self, id: &str) -> HashMap<String, String>;

    /// Remove the record. No-op if absent.
    fn delete(&self, id: &str);
}
