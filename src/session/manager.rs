//! Session manager: owns the storage adapter's lifecycle.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::session::storage::SessionStorage;

/// Forwards CRUD operations to the registered storage adapter, initializing
/// it lazily exactly once with the configured TTL.
pub struct SessionManager {
    storage: Arc<dyn SessionStorage>,
    ttl_secs: u64,
    inited: AtomicBool,
}

impl SessionManager {
    pub fn new(storage: Arc<dyn SessionStorage>, ttl_secs: u64) -> Self {
        Self {
            storage,
            ttl_secs,
            inited: AtomicBool::new(false),
        }
    }

    fn ensure_init(&self) {
        if !self.inited.swap(true, Ordering::SeqCst) {
            self.storage.init(self.ttl_secs);
        }
    }

    pub fn create_session_id(&self) -> String {
        self.ensure_init();
        self.storage.create_session_id()
    }

    pub fn set(&self, id: &str, data: HashMap<String, String>) {
        self.ensure_init();
        self.storage.set(id, data);
    }

    pub fn get(&self, id: &str) -> HashMap<String, String> {
        self.ensure_init();
        self.storage.get(id)
    }

    pub fn delete(&self, id: &str) {
        self.ensure_init();
        self.storage.delete(id);
    }
}
