//! In-memory reference session store.
//!
//! # Design Decisions
//! - DashMap shards the store, so request workers and the expiry sweeper
//!   touch it concurrently without a global lock
//! - The sweeper runs on a fixed 1-second cadence and never holds a shard
//!   lock across an await
//! - Session ids combine wall-clock time with a random component; time alone
//!   is guessable and inadequate outside low-security deployments

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use dashmap::DashMap;
use tokio::sync::broadcast;

use crate::lifecycle::Shutdown;
use crate::session::storage::SessionStorage;

const SWEEP_INTERVAL: Duration = Duration::from_secs(1);

/// One stored session.
#[derive(Debug, Clone)]
struct SessionRecord {
    expires_at: u64,
    data: HashMap<String, String>,
}

/// Reference [`SessionStorage`] backed by a sharded concurrent map with a
/// background expiry sweep.
pub struct MemoryStorage {
    ttl_secs: AtomicU64,
    records: Arc<DashMap<String, SessionRecord>>,
    started: AtomicBool,
    stop: Mutex<Option<broadcast::Receiver<()>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self {
            ttl_secs: AtomicU64::new(0),
            records: Arc::new(DashMap::new()),
            started: AtomicBool::new(false),
            stop: Mutex::new(None),
        }
    }

    /// Tie the sweeper's lifetime to a shutdown coordinator.
    pub fn with_shutdown(shutdown: &Shutdown) -> Self {
        let storage = Self::new();
        if let Ok(mut slot) = storage.stop.lock() {
            *slot = Some(shutdown.subscribe());
        }
        storage
    }

    fn sweep(records: &DashMap<String, SessionRecord>) {
        let now = unix_now();
        records.retain(|_, record| record.expires_at > now);
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStorage for MemoryStorage {
    fn init(&self, ttl_secs: u64) {
        if self.started.swap(true, Ordering::SeqCst) {
            return;
        }
        self.ttl_secs.store(ttl_secs, Ordering::SeqCst);

        let records = self.records.clone();
        let stop = self.stop.lock().ok().and_then(|mut slot| slot.take());
        tokio::spawn(async move {
            let mut tick = tokio::time::interval(SWEEP_INTERVAL);
            match stop {
                Some(mut rx) => loop {
                    tokio::select! {
                        _ = tick.tick() => Self::sweep(&records),
                        _ = rx.recv() => break,
                    }
                },
                None => loop {
                    tick.tick().await;
                    Self::sweep(&records);
                },
            }
        });
    }

    fn create_session_id(&self) -> String {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();
        let nonce: u64 = rand::random();
        format!("SESS{}{}{:016x}", now.as_secs(), now.subsec_nanos(), nonce)
    }

    fn set(&self, id: &str, data: HashMap<String, String>) {
        let record = SessionRecord {
            expires_at: unix_now() + self.ttl_secs.load(Ordering::SeqCst),
            data,
        };
        self.records.insert(id.to_string(), record);
    }

    fn get(&self, id: &str) -> HashMap<String, String> {
        let now = unix_now();
        if let Some(mut record) = self.records.get_mut(id) {
            if record.expires_at <= now {
                drop(record);
                self.records.remove(id);
                return HashMap::new();
            }
            record.expires_at = now + self.ttl_secs.load(Ordering::SeqCst);
            return record.data.clone();
        }
        HashMap::new()
    }

    fn delete(&self, id: &str) {
        self.records.remove(id);
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unknown_session_is_empty_not_an_error() {
        let storage = MemoryStorage::new();
        storage.init(60);
        assert!(storage.get("nonexistent-id").is_empty());
    }

    #[tokio::test]
    async fn set_then_get_round_trips_and_refreshes() {
        let storage = MemoryStorage::new();
        storage.init(60);
        let mut data = HashMap::new();
        data.insert("user".to_string(), "alice".to_string());
        storage.set("sid-1", data);
        assert_eq!(storage.get("sid-1").get("user").map(String::as_str), Some("alice"));
    }

    #[tokio::test]
    async fn sweep_removes_expired_records() {
        let storage = MemoryStorage::new();
        storage.init(60);
        storage.records.insert(
            "stale".to_string(),
            SessionRecord {
                expires_at: unix_now().saturating_sub(5),
                data: HashMap::from([("k".to_string(), "v".to_string())]),
            },
        );
        MemoryStorage::sweep(&storage.records);
        assert!(storage.get("stale").is_empty());
    }

    #[tokio::test]
    async fn expired_record_is_unreachable_even_before_sweep() {
        let storage = MemoryStorage::new();
        storage.init(60);
        storage.records.insert(
            "stale".to_string(),
            SessionRecord {
                expires_at: unix_now().saturating_sub(1),
                data: HashMap::from([("k".to_string(), "v".to_string())]),
            },
        );
        assert!(storage.get("stale").is_empty());
    }

    #[tokio::test]
    async fn delete_removes_the_record_and_tolerates_absent_ids() {
        let storage = MemoryStorage::new();
        storage.init(60);
        storage.set("sid", HashMap::from([("k".to_string(), "v".to_string())]));
        storage.delete("sid");
        assert!(storage.get("sid").is_empty());
        // Deleting again, or deleting an id that never existed, is a no-op.
        storage.delete("sid");
        storage.delete("never-created");
    }

    #[tokio::test]
    async fn session_ids_are_unique() {
        let storage = MemoryStorage::new();
        let a = storage.create_session_id();
        let b = storage.create_session_id();
        assert_ne!(a, b);
        assert!(a.starts_with("SESS"));
    }

    #[tokio::test]
    async fn init_is_idempotent() {
        let storage = MemoryStorage::new();
        storage.init(60);
        storage.set("sid", HashMap::from([("k".to_string(), "v".to_string())]));
        storage.init(1); // ignored; ttl stays 60
        assert_eq!(storage.ttl_secs.load(Ordering::SeqCst), 60);
    }
}
