use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Per-key single-flight gate for cache misses.
///
/// The first request to miss on a key takes the gate and fetches; requests
/// that miss while it is held wait, then re-read the cache before deciding to
/// fetch themselves. Slots are kept for the process lifetime, which is fine
/// for the handful of fixed keys this service uses.
#[derive(Default, Clone)]
pub struct MissCoalescer {
    slots: Arc<DashMap<String, Arc<Mutex<()>>>>,
}

impl MissCoalescer {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn acquire(&self, key: &str) -> OwnedMutexGuard<()> {
        let slot = self.slots.entry(key.to_string()).or_default().clone();
        slot.lock_owned().await
    }

    /// Whether a fetch for `key` currently holds the gate.
    #[cfg(test)]
    fn is_busy(&self, key: &str) -> bool {
        self.slots
            .get(key)
            .is_some_and(|slot| slot.try_lock().is_err())
    }
}
