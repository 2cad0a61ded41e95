//! Cache store abstraction and the in-process implementation.

use std::{collections::HashMap, sync::RwLock, time::Duration};

use async_trait::async_trait;
use tokio::time::Instant;

use super::error::CacheError;
use super::lock::{rw_read, rw_write};

const SOURCE: &str = "cache::store";

/// Byte-level key/value store with per-entry expiry.
///
/// Implementations own expiry: an entry past its TTL must read as absent.
#[async_trait]
pub trait CacheStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError>;

    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<(), CacheError>;

    async fn ping(&self) -> Result<(), CacheError>;
}

struct MemoryEntry {
    value: Vec<u8>,
    expires_at: Instant,
}

/// In-process store keyed by string, expiring on the tokio clock.
///
/// Expired entries are skipped on read and replaced on the next write to the
/// same key; there is no sweeper task.
#[derive(Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, MemoryEntry>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live (unexpired) entries.
    pub fn len(&self) -> usize {
        let now = Instant::now();
        rw_read(&self.entries, SOURCE, "memory_len")
            .values()
            .filter(|entry| entry.expires_at > now)
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl CacheStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        let now = Instant::now();
        let entries = rw_read(&self.entries, SOURCE, "memory_get");
        Ok(entries
            .get(key)
            .filter(|entry| entry.expires_at > now)
            .map(|entry| entry.value.clone()))
    }

    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<(), CacheError> {
        let expires_at = Instant::now()
            .checked_add(ttl)
            .ok_or_else(|| CacheError::unavailable("ttl exceeds the clock range"))?;
        let entry = MemoryEntry { value, expires_at };
        rw_write(&self.entries, SOURCE, "memory_set").insert(key.to_string(), entry);
        Ok(())
    }

    async fn ping(&self) -> Result<(), CacheError> {
        Ok(())
    }
}
