//! Typed read/write policy over a [`CacheStore`].

use std::{sync::Arc, time::Duration};

use metrics::counter;
use tokio::time::timeout;
use tracing::{debug, instrument};

use crate::domain::entities::{VesselEntry, VesselList};

use super::{CacheError, CacheStore};

/// Outcome of a cache read.
///
/// Reads are fail-open: a broken or slow store yields [`CacheLookup::Error`]
/// and the caller falls through to the source exactly as on a miss.
#[derive(Debug)]
pub enum CacheLookup {
    Hit(VesselList),
    Miss,
    Error(CacheError),
}

impl CacheLookup {
    pub fn into_hit(self) -> Option<VesselList> {
        match self {
            CacheLookup::Hit(vessels) => Some(vessels),
            CacheLookup::Miss | CacheLookup::Error(_) => None,
        }
    }

    pub fn outcome(&self) -> &'static str {
        match self {
            CacheLookup::Hit(_) => "hit",
            CacheLookup::Miss => "miss",
            CacheLookup::Error(_) => "error",
        }
    }
}

#[derive(Clone)]
pub struct CacheGateway {
    store: Arc<dyn CacheStore>,
    operation_timeout: Duration,
}

impl CacheGateway {
    pub fn new(store: Arc<dyn CacheStore>, operation_timeout: Duration) -> Self {
        Self {
            store,
            operation_timeout,
        }
    }

    /// Read and decode the vessel list stored at `key`.
    #[instrument(skip(self))]
    pub async fn lookup(&self, key: &str) -> CacheLookup {
        let read = match timeout(self.operation_timeout, self.store.get(key)).await {
            Ok(read) => read,
            Err(_) => Err(CacheError::Timeout(self.operation_timeout)),
        };

        let lookup = match read {
            Ok(Some(bytes)) => match serde_json::from_slice::<VesselList>(&bytes) {
                Ok(vessels) => CacheLookup::Hit(vessels),
                Err(err) => CacheLookup::Error(CacheError::Serialization(err)),
            },
            Ok(None) => CacheLookup::Miss,
            Err(err) => CacheLookup::Error(err),
        };

        match &lookup {
            CacheLookup::Hit(_) => counter!("buques_cache_hit_total").increment(1),
            CacheLookup::Miss => counter!("buques_cache_miss_total").increment(1),
            CacheLookup::Error(_) => counter!("buques_cache_error_total").increment(1),
        }
        debug!(cache = "vessels", outcome = lookup.outcome(), "cache lookup");

        lookup
    }

    /// Serialize `vessels` and write them to `key` with the given expiry.
    #[instrument(skip(self, vessels), fields(rows = vessels.len()))]
    pub async fn store(
        &self,
        key: &str,
        vessels: &[VesselEntry],
        ttl: Duration,
    ) -> Result<(), CacheError> {
        let result = match serde_json::to_vec(vessels) {
            Ok(payload) => {
                match timeout(self.operation_timeout, self.store.set(key, payload, ttl)).await {
                    Ok(written) => written,
                    Err(_) => Err(CacheError::Timeout(self.operation_timeout)),
                }
            }
            Err(err) => Err(CacheError::Serialization(err)),
        };

        if result.is_err() {
            counter!("buques_cache_store_error_total").increment(1);
        }
        result
    }

    pub async fn ping(&self) -> Result<(), CacheError> {
        match timeout(self.operation_timeout, self.store.ping()).await {
            Ok(result) => result,
            Err(_) => Err(CacheError::Timeout(self.operation_timeout)),
        }
    }
}
