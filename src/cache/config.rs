//! Cache policy configuration.

use std::time::Duration;

pub(crate) const DEFAULT_CACHE_KEY: &str = "BUQUES_EN_PUERTO";
pub(crate) const DEFAULT_TTL_SECS: u64 = 10;
pub(crate) const DEFAULT_OPERATION_TIMEOUT_MS: u64 = 500;

/// Policy applied by [`super::CacheGateway`] and the vessels service.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Key holding the serialized vessel list.
    pub key: String,
    /// Expiry applied on every write.
    pub ttl: Duration,
    /// Upper bound for a single cache read or write.
    pub operation_timeout: Duration,
    /// Collapse concurrent misses on the same key into one source fetch.
    pub coalesce_misses: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            key: DEFAULT_CACHE_KEY.to_string(),
            ttl: Duration::from_secs(DEFAULT_TTL_SECS),
            operation_timeout: Duration::from_millis(DEFAULT_OPERATION_TIMEOUT_MS),
            coalesce_misses: false,
        }
    }
}

impl From<&crate::config::CacheSettings> for CacheConfig {
    fn from(settings: &crate::config::CacheSettings) -> Self {
        Self {
            key: settings.key.clone(),
            ttl: settings.ttl,
            operation_timeout: settings.operation_timeout,
            coalesce_misses: settings.coalesce_misses,
        }
    }
}
