//! Redis-backed [`CacheStore`].

use std::time::Duration;

use async_trait::async_trait;
use redis::{
    AsyncCommands, Client, ConnectionAddr, ConnectionInfo, RedisConnectionInfo,
    aio::ConnectionManager,
};
use tokio::time::timeout;
use tracing::info;

use crate::cache::{CacheError, CacheStore};
use crate::config::RedisSettings;

/// Redis store sharing one multiplexed connection across requests.
///
/// [`ConnectionManager`] is cheap to clone and reconnects on its own after
/// connection loss; each operation works on a clone.
#[derive(Clone)]
pub struct RedisStore {
    connection: ConnectionManager,
}

impl RedisStore {
    /// Connect and verify the server answers `PING`, giving up after
    /// `deadline` instead of waiting out the driver's reconnect backoff.
    pub async fn connect(
        settings: &RedisSettings,
        deadline: Duration,
    ) -> Result<Self, CacheError> {
        match timeout(deadline, Self::establish(settings)).await {
            Ok(result) => result,
            Err(_) => Err(CacheError::Timeout(deadline)),
        }
    }

    async fn establish(settings: &RedisSettings) -> Result<Self, CacheError> {
        let info = ConnectionInfo {
            addr: ConnectionAddr::Tcp(settings.host.clone(), settings.port),
            redis: RedisConnectionInfo {
                db: settings.db,
                password: settings.password.clone(),
                ..Default::default()
            },
        };

        let client = Client::open(info)?;
        let connection = ConnectionManager::new(client).await?;
        let store = Self { connection };
        store.ping().await?;

        info!(
            target = "buques::cache",
            host = %settings.host,
            port = settings.port,
            db = settings.db,
            "connected to redis"
        );
        Ok(store)
    }
}

#[async_trait]
impl CacheStore for RedisStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        let mut connection = self.connection.clone();
        let value: Option<Vec<u8>> = connection.get(key).await?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<(), CacheError> {
        let millis = u64::try_from(ttl.as_millis())
            .map_err(|_| CacheError::unavailable("ttl exceeds supported range"))?;
        if millis == 0 {
            return Err(CacheError::unavailable("ttl must be at least one millisecond"));
        }

        let mut connection = self.connection.clone();
        let () = connection.pset_ex(key, value, millis).await?;
        Ok(())
    }

    async fn ping(&self) -> Result<(), CacheError> {
        let mut connection = self.connection.clone();
        let _pong: String = redis::cmd("PING").query_async(&mut connection).await?;
        Ok(())
    }
}
