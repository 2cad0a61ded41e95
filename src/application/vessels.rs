//! Cache-aside orchestration for the vessels-in-port listing.

use tracing::{info, instrument, warn};

use crate::{
    cache::{CacheConfig, CacheGateway, CacheLookup, MissCoalescer},
    domain::{entities::VesselList, types::PortId},
};

use super::{repos::RepoError, source::SourceFetcher};

const TARGET: &str = "buques::vessels";

pub struct VesselService {
    gateway: CacheGateway,
    source: SourceFetcher,
    config: CacheConfig,
    port: PortId,
    coalescer: Option<MissCoalescer>,
}

impl VesselService {
    pub fn new(
        gateway: CacheGateway,
        source: SourceFetcher,
        config: CacheConfig,
        port: PortId,
    ) -> Self {
        let coalescer = config.coalesce_misses.then(MissCoalescer::new);
        Self {
            gateway,
            source,
            config,
            port,
            coalescer,
        }
    }

    pub fn gateway(&self) -> &CacheGateway {
        &self.gateway
    }

    pub fn source(&self) -> &SourceFetcher {
        &self.source
    }

    /// Vessels currently in port, served from cache when possible.
    ///
    /// Only source failures are returned; cache failures are logged and the
    /// request proceeds as if the cache were empty.
    #[instrument(skip(self), fields(port = %self.port))]
    pub async fn current_vessels(&self) -> Result<VesselList, RepoError> {
        if let Some(vessels) = self.read_cache().await {
            return Ok(vessels);
        }

        let Some(coalescer) = &self.coalescer else {
            return self.fetch_and_populate().await;
        };

        let _gate = coalescer.acquire(&self.config.key).await;
        // Whoever held the gate before us has likely repopulated the key.
        if let Some(vessels) = self.read_cache().await {
            return Ok(vessels);
        }
        self.fetch_and_populate().await
    }

    async fn read_cache(&self) -> Option<VesselList> {
        match self.gateway.lookup(&self.config.key).await {
            CacheLookup::Hit(vessels) => Some(vessels),
            CacheLookup::Miss => None,
            CacheLookup::Error(err) => {
                warn!(
                    target = TARGET,
                    key = %self.config.key,
                    error = %err,
                    "cache read failed; falling through to source"
                );
                None
            }
        }
    }

    async fn fetch_and_populate(&self) -> Result<VesselList, RepoError> {
        info!(target = TARGET, port = %self.port, "querying source for vessels in port");
        let vessels = self.source.fetch_current_vessels(self.port).await?;

        if let Err(err) = self
            .gateway
            .store(&self.config.key, &vessels, self.config.ttl)
            .await
        {
            warn!(
                target = TARGET,
                key = %self.config.key,
                error = %err,
                "failed to populate cache; next request will query the source again"
            );
        }

        Ok(vessels)
    }
}
