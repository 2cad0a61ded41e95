//! Authoritative read against the relational store.

use std::{sync::Arc, time::Duration};

use metrics::{counter, histogram};
use tokio::time::{Instant, timeout};
use tracing::{debug, instrument};

use crate::domain::{entities::VesselList, types::PortId};

use super::repos::{RepoError, VesselsRepo};

#[derive(Clone)]
pub struct SourceFetcher {
    repo: Arc<dyn VesselsRepo>,
    deadline: Duration,
}

impl SourceFetcher {
    pub fn new(repo: Arc<dyn VesselsRepo>, deadline: Duration) -> Self {
        Self { repo, deadline }
    }

    /// Run the vessels query for `port`.
    ///
    /// A query that outlives the deadline is abandoned and reported as
    /// [`RepoError::SourceUnavailable`]; dropping the in-flight future releases
    /// the row stream and hands its connection back to the pool.
    #[instrument(skip(self), fields(port = %port))]
    pub async fn fetch_current_vessels(&self, port: PortId) -> Result<VesselList, RepoError> {
        counter!("buques_source_fetch_total").increment(1);
        let started = Instant::now();

        let result = match timeout(self.deadline, self.repo.current_vessels(port)).await {
            Ok(result) => result,
            Err(_) => Err(RepoError::source_unavailable(format!(
                "query exceeded deadline of {} ms",
                self.deadline.as_millis()
            ))),
        };

        let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
        histogram!("buques_source_fetch_ms").record(elapsed_ms);

        if let Ok(vessels) = &result {
            debug!(rows = vessels.len(), elapsed_ms, "fetched vessels from source");
        }
        result
    }

    pub async fn health_check(&self) -> Result<(), RepoError> {
        self.repo.health_check().await
    }
}
