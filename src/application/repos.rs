//! Repository traits describing persistence adapters.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{entities::VesselList, types::PortId};

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("source unavailable: {0}")]
    SourceUnavailable(String),
    #[error("row could not be decoded: {0}")]
    RowDecode(String),
}

impl RepoError {
    pub fn source_unavailable(err: impl std::fmt::Display) -> Self {
        Self::SourceUnavailable(err.to_string())
    }

    pub fn row_decode(err: impl std::fmt::Display) -> Self {
        Self::RowDecode(err.to_string())
    }

    /// Message safe to show to clients when error detail is withheld.
    pub fn public_message(&self) -> &'static str {
        match self {
            RepoError::SourceUnavailable(_) => "Service temporarily unavailable",
            RepoError::RowDecode(_) => "Unexpected error occurred",
        }
    }
}

#[async_trait]
pub trait VesselsRepo: Send + Sync {
    /// Vessels currently in `port`, in arrival order.
    async fn current_vessels(&self, port: PortId) -> Result<VesselList, RepoError>;

    async fn health_check(&self) -> Result<(), RepoError>;
}
