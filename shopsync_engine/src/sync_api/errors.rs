use std::fmt::Display;

use thiserror::Error;

use crate::{
    sync_api::sync_report::{SyncCounts, SyncStage},
    traits::{CommerceDatabaseError, FetchError, TenantApiError},
};

#[derive(Debug, Clone, Error)]
pub enum SyncError {
    #[error("Tenant #{0} does not exist")]
    TenantNotFound(i64),
    #[error("Upstream fetch failed. {0}")]
    UpstreamFetchFailed(#[from] FetchError),
    #[error("Persistence failure. {0}")]
    PersistenceFailed(#[from] CommerceDatabaseError),
}

impl From<TenantApiError> for SyncError {
    fn from(e: TenantApiError) -> Self {
        SyncError::PersistenceFailed(e.into())
    }
}

#[derive(Debug, Clone, Error)]
pub enum WebhookError {
    #[error("No tenant is registered for the shop {0}")]
    TenantNotFound(String),
    #[error("Persistence failure. {0}")]
    PersistenceFailed(#[from] CommerceDatabaseError),
}

impl From<TenantApiError> for WebhookError {
    fn from(e: TenantApiError) -> Self {
        WebhookError::PersistenceFailed(e.into())
    }
}

/// A failed sync run. `counts` holds what was completed before the failure; `stage` is `None` when the run failed
/// before any stage started (e.g. the tenant does not exist).
#[derive(Debug, Clone, Error)]
pub struct StageFailure {
    pub stage: Option<SyncStage>,
    pub counts: SyncCounts,
    #[source]
    pub source: SyncError,
}

impl StageFailure {
    pub fn new(stage: Option<SyncStage>, counts: SyncCounts, source: SyncError) -> Self {
        Self { stage, counts, source }
    }
}

impl Display for StageFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.stage {
            Some(stage) => write!(f, "Sync failed during the {stage} stage. {}", self.source),
            None => write!(f, "Sync failed. {}", self.source),
        }
    }
}
