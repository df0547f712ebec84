use thiserror::Error;

use crate::{
    db_types::Tenant,
    sync_api::sync_objects::{ExternalCustomer, ExternalOrder, ExternalProduct},
};

#[derive(Debug, Clone, Error)]
pub enum FetchError {
    #[error("Could not create an upstream client for tenant #{tenant_id}. {reason}")]
    ClientSetup { tenant_id: i64, reason: String },
    #[error("Upstream request failed. {0}")]
    RequestFailed(String),
    #[error("Upstream returned an invalid response. {0}")]
    InvalidResponse(String),
}

/// One page of upstream records. `next_page` is an opaque cursor to pass back to the fetcher; `None` means the
/// collection is exhausted.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub records: Vec<T>,
    pub next_page: Option<String>,
}

impl<T> Page<T> {
    pub fn last(records: Vec<T>) -> Self {
        Self { records, next_page: None }
    }

    pub fn with_next<S: Into<String>>(records: Vec<T>, next_page: S) -> Self {
        Self { records, next_page: Some(next_page.into()) }
    }
}

/// Pulls full resource collections from the upstream platform, one page at a time, using the given tenant's
/// credentials. Records must be returned in the upstream's order.
///
/// Retry and rate-limit handling, if any, belongs to the implementation.
#[allow(async_fn_in_trait)]
pub trait ResourceFetcher {
    async fn fetch_products(&self, tenant: &Tenant, cursor: Option<String>)
        -> Result<Page<ExternalProduct>, FetchError>;

    async fn fetch_customers(
        &self,
        tenant: &Tenant,
        cursor: Option<String>,
    ) -> Result<Page<ExternalCustomer>, FetchError>;

    async fn fetch_orders(&self, tenant: &Tenant, cursor: Option<String>) -> Result<Page<ExternalOrder>, FetchError>;
}
