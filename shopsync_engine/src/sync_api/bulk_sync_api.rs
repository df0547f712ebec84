//! Pull-based synchronisation of whole resource collections.
use std::fmt::Debug;

use log::*;

use crate::{
    db_types::Tenant,
    sync_api::{
        errors::{StageFailure, SyncError},
        reconciler::Reconciler,
        sync_report::{SyncCounts, SyncStage, SyncTarget},
    },
    traits::{CommerceDatabase, FetchError, ResourceFetcher},
};

/// `BulkSyncApi` drives full-collection pulls from the upstream platform into local storage.
///
/// Each stage walks every page the [`ResourceFetcher`] produces and reconciles the records one at a time, in the order
/// they were returned. The first failing record aborts the stage; records reconciled before it stay written.
pub struct BulkSyncApi<B, F> {
    reconciler: Reconciler<B>,
    fetcher: F,
}

impl<B: Debug, F> Debug for BulkSyncApi<B, F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "BulkSyncApi ({:?})", self.reconciler)
    }
}

impl<B, F> BulkSyncApi<B, F> {
    pub fn new(db: B, fetcher: F) -> Self {
        Self { reconciler: Reconciler::new(db), fetcher }
    }

    pub fn db(&self) -> &B {
        self.reconciler.db()
    }
}

impl<B, F> BulkSyncApi<B, F>
where
    B: CommerceDatabase,
    F: ResourceFetcher,
{
    pub async fn sync_products(&self, tenant_id: i64) -> Result<SyncCounts, SyncError> {
        self.sync_stage(tenant_id, SyncStage::Products).await
    }

    pub async fn sync_customers(&self, tenant_id: i64) -> Result<SyncCounts, SyncError> {
        self.sync_stage(tenant_id, SyncStage::Customers).await
    }

    /// Pulls every order and fans out its line items. Customers and products should be synced first, since orders
    /// and line items that refer to unknown rows are stored without those links.
    pub async fn sync_orders(&self, tenant_id: i64) -> Result<SyncCounts, SyncError> {
        self.sync_stage(tenant_id, SyncStage::Orders).await
    }

    /// Runs products, then customers, then orders. The first stage that fails stops the run, and the failure reports
    /// that stage along with the counts accumulated so far.
    pub async fn sync_all(&self, tenant_id: i64) -> Result<SyncCounts, StageFailure> {
        let tenant = self.fetch_tenant(tenant_id).await.map_err(|e| StageFailure::new(None, SyncCounts::default(), e))?;
        let mut counts = SyncCounts::default();
        for stage in SyncStage::ALL {
            if let Err(e) = self.run_stage(&tenant, stage, &mut counts).await {
                warn!("🔄️ Full sync for tenant #{tenant_id} stopped at the {stage} stage. {e}");
                return Err(StageFailure::new(Some(stage), counts, e));
            }
        }
        info!(
            "🔄️ Full sync for tenant #{tenant_id} complete. {} products, {} customers, {} orders.",
            counts.products, counts.customers, counts.orders
        );
        Ok(counts)
    }

    /// Runs the sync for `target`, reporting failures in the same shape as [`Self::sync_all`].
    pub async fn sync(&self, tenant_id: i64, target: SyncTarget) -> Result<SyncCounts, StageFailure> {
        let stage = match target {
            SyncTarget::All => return self.sync_all(tenant_id).await,
            SyncTarget::Stage(stage) => stage,
        };
        let tenant = self.fetch_tenant(tenant_id).await.map_err(|e| StageFailure::new(None, SyncCounts::default(), e))?;
        let mut counts = SyncCounts::default();
        match self.run_stage(&tenant, stage, &mut counts).await {
            Ok(()) => Ok(counts),
            Err(e) => Err(StageFailure::new(Some(stage), counts, e)),
        }
    }

    async fn sync_stage(&self, tenant_id: i64, stage: SyncStage) -> Result<SyncCounts, SyncError> {
        let tenant = self.fetch_tenant(tenant_id).await?;
        let mut counts = SyncCounts::default();
        self.run_stage(&tenant, stage, &mut counts).await?;
        Ok(counts)
    }

    async fn fetch_tenant(&self, tenant_id: i64) -> Result<Tenant, SyncError> {
        self.db().fetch_tenant(tenant_id).await?.ok_or_else(|| {
            debug!("🔄️ Sync requested for tenant #{tenant_id}, who does not exist");
            SyncError::TenantNotFound(tenant_id)
        })
    }

    async fn run_stage(&self, tenant: &Tenant, stage: SyncStage, counts: &mut SyncCounts) -> Result<(), SyncError> {
        debug!("🔄️ Starting {stage} sync for tenant #{} ({})", tenant.id, tenant.shop_domain);
        let mut cursor: Option<String> = None;
        let mut pages = 0usize;
        loop {
            let next_page = match stage {
                SyncStage::Products => {
                    let page = self.fetcher.fetch_products(tenant, cursor.clone()).await?;
                    for raw in page.records {
                        self.reconciler.reconcile_product(tenant, raw).await?;
                        counts.products += 1;
                    }
                    page.next_page
                },
                SyncStage::Customers => {
                    let page = self.fetcher.fetch_customers(tenant, cursor.clone()).await?;
                    for raw in page.records {
                        self.reconciler.reconcile_customer(tenant, raw).await?;
                        counts.customers += 1;
                    }
                    page.next_page
                },
                SyncStage::Orders => {
                    let page = self.fetcher.fetch_orders(tenant, cursor.clone()).await?;
                    for raw in page.records {
                        let result = self.reconciler.reconcile_order(tenant, raw).await?;
                        counts.orders += 1;
                        counts.line_items += result.items.len();
                        counts.dropped_line_items += result.dropped_line_items;
                        if result.customer_unresolved {
                            counts.unlinked_orders += 1;
                        }
                    }
                    page.next_page
                },
            };
            pages += 1;
            match next_page {
                Some(next) if cursor.as_ref() == Some(&next) => {
                    let msg = format!("The {stage} cursor did not advance past {next}");
                    return Err(FetchError::InvalidResponse(msg).into());
                },
                Some(next) => cursor = Some(next),
                None => break,
            }
        }
        info!("🔄️ {stage} sync for tenant #{} complete after {pages} pages. Running totals: {counts:?}", tenant.id);
        Ok(())
    }
}
