//! Push-based reconciliation of single resources delivered by webhooks.
//!
//! Callers are expected to have authenticated the delivery before calling in. This API attributes the record to a
//! tenant by shop domain and hands it to the same [`Reconciler`] that bulk sync uses.
use std::fmt::Debug;

use log::*;

use crate::{
    db_types::{Customer, Product, Tenant},
    sync_api::{
        errors::WebhookError,
        reconciler::{ReconciledOrder, Reconciler},
        sync_objects::{ExternalCustomer, ExternalOrder, ExternalProduct},
        tenant_api::normalize_shop_domain,
    },
    traits::CommerceDatabase,
};

pub struct WebhookApi<B> {
    reconciler: Reconciler<B>,
}

impl<B: Debug> Debug for WebhookApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "WebhookApi ({:?})", self.reconciler)
    }
}

impl<B> WebhookApi<B> {
    pub fn new(db: B) -> Self {
        Self { reconciler: Reconciler::new(db) }
    }

    pub fn db(&self) -> &B {
        self.reconciler.db()
    }
}

impl<B> WebhookApi<B>
where B: CommerceDatabase
{
    pub async fn handle_product_update(&self, shop_domain: &str, raw: ExternalProduct) -> Result<Product, WebhookError> {
        let tenant = self.tenant_for_shop(shop_domain).await?;
        let product = self.reconciler.reconcile_product(&tenant, raw).await?;
        info!("🪝️ Product {} updated for {shop_domain}", product.shopify_id);
        Ok(product)
    }

    /// Stores the order and its line items. The product lookup for the line items is a single batched query.
    pub async fn handle_order_create(
        &self,
        shop_domain: &str,
        raw: ExternalOrder,
    ) -> Result<ReconciledOrder, WebhookError> {
        let tenant = self.tenant_for_shop(shop_domain).await?;
        let result = self.reconciler.reconcile_order(&tenant, raw).await?;
        info!(
            "🪝️ Order {} stored for {shop_domain} with {} items ({} dropped)",
            result.order.shopify_id,
            result.items.len(),
            result.dropped_line_items
        );
        Ok(result)
    }

    pub async fn handle_customer_update(
        &self,
        shop_domain: &str,
        raw: ExternalCustomer,
    ) -> Result<Customer, WebhookError> {
        let tenant = self.tenant_for_shop(shop_domain).await?;
        let customer = self.reconciler.reconcile_customer(&tenant, raw).await?;
        info!("🪝️ Customer {} updated for {shop_domain}", customer.shopify_id);
        Ok(customer)
    }

    async fn tenant_for_shop(&self, shop_domain: &str) -> Result<Tenant, WebhookError> {
        match self.db().fetch_tenant_by_shop_domain(&normalize_shop_domain(shop_domain)).await? {
            Some(tenant) => Ok(tenant),
            None => {
                warn!("🪝️ Received a webhook for {shop_domain}, which is not a registered shop. Ignoring it.");
                Err(WebhookError::TenantNotFound(shop_domain.to_string()))
            },
        }
    }
}
