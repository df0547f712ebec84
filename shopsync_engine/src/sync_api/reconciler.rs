//! Maps raw upstream records onto local rows.
//!
//! The reconciler is the only writer of products, customers, orders and order items, and is shared by the bulk pull
//! path ([`crate::BulkSyncApi`]) and the webhook path ([`crate::WebhookApi`]), so both apply identical merge rules.
//!
//! Rules:
//! * Every record is upserted on `(tenant, external id)`. Replaying a record is harmless; the last call wins.
//! * Numeric fields that are absent or unparsable are stored as zero.
//! * An order's customer is resolved by external id at the time the order is reconciled. If the customer isn't known
//!   yet, the link is left empty and is not repaired later when the customer arrives.
//! * Line items are only stored for products that already exist locally for the tenant. The rest are dropped and
//!   counted.
use std::{collections::HashMap, fmt::Debug};

use log::*;
use serde::Serialize;

use crate::{
    db_types::{Customer, ExternalId, NewCustomer, NewOrder, NewOrderItem, NewProduct, Order, OrderItem, Product, Tenant},
    sync_api::sync_objects::{parse_timestamp, ExternalCustomer, ExternalLineItem, ExternalOrder, ExternalProduct},
    traits::{CommerceDatabase, CommerceDatabaseError},
};

/// The outcome of reconciling one order, including its line-item fan-out.
#[derive(Debug, Clone, Serialize)]
pub struct ReconciledOrder {
    pub order: Order,
    pub items: Vec<OrderItem>,
    /// Line items that were skipped because they had no product id, or their product is not stored locally.
    pub dropped_line_items: usize,
    /// True if the order referenced a customer that could not be resolved locally.
    pub customer_unresolved: bool,
}

pub struct Reconciler<B> {
    db: B,
}

impl<B: Debug> Debug for Reconciler<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Reconciler ({:?})", self.db)
    }
}

impl<B> Reconciler<B> {
    pub fn new(db: B) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &B {
        &self.db
    }
}

impl<B> Reconciler<B>
where B: CommerceDatabase
{
    pub async fn reconcile_product(
        &self,
        tenant: &Tenant,
        raw: ExternalProduct,
    ) -> Result<Product, CommerceDatabaseError> {
        let price = raw.variant_prices.first().map(|p| p.to_money()).unwrap_or_default();
        let product = NewProduct { shopify_id: raw.id, title: raw.title.unwrap_or_default(), price };
        let product = self.db.upsert_product(tenant.id, product).await?;
        trace!("🔄️🛍️ Product {} reconciled as #{} for tenant #{}", product.shopify_id, product.id, tenant.id);
        Ok(product)
    }

    pub async fn reconcile_customer(
        &self,
        tenant: &Tenant,
        raw: ExternalCustomer,
    ) -> Result<Customer, CommerceDatabaseError> {
        let customer = NewCustomer {
            shopify_id: raw.id,
            email: raw.email,
            first_name: raw.first_name,
            last_name: raw.last_name,
            total_spent: raw.total_spent.to_money(),
        };
        let customer = self.db.upsert_customer(tenant.id, customer).await?;
        trace!("🔄️👤️ Customer {} reconciled as #{} for tenant #{}", customer.shopify_id, customer.id, tenant.id);
        Ok(customer)
    }

    /// Reconciles the order itself, then fans its line items out into order items.
    pub async fn reconcile_order(
        &self,
        tenant: &Tenant,
        raw: ExternalOrder,
    ) -> Result<ReconciledOrder, CommerceDatabaseError> {
        let customer_id = match &raw.customer_id {
            Some(cid) => self.db.fetch_customer_by_external_id(tenant.id, cid).await?.map(|c| c.id),
            None => None,
        };
        let customer_unresolved = raw.customer_id.is_some() && customer_id.is_none();
        if customer_unresolved {
            debug!(
                "🔄️📦️ Order {} refers to customer {:?}, who is unknown to tenant #{}. The order will not be linked.",
                raw.id, raw.customer_id, tenant.id
            );
        }
        let created_at = raw.created_at.as_deref().and_then(parse_timestamp);
        let order = NewOrder { shopify_id: raw.id, total_price: raw.total_price.to_money(), customer_id, created_at };
        let order = self.db.upsert_order(tenant.id, order).await?;
        trace!("🔄️📦️ Order {} reconciled as #{} for tenant #{}", order.shopify_id, order.id, tenant.id);
        let (items, dropped_line_items) = self.fan_out_line_items(tenant, &order, raw.line_items).await?;
        Ok(ReconciledOrder { order, items, dropped_line_items, customer_unresolved })
    }

    /// Stores one order item per line item whose product is known locally. All product ids are resolved with a
    /// single query. Items are written in payload order, so when two line items name the same product, the later one
    /// is what remains.
    async fn fan_out_line_items(
        &self,
        tenant: &Tenant,
        order: &Order,
        line_items: Vec<ExternalLineItem>,
    ) -> Result<(Vec<OrderItem>, usize), CommerceDatabaseError> {
        if line_items.is_empty() {
            return Ok((vec![], 0));
        }
        let mut product_ids = line_items.iter().filter_map(|li| li.product_id.clone()).collect::<Vec<ExternalId>>();
        product_ids.sort();
        product_ids.dedup();
        let products = if product_ids.is_empty() {
            HashMap::new()
        } else {
            self.db
                .fetch_products_by_external_ids(tenant.id, &product_ids)
                .await?
                .into_iter()
                .map(|p| (p.shopify_id, p.id))
                .collect::<HashMap<ExternalId, i64>>()
        };
        let mut items = Vec::with_capacity(line_items.len());
        let mut dropped = 0;
        for li in line_items {
            let product_id = match li.product_id.as_ref().and_then(|pid| products.get(pid)) {
                Some(id) => *id,
                None => {
                    trace!("🔄️📦️ Dropping line item for unknown product {:?} on order {}", li.product_id, order.shopify_id);
                    dropped += 1;
                    continue;
                },
            };
            let item = NewOrderItem {
                order_id: order.id,
                product_id,
                quantity: li.quantity.to_quantity(),
                price: li.price.to_money(),
            };
            let item = self.db.upsert_order_item(item).await?;
            match items.iter_mut().find(|i: &&mut OrderItem| i.id == item.id) {
                Some(existing) => *existing = item,
                None => items.push(item),
            }
        }
        if dropped > 0 {
            debug!(
                "🔄️📦️ {dropped} line items on order {} were dropped because their products are not stored for tenant \
                 #{}",
                order.shopify_id,
                tenant.id
            );
        }
        Ok((items, dropped))
    }
}
