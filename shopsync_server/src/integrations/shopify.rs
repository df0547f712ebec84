//! Glue between the Shopify client and the sync engine.
//!
//! [`ShopifyFetcher`] is the engine's [`ResourceFetcher`] for Shopify. It builds a client per tenant from the tenant's
//! own credentials. The `*_from_shopify` functions turn Shopify payloads into the engine's raw record types. They do no
//! coercion of their own; the loosely typed fields are passed through for the reconciler to deal with.
use log::*;
use shopify_tools::{
    LineItem,
    ShopifyApi,
    ShopifyApiError,
    ShopifyConfig as ShopifyApiConfig,
    ShopifyCustomer,
    ShopifyId,
    ShopifyOrder,
    ShopifyPage,
    ShopifyProduct,
};
use shopsync_engine::{
    db_types::{ExternalId, Tenant},
    sync_objects::{ExternalCustomer, ExternalLineItem, ExternalOrder, ExternalProduct, LooseNumber},
    FetchError,
    Page,
    ResourceFetcher,
};

#[derive(Debug, Clone)]
pub struct ShopifyFetcher {
    api_version: String,
    page_size: u32,
}

impl ShopifyFetcher {
    pub fn new<S: Into<String>>(api_version: S, page_size: u32) -> Self {
        Self { api_version: api_version.into(), page_size }
    }

    fn client(&self, tenant: &Tenant) -> Result<ShopifyApi, FetchError> {
        let config = ShopifyApiConfig::new(tenant.shop_domain.clone(), tenant.access_token.clone())
            .with_api_version(self.api_version.clone())
            .with_page_size(self.page_size);
        ShopifyApi::new(config).map_err(|e| FetchError::ClientSetup { tenant_id: tenant.id, reason: e.to_string() })
    }
}

impl ResourceFetcher for ShopifyFetcher {
    async fn fetch_products(&self, tenant: &Tenant, cursor: Option<String>) -> Result<Page<ExternalProduct>, FetchError> {
        let page = self.client(tenant)?.fetch_products(cursor.as_deref()).await.map_err(fetch_error)?;
        Ok(into_page(page, product_from_shopify))
    }

    async fn fetch_customers(
        &self,
        tenant: &Tenant,
        cursor: Option<String>,
    ) -> Result<Page<ExternalCustomer>, FetchError> {
        let page = self.client(tenant)?.fetch_customers(cursor.as_deref()).await.map_err(fetch_error)?;
        Ok(into_page(page, customer_from_shopify))
    }

    async fn fetch_orders(&self, tenant: &Tenant, cursor: Option<String>) -> Result<Page<ExternalOrder>, FetchError> {
        let page = self.client(tenant)?.fetch_orders(cursor.as_deref()).await.map_err(fetch_error)?;
        Ok(into_page(page, order_from_shopify))
    }
}

fn into_page<T, U, F: Fn(T) -> U>(page: ShopifyPage<T>, f: F) -> Page<U> {
    let records = page.items.into_iter().map(f).collect();
    Page { records, next_page: page.next_page_info }
}

fn fetch_error(e: ShopifyApiError) -> FetchError {
    warn!("🛍️ Shopify request failed. {e}");
    match e {
        ShopifyApiError::Initialization(s) => FetchError::RequestFailed(s),
        ShopifyApiError::RestRequestError(_) | ShopifyApiError::QueryError { .. } => {
            FetchError::RequestFailed(e.to_string())
        },
        ShopifyApiError::RestResponseError(_) | ShopifyApiError::JsonError(_) => {
            FetchError::InvalidResponse(e.to_string())
        },
    }
}

/// Shopify ids are numeric in REST payloads, but GraphQL-style global ids (`gid://shopify/Product/123`) also turn
/// up. Both forms map to the same external id.
pub fn external_id(id: &ShopifyId) -> ExternalId {
    match id {
        ShopifyId::Number(n) => ExternalId::from(*n),
        ShopifyId::Text(s) => {
            let s = s.trim();
            let id = if s.starts_with("gid://") { s.rsplit('/').next().unwrap_or(s) } else { s };
            ExternalId::from(id)
        },
    }
}

pub fn product_from_shopify(product: ShopifyProduct) -> ExternalProduct {
    let variant_prices = product
        .variants
        .unwrap_or_default()
        .into_iter()
        .map(|v| LooseNumber::from(v.price))
        .collect();
    ExternalProduct { id: external_id(&product.id), title: product.title, variant_prices }
}

pub fn customer_from_shopify(customer: ShopifyCustomer) -> ExternalCustomer {
    ExternalCustomer {
        id: external_id(&customer.id),
        email: customer.email,
        first_name: customer.first_name,
        last_name: customer.last_name,
        total_spent: LooseNumber::from(customer.total_spent),
    }
}

pub fn order_from_shopify(order: ShopifyOrder) -> ExternalOrder {
    let customer_id = order.customer.and_then(|c| c.id).map(|id| external_id(&id));
    let line_items = order.line_items.unwrap_or_default().into_iter().map(line_item_from_shopify).collect();
    ExternalOrder {
        id: external_id(&order.id),
        total_price: LooseNumber::from(order.total_price),
        customer_id,
        created_at: order.created_at,
        line_items,
    }
}

fn line_item_from_shopify(item: LineItem) -> ExternalLineItem {
    ExternalLineItem {
        product_id: item.product_id.map(|id| external_id(&id)),
        quantity: LooseNumber::from(item.quantity),
        price: LooseNumber::from(item.price),
    }
}
