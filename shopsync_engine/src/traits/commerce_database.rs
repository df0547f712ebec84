use thiserror::Error;

use crate::{
    db_types::{
        Customer,
        ExternalId,
        NewCustomer,
        NewOrder,
        NewOrderItem,
        NewProduct,
        Order,
        OrderItem,
        Product,
    },
    traits::{TenantApiError, TenantManagement},
};

#[derive(Debug, Clone, Error)]
pub enum CommerceDatabaseError {
    #[error("We have an internal database engine (configuration/uptime etc.) : {0}")]
    DatabaseError(String),
    #[error("{0}")]
    TenantError(#[from] TenantApiError),
}

impl From<sqlx::Error> for CommerceDatabaseError {
    fn from(e: sqlx::Error) -> Self {
        CommerceDatabaseError::DatabaseError(e.to_string())
    }
}

/// This trait defines the persistence behaviour the reconciler relies on.
///
/// Every operation is scoped to a tenant, and no implementation may return rows belonging to another tenant.
///
/// The `upsert_*` methods MUST be atomic with respect to their unique key: `(tenant_id, shopify_id)` for products,
/// customers and orders, and `(order_id, product_id)` for order items. Two concurrent upserts of the same key must
/// leave exactly one row behind, holding the values of whichever call completed last.
#[allow(async_fn_in_trait)]
pub trait CommerceDatabase: Clone + TenantManagement {
    /// The URL of the database
    fn url(&self) -> &str;

    /// Creates the product, or updates its title and price if it already exists for this tenant.
    async fn upsert_product(&self, tenant_id: i64, product: NewProduct) -> Result<Product, CommerceDatabaseError>;

    async fn fetch_product_by_external_id(
        &self,
        tenant_id: i64,
        shopify_id: &ExternalId,
    ) -> Result<Option<Product>, CommerceDatabaseError>;

    /// Fetches every product of the tenant whose external id is in `shopify_ids`, in a single query. Unknown ids are
    /// ignored.
    async fn fetch_products_by_external_ids(
        &self,
        tenant_id: i64,
        shopify_ids: &[ExternalId],
    ) -> Result<Vec<Product>, CommerceDatabaseError>;

    /// Creates the customer, or overwrites its contact details and total spent if it already exists for this tenant.
    async fn upsert_customer(&self, tenant_id: i64, customer: NewCustomer)
        -> Result<Customer, CommerceDatabaseError>;

    async fn fetch_customer_by_external_id(
        &self,
        tenant_id: i64,
        shopify_id: &ExternalId,
    ) -> Result<Option<Customer>, CommerceDatabaseError>;

    /// Creates the order, or updates its total and customer link if it already exists for this tenant. The creation
    /// timestamp is only replaced when `order.created_at` is provided.
    async fn upsert_order(&self, tenant_id: i64, order: NewOrder) -> Result<Order, CommerceDatabaseError>;

    async fn fetch_order_by_external_id(
        &self,
        tenant_id: i64,
        shopify_id: &ExternalId,
    ) -> Result<Option<Order>, CommerceDatabaseError>;

    /// Creates the line item, or overwrites its quantity and price if the order already has an item for this product.
    async fn upsert_order_item(&self, item: NewOrderItem) -> Result<OrderItem, CommerceDatabaseError>;

    async fn fetch_order_items(&self, order_id: i64) -> Result<Vec<OrderItem>, CommerceDatabaseError>;
}
