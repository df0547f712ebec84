//! `SqliteDatabase` is a concrete implementation of a sync engine backend.
//!
//! Unsurprisingly, it uses SQLite as the backend and implements all the traits defined in the [`crate::traits`] module.
use std::fmt::Debug;

use chrono::{DateTime, Utc};
use log::*;
use sqlx::SqlitePool;

use super::db::{customers, db_url, insights, new_pool, order_items, orders, products, tenants};
use crate::{
    db_types::{
        Customer,
        ExternalId,
        NewCustomer,
        NewOrder,
        NewOrderItem,
        NewProduct,
        NewTenant,
        Order,
        OrderItem,
        Product,
        Tenant,
    },
    traits::{
        CommerceDatabase,
        CommerceDatabaseError,
        CommerceInsights,
        InsightSummary,
        InsightsError,
        ProductSales,
        TenantApiError,
        TenantManagement,
    },
};

#[derive(Clone)]
pub struct SqliteDatabase {
    url: String,
    pool: SqlitePool,
}

impl Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SqliteDatabase ({})", self.url)
    }
}

impl SqliteDatabase {
    /// Creates a new database API object, using the URL from the environment.
    pub async fn new(max_connections: u32) -> Result<Self, sqlx::Error> {
        let url = db_url();
        SqliteDatabase::new_with_url(url.as_str(), max_connections).await
    }

    pub async fn new_with_url(url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        trace!("🗃️ Creating new database connection pool with url {url}");
        let pool = new_pool(url, max_connections).await?;
        let url = url.to_string();
        Ok(Self { url, pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Brings the schema up to date. Migrations that have already been applied are skipped.
    pub async fn run_migrations(&self) -> Result<(), sqlx::Error> {
        sqlx::migrate!("./src/sqlite/migrations").run(&self.pool).await?;
        info!("🗃️ Database migrations complete for {}", self.url);
        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

impl TenantManagement for SqliteDatabase {
    async fn insert_tenant(&self, tenant: NewTenant) -> Result<Tenant, TenantApiError> {
        let mut tx = self.pool.begin().await?;
        let tenant = tenants::insert_tenant(tenant, &mut tx).await?;
        tx.commit().await?;
        Ok(tenant)
    }

    async fn fetch_tenant(&self, tenant_id: i64) -> Result<Option<Tenant>, TenantApiError> {
        let mut conn = self.pool.acquire().await?;
        let tenant = tenants::fetch_tenant(tenant_id, &mut conn).await?;
        Ok(tenant)
    }

    async fn fetch_tenant_by_shop_domain(&self, shop_domain: &str) -> Result<Option<Tenant>, TenantApiError> {
        let mut conn = self.pool.acquire().await?;
        let tenant = tenants::fetch_tenant_by_shop_domain(shop_domain, &mut conn).await?;
        Ok(tenant)
    }

    async fn fetch_tenant_by_email(&self, email: &str) -> Result<Option<Tenant>, TenantApiError> {
        let mut conn = self.pool.acquire().await?;
        let tenant = tenants::fetch_tenant_by_email(email, &mut conn).await?;
        Ok(tenant)
    }

    async fn fetch_tenants(&self) -> Result<Vec<Tenant>, TenantApiError> {
        let mut conn = self.pool.acquire().await?;
        let tenants = tenants::fetch_tenants(&mut conn).await?;
        Ok(tenants)
    }
}

impl CommerceDatabase for SqliteDatabase {
    fn url(&self) -> &str {
        self.url.as_str()
    }

    async fn upsert_product(&self, tenant_id: i64, product: NewProduct) -> Result<Product, CommerceDatabaseError> {
        let mut tx = self.pool.begin().await?;
        let product = products::upsert_product(tenant_id, product, &mut tx).await?;
        tx.commit().await?;
        Ok(product)
    }

    async fn fetch_product_by_external_id(
        &self,
        tenant_id: i64,
        shopify_id: &ExternalId,
    ) -> Result<Option<Product>, CommerceDatabaseError> {
        let mut conn = self.pool.acquire().await?;
        let product = products::fetch_product_by_external_id(tenant_id, shopify_id, &mut conn).await?;
        Ok(product)
    }

    async fn fetch_products_by_external_ids(
        &self,
        tenant_id: i64,
        shopify_ids: &[ExternalId],
    ) -> Result<Vec<Product>, CommerceDatabaseError> {
        let mut conn = self.pool.acquire().await?;
        let products = products::fetch_products_by_external_ids(tenant_id, shopify_ids, &mut conn).await?;
        Ok(products)
    }

    async fn upsert_customer(&self, tenant_id: i64, customer: NewCustomer) -> Result<Customer, CommerceDatabaseError> {
        let mut tx = self.pool.begin().await?;
        let customer = customers::upsert_customer(tenant_id, customer, &mut tx).await?;
        tx.commit().await?;
        Ok(customer)
    }

    async fn fetch_customer_by_external_id(
        &self,
        tenant_id: i64,
        shopify_id: &ExternalId,
    ) -> Result<Option<Customer>, CommerceDatabaseError> {
        let mut conn = self.pool.acquire().await?;
        let customer = customers::fetch_customer_by_external_id(tenant_id, shopify_id, &mut conn).await?;
        Ok(customer)
    }

    async fn upsert_order(&self, tenant_id: i64, order: NewOrder) -> Result<Order, CommerceDatabaseError> {
        let mut tx = self.pool.begin().await?;
        let order = orders::upsert_order(tenant_id, order, &mut tx).await?;
        tx.commit().await?;
        Ok(order)
    }

    async fn fetch_order_by_external_id(
        &self,
        tenant_id: i64,
        shopify_id: &ExternalId,
    ) -> Result<Option<Order>, CommerceDatabaseError> {
        let mut conn = self.pool.acquire().await?;
        let order = orders::fetch_order_by_external_id(tenant_id, shopify_id, &mut conn).await?;
        Ok(order)
    }

    async fn upsert_order_item(&self, item: NewOrderItem) -> Result<OrderItem, CommerceDatabaseError> {
        let mut tx = self.pool.begin().await?;
        let item = order_items::upsert_order_item(item, &mut tx).await?;
        tx.commit().await?;
        Ok(item)
    }

    async fn fetch_order_items(&self, order_id: i64) -> Result<Vec<OrderItem>, CommerceDatabaseError> {
        let mut conn = self.pool.acquire().await?;
        let items = order_items::fetch_order_items(order_id, &mut conn).await?;
        Ok(items)
    }
}

impl CommerceInsights for SqliteDatabase {
    async fn fetch_summary(&self, tenant_id: i64) -> Result<InsightSummary, InsightsError> {
        let mut conn = self.pool.acquire().await?;
        let summary = insights::fetch_summary(tenant_id, &mut conn).await?;
        Ok(summary)
    }

    async fn fetch_orders_between(
        &self,
        tenant_id: i64,
        since: Option<DateTime<Utc>>,
        until: Option<DateTime<Utc>>,
    ) -> Result<Vec<Order>, InsightsError> {
        let mut conn = self.pool.acquire().await?;
        let orders = insights::fetch_orders_between(tenant_id, since, until, &mut conn).await?;
        Ok(orders)
    }

    async fn fetch_top_customers(&self, tenant_id: i64, limit: i64) -> Result<Vec<Customer>, InsightsError> {
        let mut conn = self.pool.acquire().await?;
        let customers = insights::fetch_top_customers(tenant_id, limit, &mut conn).await?;
        Ok(customers)
    }

    async fn fetch_top_products(&self, tenant_id: i64, limit: i64) -> Result<Vec<ProductSales>, InsightsError> {
        let mut conn = self.pool.acquire().await?;
        let products = insights::fetch_top_products(tenant_id, limit, &mut conn).await?;
        Ok(products)
    }
}
