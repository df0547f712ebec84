use chrono::{DateTime, Utc};
use mockall::mock;
use shopsync_engine::{
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
    sync_objects::{ExternalCustomer, ExternalOrder, ExternalProduct},
    traits::{InsightSummary, ProductSales},
    CommerceDatabase,
    CommerceDatabaseError,
    CommerceInsights,
    FetchError,
    InsightsError,
    Page,
    ResourceFetcher,
    TenantApiError,
    TenantManagement,
};

mock! {
    pub CommerceDb {}
    impl Clone for CommerceDb {
        fn clone(&self) -> Self;
    }
    impl TenantManagement for CommerceDb {
        async fn insert_tenant(&self, tenant: NewTenant) -> Result<Tenant, TenantApiError>;
        async fn fetch_tenant(&self, tenant_id: i64) -> Result<Option<Tenant>, TenantApiError>;
        async fn fetch_tenant_by_shop_domain(&self, shop_domain: &str) -> Result<Option<Tenant>, TenantApiError>;
        async fn fetch_tenant_by_email(&self, email: &str) -> Result<Option<Tenant>, TenantApiError>;
        async fn fetch_tenants(&self) -> Result<Vec<Tenant>, TenantApiError>;
    }
    impl CommerceDatabase for CommerceDb {
        fn url(&self) -> &str;
        async fn upsert_product(&self, tenant_id: i64, product: NewProduct) -> Result<Product, CommerceDatabaseError>;
        async fn fetch_product_by_external_id(&self, tenant_id: i64, shopify_id: &ExternalId) -> Result<Option<Product>, CommerceDatabaseError>;
        async fn fetch_products_by_external_ids(&self, tenant_id: i64, shopify_ids: &[ExternalId]) -> Result<Vec<Product>, CommerceDatabaseError>;
        async fn upsert_customer(&self, tenant_id: i64, customer: NewCustomer) -> Result<Customer, CommerceDatabaseError>;
        async fn fetch_customer_by_external_id(&self, tenant_id: i64, shopify_id: &ExternalId) -> Result<Option<Customer>, CommerceDatabaseError>;
        async fn upsert_order(&self, tenant_id: i64, order: NewOrder) -> Result<Order, CommerceDatabaseError>;
        async fn fetch_order_by_external_id(&self, tenant_id: i64, shopify_id: &ExternalId) -> Result<Option<Order>, CommerceDatabaseError>;
        async fn upsert_order_item(&self, item: NewOrderItem) -> Result<OrderItem, CommerceDatabaseError>;
        async fn fetch_order_items(&self, order_id: i64) -> Result<Vec<OrderItem>, CommerceDatabaseError>;
    }
}

mock! {
    pub Fetcher {}
    impl ResourceFetcher for Fetcher {
        async fn fetch_products(&self, tenant: &Tenant, cursor: Option<String>) -> Result<Page<ExternalProduct>, FetchError>;
        async fn fetch_customers(&self, tenant: &Tenant, cursor: Option<String>) -> Result<Page<ExternalCustomer>, FetchError>;
        async fn fetch_orders(&self, tenant: &Tenant, cursor: Option<String>) -> Result<Page<ExternalOrder>, FetchError>;
    }
}

mock! {
    pub Insights {}
    impl CommerceInsights for Insights {
        async fn fetch_summary(&self, tenant_id: i64) -> Result<InsightSummary, InsightsError>;
        async fn fetch_orders_between(&self, tenant_id: i64, since: Option<DateTime<Utc>>, until: Option<DateTime<Utc>>) -> Result<Vec<Order>, InsightsError>;
        async fn fetch_top_customers(&self, tenant_id: i64, limit: i64) -> Result<Vec<Customer>, InsightsError>;
        async fn fetch_top_products(&self, tenant_id: i64, limit: i64) -> Result<Vec<ProductSales>, InsightsError>;
    }
}
