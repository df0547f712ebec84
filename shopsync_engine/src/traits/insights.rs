use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::{
    db_types::{Customer, Order},
    traits::data_objects::{InsightSummary, ProductSales},
};

#[derive(Debug, Clone, Error)]
pub enum InsightsError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("Invalid query. {0}")]
    QueryError(String),
}

impl From<sqlx::Error> for InsightsError {
    fn from(e: sqlx::Error) -> Self {
        InsightsError::DatabaseError(e.to_string())
    }
}

/// Read-only aggregate queries over one tenant's data.
#[allow(async_fn_in_trait)]
pub trait CommerceInsights {
    async fn fetch_summary(&self, tenant_id: i64) -> Result<InsightSummary, InsightsError>;

    /// Orders created in the (inclusive) window, oldest first. Either bound may be omitted.
    async fn fetch_orders_between(
        &self,
        tenant_id: i64,
        since: Option<DateTime<Utc>>,
        until: Option<DateTime<Utc>>,
    ) -> Result<Vec<Order>, InsightsError>;

    /// Customers ordered by total spent, highest first.
    async fn fetch_top_customers(&self, tenant_id: i64, limit: i64) -> Result<Vec<Customer>, InsightsError>;

    /// Products ordered by line-item revenue, highest first.
    async fn fetch_top_products(&self, tenant_id: i64, limit: i64) -> Result<Vec<ProductSales>, InsightsError>;
}
