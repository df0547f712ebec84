//! Read-side aggregates for one tenant. These are plain queries over reconciled data and never write.
use std::{collections::BTreeMap, fmt::Debug};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use shopsync_common::Money;

use crate::{
    db_types::Customer,
    traits::{CommerceInsights, InsightSummary, InsightsError, ProductSales},
};

pub const DEFAULT_TOP_N: i64 = 5;
const MAX_TOP_N: i64 = 100;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyOrders {
    pub total_orders: i64,
    pub total_revenue: Money,
}

/// Order count and revenue per UTC calendar day, keyed by date in ascending order.
pub type OrdersTrend = BTreeMap<NaiveDate, DailyOrders>;

pub struct InsightsApi<B> {
    db: B,
}

impl<B: Debug> Debug for InsightsApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "InsightsApi ({:?})", self.db)
    }
}

impl<B> InsightsApi<B>
where B: CommerceInsights
{
    pub fn new(db: B) -> Self {
        Self { db }
    }

    pub async fn summary(&self, tenant_id: i64) -> Result<InsightSummary, InsightsError> {
        self.db.fetch_summary(tenant_id).await
    }

    pub async fn orders_trend(
        &self,
        tenant_id: i64,
        since: Option<DateTime<Utc>>,
        until: Option<DateTime<Utc>>,
    ) -> Result<OrdersTrend, InsightsError> {
        if let (Some(s), Some(u)) = (since, until) {
            if s > u {
                return Err(InsightsError::QueryError(format!("The start of the range ({s}) is after its end ({u})")));
            }
        }
        let orders = self.db.fetch_orders_between(tenant_id, since, until).await?;
        let mut trend = OrdersTrend::new();
        for order in orders {
            let day = trend.entry(order.created_at.date_naive()).or_default();
            day.total_orders += 1;
            day.total_revenue += order.total_price;
        }
        Ok(trend)
    }

    pub async fn top_customers(&self, tenant_id: i64, limit: Option<i64>) -> Result<Vec<Customer>, InsightsError> {
        self.db.fetch_top_customers(tenant_id, clamp_limit(limit)).await
    }

    pub async fn top_products(&self, tenant_id: i64, limit: Option<i64>) -> Result<Vec<ProductSales>, InsightsError> {
        self.db.fetch_top_products(tenant_id, clamp_limit(limit)).await
    }
}

fn clamp_limit(limit: Option<i64>) -> i64 {
    limit.unwrap_or(DEFAULT_TOP_N).clamp(1, MAX_TOP_N)
}
