use serde::{Deserialize, Serialize};
use shopsync_common::Money;
use sqlx::FromRow;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct InsightSummary {
    pub total_customers: i64,
    pub total_orders: i64,
    pub total_revenue: Money,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct ProductSales {
    pub product_id: i64,
    pub title: String,
    /// Sum of `price * quantity` over every line item for this product.
    pub total_revenue: Money,
    pub total_quantity: i64,
}
