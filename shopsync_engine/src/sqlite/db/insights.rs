//! Aggregate queries for the insights endpoints. Every query is filtered by tenant.
use chrono::{DateTime, Utc};
use sqlx::{QueryBuilder, Sqlite, SqliteConnection};

use crate::{
    db_types::{Customer, Order},
    traits::{InsightSummary, ProductSales},
};

pub async fn fetch_summary(tenant_id: i64, conn: &mut SqliteConnection) -> Result<InsightSummary, sqlx::Error> {
    sqlx::query_as(
        r#"
        SELECT
            (SELECT COUNT(*) FROM customers WHERE tenant_id = $1) AS total_customers,
            (SELECT COUNT(*) FROM orders WHERE tenant_id = $1) AS total_orders,
            (SELECT COALESCE(SUM(total_price), 0) FROM orders WHERE tenant_id = $1) AS total_revenue
        "#,
    )
    .bind(tenant_id)
    .fetch_one(conn)
    .await
}

pub async fn fetch_orders_between(
    tenant_id: i64,
    since: Option<DateTime<Utc>>,
    until: Option<DateTime<Utc>>,
    conn: &mut SqliteConnection,
) -> Result<Vec<Order>, sqlx::Error> {
    let mut builder = QueryBuilder::<Sqlite>::new("SELECT * FROM orders WHERE tenant_id = ");
    builder.push_bind(tenant_id);
    if let Some(since) = since {
        builder.push(" AND created_at >= ");
        builder.push_bind(since);
    }
    if let Some(until) = until {
        builder.push(" AND created_at <= ");
        builder.push_bind(until);
    }
    builder.push(" ORDER BY created_at ASC, id ASC");
    builder.build_query_as::<Order>().fetch_all(conn).await
}

pub async fn fetch_top_customers(
    tenant_id: i64,
    limit: i64,
    conn: &mut SqliteConnection,
) -> Result<Vec<Customer>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM customers WHERE tenant_id = $1 ORDER BY total_spent DESC, id ASC LIMIT $2")
        .bind(tenant_id)
        .bind(limit)
        .fetch_all(conn)
        .await
}

pub async fn fetch_top_products(
    tenant_id: i64,
    limit: i64,
    conn: &mut SqliteConnection,
) -> Result<Vec<ProductSales>, sqlx::Error> {
    sqlx::query_as(
        r#"
        SELECT
            products.id AS product_id,
            products.title AS title,
            COALESCE(SUM(order_items.price * order_items.quantity), 0) AS total_revenue,
            COALESCE(SUM(order_items.quantity), 0) AS total_quantity
        FROM products
        JOIN order_items ON order_items.product_id = products.id
        WHERE products.tenant_id = $1
        GROUP BY products.id, products.title
        ORDER BY total_revenue DESC, products.id ASC
        LIMIT $2
        "#,
    )
    .bind(tenant_id)
    .bind(limit)
    .fetch_all(conn)
    .await
}
