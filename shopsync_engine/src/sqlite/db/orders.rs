use chrono::Utc;
use sqlx::SqliteConnection;

use crate::db_types::{ExternalId, NewOrder, Order};

/// Inserts the order, or updates the total and customer link of the existing row with the same external id.
///
/// A new order without an upstream timestamp is stamped with the current time. An existing order only has its
/// `created_at` replaced when the update carries one.
pub async fn upsert_order(tenant_id: i64, order: NewOrder, conn: &mut SqliteConnection) -> Result<Order, sqlx::Error> {
    let created_at = order.created_at.unwrap_or_else(Utc::now);
    sqlx::query_as(
        r#"
            INSERT INTO orders (tenant_id, shopify_id, total_price, customer_id, created_at)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (tenant_id, shopify_id) DO UPDATE SET
                total_price = excluded.total_price,
                customer_id = excluded.customer_id,
                created_at = COALESCE($6, orders.created_at),
                updated_at = CURRENT_TIMESTAMP
            RETURNING *;
        "#,
    )
    .bind(tenant_id)
    .bind(order.shopify_id)
    .bind(order.total_price)
    .bind(order.customer_id)
    .bind(created_at)
    .bind(order.created_at)
    .fetch_one(conn)
    .await
}

pub async fn fetch_order_by_external_id(
    tenant_id: i64,
    shopify_id: &ExternalId,
    conn: &mut SqliteConnection,
) -> Result<Option<Order>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM orders WHERE tenant_id = $1 AND shopify_id = $2")
        .bind(tenant_id)
        .bind(shopify_id.as_str())
        .fetch_optional(conn)
        .await
}
