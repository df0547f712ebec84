use sqlx::SqliteConnection;

use crate::db_types::{NewOrderItem, OrderItem};

pub async fn upsert_order_item(item: NewOrderItem, conn: &mut SqliteConnection) -> Result<OrderItem, sqlx::Error> {
    sqlx::query_as(
        r#"
            INSERT INTO order_items (order_id, product_id, quantity, price)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (order_id, product_id) DO UPDATE SET
                quantity = excluded.quantity,
                price = excluded.price
            RETURNING *;
        "#,
    )
    .bind(item.order_id)
    .bind(item.product_id)
    .bind(item.quantity)
    .bind(item.price)
    .fetch_one(conn)
    .await
}

pub async fn fetch_order_items(order_id: i64, conn: &mut SqliteConnection) -> Result<Vec<OrderItem>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM order_items WHERE order_id = $1 ORDER BY id").bind(order_id).fetch_all(conn).await
}
