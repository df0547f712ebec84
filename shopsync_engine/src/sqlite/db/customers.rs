use sqlx::SqliteConnection;

use crate::db_types::{Customer, ExternalId, NewCustomer};

/// Inserts the customer, or overwrites the details of the existing row with the same external id. Absent contact
/// fields are written as `NULL`: the latest upstream record is authoritative.
pub async fn upsert_customer(
    tenant_id: i64,
    customer: NewCustomer,
    conn: &mut SqliteConnection,
) -> Result<Customer, sqlx::Error> {
    sqlx::query_as(
        r#"
            INSERT INTO customers (tenant_id, shopify_id, email, first_name, last_name, total_spent)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (tenant_id, shopify_id) DO UPDATE SET
                email = excluded.email,
                first_name = excluded.first_name,
                last_name = excluded.last_name,
                total_spent = excluded.total_spent,
                updated_at = CURRENT_TIMESTAMP
            RETURNING *;
        "#,
    )
    .bind(tenant_id)
    .bind(customer.shopify_id)
    .bind(customer.email)
    .bind(customer.first_name)
    .bind(customer.last_name)
    .bind(customer.total_spent)
    .fetch_one(conn)
    .await
}

pub async fn fetch_customer_by_external_id(
    tenant_id: i64,
    shopify_id: &ExternalId,
    conn: &mut SqliteConnection,
) -> Result<Option<Customer>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM customers WHERE tenant_id = $1 AND shopify_id = $2")
        .bind(tenant_id)
        .bind(shopify_id.as_str())
        .fetch_optional(conn)
        .await
}
