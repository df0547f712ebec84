use sqlx::{QueryBuilder, Sqlite, SqliteConnection};

use crate::db_types::{ExternalId, NewProduct, Product};

/// Inserts the product, or overwrites the title and price of the existing row with the same external id.
pub async fn upsert_product(
    tenant_id: i64,
    product: NewProduct,
    conn: &mut SqliteConnection,
) -> Result<Product, sqlx::Error> {
    sqlx::query_as(
        r#"
            INSERT INTO products (tenant_id, shopify_id, title, price)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (tenant_id, shopify_id) DO UPDATE SET
                title = excluded.title,
                price = excluded.price,
                updated_at = CURRENT_TIMESTAMP
            RETURNING *;
        "#,
    )
    .bind(tenant_id)
    .bind(product.shopify_id)
    .bind(product.title)
    .bind(product.price)
    .fetch_one(conn)
    .await
}

pub async fn fetch_product_by_external_id(
    tenant_id: i64,
    shopify_id: &ExternalId,
    conn: &mut SqliteConnection,
) -> Result<Option<Product>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM products WHERE tenant_id = $1 AND shopify_id = $2")
        .bind(tenant_id)
        .bind(shopify_id.as_str())
        .fetch_optional(conn)
        .await
}

pub async fn fetch_products_by_external_ids(
    tenant_id: i64,
    shopify_ids: &[ExternalId],
    conn: &mut SqliteConnection,
) -> Result<Vec<Product>, sqlx::Error> {
    if shopify_ids.is_empty() {
        return Ok(vec![]);
    }
    let mut builder = QueryBuilder::<Sqlite>::new("SELECT * FROM products WHERE tenant_id = ");
    builder.push_bind(tenant_id);
    builder.push(" AND shopify_id IN (");
    let mut ids = builder.separated(", ");
    for id in shopify_ids {
        ids.push_bind(id.as_str());
    }
    ids.push_unseparated(") ORDER BY id");
    builder.build_query_as::<Product>().fetch_all(conn).await
}
