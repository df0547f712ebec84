use log::debug;
use sqlx::SqliteConnection;

use crate::{
    db_types::{NewTenant, Tenant},
    traits::TenantApiError,
};

pub async fn insert_tenant(tenant: NewTenant, conn: &mut SqliteConnection) -> Result<Tenant, TenantApiError> {
    let tenant: Tenant = sqlx::query_as(
        r#"
            INSERT INTO tenants (name, shop_domain, email, api_key, api_secret, access_token)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *;
        "#,
    )
    .bind(tenant.name)
    .bind(tenant.shop_domain)
    .bind(tenant.email)
    .bind(tenant.api_key)
    .bind(tenant.api_secret.reveal().clone())
    .bind(tenant.access_token.reveal().clone())
    .fetch_one(conn)
    .await?;
    debug!("🗃️ Tenant #{} inserted for {}", tenant.id, tenant.shop_domain);
    Ok(tenant)
}

pub async fn fetch_tenant(tenant_id: i64, conn: &mut SqliteConnection) -> Result<Option<Tenant>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM tenants WHERE id = $1").bind(tenant_id).fetch_optional(conn).await
}

pub async fn fetch_tenant_by_shop_domain(
    shop_domain: &str,
    conn: &mut SqliteConnection,
) -> Result<Option<Tenant>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM tenants WHERE shop_domain = $1").bind(shop_domain).fetch_optional(conn).await
}

pub async fn fetch_tenant_by_email(email: &str, conn: &mut SqliteConnection) -> Result<Option<Tenant>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM tenants WHERE email = $1").bind(email).fetch_optional(conn).await
}

pub async fn fetch_tenants(conn: &mut SqliteConnection) -> Result<Vec<Tenant>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM tenants ORDER BY id").fetch_all(conn).await
}
