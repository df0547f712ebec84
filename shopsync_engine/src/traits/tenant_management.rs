use thiserror::Error;

use crate::db_types::{NewTenant, Tenant};

#[derive(Debug, Clone, Error)]
pub enum TenantApiError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("A tenant with the same shop domain or email already exists. {0}")]
    AlreadyExists(String),
    #[error("The field '{0}' is required")]
    MissingField(&'static str),
}

impl From<sqlx::Error> for TenantApiError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::Database(db) if db.is_unique_violation() => TenantApiError::AlreadyExists(db.to_string()),
            e => TenantApiError::DatabaseError(e.to_string()),
        }
    }
}

/// The tenant registry. Tenants are the only rows that carry upstream credentials.
#[allow(async_fn_in_trait)]
pub trait TenantManagement {
    /// Stores a new tenant. Shop domain and email are unique, and a clash results in
    /// [`TenantApiError::AlreadyExists`].
    async fn insert_tenant(&self, tenant: NewTenant) -> Result<Tenant, TenantApiError>;

    async fn fetch_tenant(&self, tenant_id: i64) -> Result<Option<Tenant>, TenantApiError>;

    /// Resolves the tenant that owns the given shop. This is how inbound webhooks, which only carry the shop domain,
    /// are attributed.
    async fn fetch_tenant_by_shop_domain(&self, shop_domain: &str) -> Result<Option<Tenant>, TenantApiError>;

    async fn fetch_tenant_by_email(&self, email: &str) -> Result<Option<Tenant>, TenantApiError>;

    async fn fetch_tenants(&self) -> Result<Vec<Tenant>, TenantApiError>;
}
