use std::fmt::Debug;

use chrono::{DateTime, Utc};
use log::*;
use serde::{Deserialize, Serialize};

use crate::{
    db_types::{NewTenant, Tenant},
    traits::{TenantApiError, TenantManagement},
};

/// The public view of a tenant. Credentials are never part of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenantSummary {
    pub id: i64,
    pub name: String,
    pub shop_domain: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl From<Tenant> for TenantSummary {
    fn from(tenant: Tenant) -> Self {
        Self {
            id: tenant.id,
            name: tenant.name,
            shop_domain: tenant.shop_domain,
            email: tenant.email,
            created_at: tenant.created_at,
        }
    }
}

/// Shop domains are compared case-insensitively, without surrounding whitespace or a URL scheme.
pub fn normalize_shop_domain(domain: &str) -> String {
    let domain = domain.trim();
    let domain = domain.strip_prefix("https://").or_else(|| domain.strip_prefix("http://")).unwrap_or(domain);
    domain.trim_end_matches('/').to_ascii_lowercase()
}

pub struct TenantApi<B> {
    db: B,
}

impl<B: Debug> Debug for TenantApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TenantApi ({:?})", self.db)
    }
}

impl<B> TenantApi<B>
where B: TenantManagement
{
    pub fn new(db: B) -> Self {
        Self { db }
    }

    /// Registers a new tenant. Every field is required.
    pub async fn create_tenant(&self, mut tenant: NewTenant) -> Result<TenantSummary, TenantApiError> {
        if let Some(field) = tenant.missing_field() {
            return Err(TenantApiError::MissingField(field));
        }
        tenant.shop_domain = normalize_shop_domain(&tenant.shop_domain);
        tenant.email = tenant.email.trim().to_string();
        tenant.name = tenant.name.trim().to_string();
        let tenant = self.db.insert_tenant(tenant).await?;
        info!("🏪️ Tenant #{} registered for {}", tenant.id, tenant.shop_domain);
        Ok(tenant.into())
    }

    pub async fn tenant(&self, tenant_id: i64) -> Result<Option<Tenant>, TenantApiError> {
        self.db.fetch_tenant(tenant_id).await
    }

    pub async fn tenant_by_shop_domain(&self, shop_domain: &str) -> Result<Option<Tenant>, TenantApiError> {
        self.db.fetch_tenant_by_shop_domain(&normalize_shop_domain(shop_domain)).await
    }

    pub async fn tenant_by_email(&self, email: &str) -> Result<Option<Tenant>, TenantApiError> {
        self.db.fetch_tenant_by_email(email.trim()).await
    }

    pub async fn list_tenants(&self) -> Result<Vec<TenantSummary>, TenantApiError> {
        let tenants = self.db.fetch_tenants().await?;
        Ok(tenants.into_iter().map(TenantSummary::from).collect())
    }
}
