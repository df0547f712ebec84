//! Shop Sync Engine
//!
//! The Shop Sync engine keeps a local, per-tenant copy of a merchant's commerce data (products, customers, orders
//! and order line items) in step with the upstream e-commerce platform. This library contains the core logic. It is
//! provider-agnostic: the upstream platform is only visible through the [`ResourceFetcher`] trait.
//!
//! Data reaches the engine along two independent paths:
//! 1. Bulk pulls ([`BulkSyncApi`]) walk whole resource collections page by page.
//! 2. Webhooks ([`WebhookApi`]) deliver one resource at a time, as it changes.
//!
//! Both paths go through the same [`sync_api::reconciler::Reconciler`], which upserts every record on its
//! `(tenant, external id)` key and resolves the links between orders, customers and products.
//!
//! The library is divided into two main sections:
//! 1. Database management ([`mod@traits`] and the SQLite backend). The traits describe what a backend must provide,
//!    and [`SqliteDatabase`] implements all of them.
//! 2. The public API ([`mod@sync_api`]), which callers use instead of touching the database directly. The data types
//!    shared by both are in [`db_types`].
pub mod db_types;
#[cfg(feature = "sqlite")]
mod sqlite;
pub mod sync_api;
pub mod traits;

#[cfg(any(feature = "test_utils", test))]
pub mod test_utils;

#[cfg(feature = "sqlite")]
pub use sqlite::{db::db_url, SqliteDatabase};
pub use sync_api::{
    bulk_sync_api::BulkSyncApi,
    errors::{StageFailure, SyncError, WebhookError},
    insights_api::InsightsApi,
    reconciler::{ReconciledOrder, Reconciler},
    sync_objects,
    sync_report::{SyncCounts, SyncReport, SyncStage, SyncTarget},
    tenant_api::{TenantApi, TenantSummary},
    webhook_api::WebhookApi,
};
pub use traits::{
    CommerceDatabase,
    CommerceDatabaseError,
    CommerceInsights,
    FetchError,
    InsightsError,
    Page,
    ResourceFetcher,
    TenantApiError,
    TenantManagement,
};
