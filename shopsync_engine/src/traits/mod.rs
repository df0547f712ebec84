//! #  Backend contracts
//!
//! This module provides the interfaces that the sync engine needs from its collaborators. The engine never talks to
//! a database or to Shopify directly; it is handed something that implements these traits.
//!
//! ## Traits
//! * [`TenantManagement`] stores tenants and looks them up by id, shop domain or contact email.
//! * [`CommerceDatabase`] defines the tenant-scoped upsert and lookup operations for products, customers, orders and
//!   order items. Every unique key it relies on must be enforced atomically by the backend.
//! * [`CommerceInsights`] provides the read-side aggregate queries behind the dashboard.
//! * [`ResourceFetcher`] produces pages of raw upstream records for one tenant.
mod commerce_database;
mod insights;
mod resource_fetcher;
mod tenant_management;

mod data_objects;

pub use commerce_database::{CommerceDatabase, CommerceDatabaseError};
pub use data_objects::{InsightSummary, ProductSales};
pub use insights::{CommerceInsights, InsightsError};
pub use resource_fetcher::{FetchError, Page, ResourceFetcher};
pub use tenant_management::{TenantApiError, TenantManagement};
