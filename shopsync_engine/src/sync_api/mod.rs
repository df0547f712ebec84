//! # Shop Sync engine public API
//!
//! The `sync_api` module exposes the programmatic API of the sync engine. Like the backend traits, the API is
//! modular, so that callers pick only what they need:
//!
//! * [`bulk_sync_api`] pulls whole collections from the upstream platform and reconciles them, one kind at a time or
//!   all kinds in dependency order.
//! * [`webhook_api`] reconciles single resources pushed by the upstream platform.
//! * [`tenant_api`] registers and looks up tenants.
//! * [`insights_api`] provides read-only aggregates over a tenant's data.
//! * [`reconciler`] holds the merge rules shared by the bulk and webhook paths.
//!
//! # API usage
//!
//! Every API instance is created by handing it a backend that implements the traits the API needs:
//!
//! ```rust,ignore
//! use shopsync_engine::{BulkSyncApi, SqliteDatabase};
//! let db = SqliteDatabase::new_with_url(...).await?;
//! // `fetcher` implements ResourceFetcher, e.g. a Shopify REST client factory
//! let api = BulkSyncApi::new(db, fetcher);
//! let counts = api.sync_all(tenant_id).await?;
//! ```
pub mod bulk_sync_api;
pub mod errors;
pub mod insights_api;
pub mod reconciler;
pub mod sync_objects;
pub mod sync_report;
pub mod tenant_api;
pub mod webhook_api;
