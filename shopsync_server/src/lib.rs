//! # Shop Sync server
//! This crate hosts the HTTP server for Shop Sync. It is responsible for:
//! * Receiving Shopify webhooks, verifying their signatures, and handing the records to the sync engine.
//! * Triggering bulk pulls of a shop's products, customers and orders.
//! * Registering shops (tenants) and serving read-only insights over their data.
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more information.
//!
//! ## Routes
//! The server exposes the following routes:
//! * `/health`: A health check route that returns a 200 OK response.
//! * `/shopify/webhook/product_update`, `/shopify/webhook/order_create`, `/shopify/webhook/customer_update`: Shopify
//!   webhook receivers.
//! * `/api/ingest/{tenant_id}/{kind}`: Bulk sync trigger.
//! * `/api/tenant`: Tenant registration and listing.
//! * `/api/insight/{tenant_id}/...`: Summary, orders trend, top customers and top products.
pub mod cli;
pub mod config;
pub mod data_objects;
pub mod errors;

pub mod helpers;
pub mod integrations;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod shopify_routes;
