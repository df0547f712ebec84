//! A thin client for the parts of the Shopify Admin REST API that Shop Sync pulls from.
//!
//! Every [`ShopifyApi`] instance is bound to a single shop, so a multi-tenant caller builds one client per tenant from
//! that tenant's credentials.
mod api;
mod config;
mod error;
pub mod helpers;
mod shopify_customer;
mod shopify_order;
mod shopify_product;

pub mod data_objects;

pub use api::ShopifyApi;
pub use config::{ShopifyConfig, DEFAULT_API_VERSION, MAX_PAGE_SIZE};
pub use data_objects::{ShopifyId, ShopifyPage};
pub use error::ShopifyApiError;
pub use shopify_customer::ShopifyCustomer;
pub use shopify_order::{LineItem, OrderCustomer, ShopifyOrder};
pub use shopify_product::{ShopifyProduct, Variant};
