//! Rows stored by the engine, and the field sets used to upsert them.
//!
//! Every commerce entity carries the id the upstream platform assigned to it ([`ExternalId`]). The pair
//! `(tenant_id, shopify_id)` is unique for products, customers and orders, which is what makes every reconciliation an
//! idempotent upsert.
use std::fmt::Display;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shopsync_common::{Money, Secret};
use sqlx::{FromRow, Type};

//--------------------------------------     ExternalId       ---------------------------------------------------------
/// The canonical string form of an upstream resource id. Numeric ids are stored as their decimal digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Type, Serialize, Deserialize)]
#[sqlx(transparent)]
pub struct ExternalId(pub String);

impl ExternalId {
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for ExternalId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for ExternalId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for ExternalId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<i64> for ExternalId {
    fn from(value: i64) -> Self {
        Self(value.to_string())
    }
}

//--------------------------------------       Tenant         ---------------------------------------------------------
#[derive(Debug, Clone, FromRow)]
pub struct Tenant {
    pub id: i64,
    pub name: String,
    pub shop_domain: String,
    pub email: String,
    pub api_key: String,
    #[sqlx(try_from = "String")]
    pub api_secret: Secret<String>,
    #[sqlx(try_from = "String")]
    pub access_token: Secret<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct NewTenant {
    pub name: String,
    pub shop_domain: String,
    pub email: String,
    pub api_key: String,
    pub api_secret: Secret<String>,
    pub access_token: Secret<String>,
}

impl NewTenant {
    /// Returns the name of the first required field that is blank, if any.
    pub fn missing_field(&self) -> Option<&'static str> {
        [
            ("name", self.name.as_str()),
            ("shop_domain", self.shop_domain.as_str()),
            ("access_token", self.access_token.reveal().as_str()),
            ("email", self.email.as_str()),
            ("api_key", self.api_key.as_str()),
            ("api_secret", self.api_secret.reveal().as_str()),
        ]
        .into_iter()
        .find(|(_, v)| v.trim().is_empty())
        .map(|(k, _)| k)
    }
}

//--------------------------------------       Product        ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub tenant_id: i64,
    pub shopify_id: ExternalId,
    pub title: String,
    pub price: Money,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProduct {
    pub shopify_id: ExternalId,
    pub title: String,
    pub price: Money,
}

//--------------------------------------       Customer       ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Customer {
    pub id: i64,
    pub tenant_id: i64,
    pub shopify_id: ExternalId,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub total_spent: Money,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCustomer {
    pub shopify_id: ExternalId,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub total_spent: Money,
}

//--------------------------------------        Order         ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Order {
    pub id: i64,
    pub tenant_id: i64,
    pub shopify_id: ExternalId,
    pub total_price: Money,
    /// The local id of the customer that placed the order, if that customer was known when the order was reconciled.
    pub customer_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    pub shopify_id: ExternalId,
    pub total_price: Money,
    pub customer_id: Option<i64>,
    /// When the upstream platform says the order was placed. If `None`, a new order is stamped with the current time
    /// and an existing order keeps its timestamp.
    pub created_at: Option<DateTime<Utc>>,
}

//--------------------------------------      OrderItem       ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct OrderItem {
    pub id: i64,
    pub order_id: i64,
    pub product_id: i64,
    pub quantity: i64,
    pub price: Money,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrderItem {
    pub order_id: i64,
    pub product_id: i64,
    pub quantity: i64,
    pub price: Money,
}
