//! Raw upstream records, as handed to the reconciler.
//!
//! Upstream payloads are loosely typed: numbers arrive as JSON numbers, as decimal strings, as `null`, or not at all.
//! These types keep that looseness explicit ([`LooseNumber`]) so that coercion happens in exactly one place, on the way
//! into the local entity shape. Nothing untyped gets past the reconciler.
use chrono::{DateTime, Utc};
use serde_json::Value;
use shopsync_common::Money;

use crate::db_types::ExternalId;

//--------------------------------------     LooseNumber      ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Default)]
pub enum LooseNumber {
    Number(f64),
    Text(String),
    #[default]
    Missing,
}

impl LooseNumber {
    /// Coerces the value into a currency amount. Anything unparsable or absent is zero.
    pub fn to_money(&self) -> Money {
        match self {
            LooseNumber::Number(n) => Money::try_from(*n).unwrap_or_default(),
            LooseNumber::Text(s) => s.parse::<Money>().unwrap_or_default(),
            LooseNumber::Missing => Money::default(),
        }
    }

    /// Coerces the value into a whole quantity, truncating any fraction. Anything unparsable or absent is zero.
    pub fn to_quantity(&self) -> i64 {
        let value = match self {
            LooseNumber::Number(n) => *n,
            LooseNumber::Text(s) => s.trim().parse::<f64>().unwrap_or_default(),
            LooseNumber::Missing => 0.0,
        };
        if value.is_finite() {
            #[allow(clippy::cast_possible_truncation)]
            let q = value.trunc() as i64;
            q
        } else {
            0
        }
    }
}

impl From<f64> for LooseNumber {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i64> for LooseNumber {
    #[allow(clippy::cast_precision_loss)]
    fn from(value: i64) -> Self {
        Self::Number(value as f64)
    }
}

impl From<&str> for LooseNumber {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for LooseNumber {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Option<Value>> for LooseNumber {
    fn from(value: Option<Value>) -> Self {
        match value {
            Some(Value::Number(n)) => n.as_f64().map(Self::Number).unwrap_or_default(),
            Some(Value::String(s)) => Self::Text(s),
            _ => Self::Missing,
        }
    }
}

/// Parses an RFC 3339 timestamp, as used by Shopify (`2024-03-13T16:09:54-04:00`).
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value.trim()).ok().map(|d| d.with_timezone(&Utc))
}

//--------------------------------------   Raw records     ------------------------------------------------------------
#[derive(Debug, Clone, PartialEq)]
pub struct ExternalProduct {
    pub id: ExternalId,
    pub title: Option<String>,
    /// Variant prices in upstream order. The first variant's price is the product price.
    pub variant_prices: Vec<LooseNumber>,
}

impl ExternalProduct {
    pub fn new<I: Into<ExternalId>>(id: I) -> Self {
        Self { id: id.into(), title: None, variant_prices: vec![] }
    }

    pub fn with_title<S: Into<String>>(mut self, title: S) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_variant_price<P: Into<LooseNumber>>(mut self, price: P) -> Self {
        self.variant_prices.push(price.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExternalCustomer {
    pub id: ExternalId,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub total_spent: LooseNumber,
}

impl ExternalCustomer {
    pub fn new<I: Into<ExternalId>>(id: I) -> Self {
        Self { id: id.into(), email: None, first_name: None, last_name: None, total_spent: LooseNumber::Missing }
    }

    pub fn with_email<S: Into<String>>(mut self, email: S) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_name<S: Into<String>>(mut self, first_name: S, last_name: S) -> Self {
        self.first_name = Some(first_name.into());
        self.last_name = Some(last_name.into());
        self
    }

    pub fn with_total_spent<P: Into<LooseNumber>>(mut self, total_spent: P) -> Self {
        self.total_spent = total_spent.into();
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExternalOrder {
    pub id: ExternalId,
    pub total_price: LooseNumber,
    /// The upstream id of the customer who placed the order. `None` for guest checkouts.
    pub customer_id: Option<ExternalId>,
    pub created_at: Option<String>,
    pub line_items: Vec<ExternalLineItem>,
}

impl ExternalOrder {
    pub fn new<I: Into<ExternalId>>(id: I) -> Self {
        Self { id: id.into(), total_price: LooseNumber::Missing, customer_id: None, created_at: None, line_items: vec![] }
    }

    pub fn with_total_price<P: Into<LooseNumber>>(mut self, total_price: P) -> Self {
        self.total_price = total_price.into();
        self
    }

    pub fn with_customer<I: Into<ExternalId>>(mut self, customer_id: I) -> Self {
        self.customer_id = Some(customer_id.into());
        self
    }

    pub fn with_created_at<S: Into<String>>(mut self, created_at: S) -> Self {
        self.created_at = Some(created_at.into());
        self
    }

    pub fn with_line_item(mut self, item: ExternalLineItem) -> Self {
        self.line_items.push(item);
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExternalLineItem {
    /// `None` for custom line items that are not backed by a catalogue product.
    pub product_id: Option<ExternalId>,
    pub quantity: LooseNumber,
    pub price: LooseNumber,
}

impl ExternalLineItem {
    pub fn new<I: Into<ExternalId>, Q: Into<LooseNumber>, P: Into<LooseNumber>>(
        product_id: I,
        quantity: Q,
        price: P,
    ) -> Self {
        Self { product_id: Some(product_id.into()), quantity: quantity.into(), price: price.into() }
    }

    pub fn custom<Q: Into<LooseNumber>, P: Into<LooseNumber>>(quantity: Q, price: P) -> Self {
        Self { product_id: None, quantity: quantity.into(), price: price.into() }
    }
}
