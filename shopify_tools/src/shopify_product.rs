use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::ShopifyId;

/// A product as it appears in `GET /products.json` and in `products/update` webhooks.
///
/// Only `id` is required. Prices are left as raw JSON values, since Shopify sends them as decimal strings but
/// hand-built payloads frequently use bare numbers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShopifyProduct {
    pub id: ShopifyId,
    pub title: Option<String>,
    pub handle: Option<String>,
    pub status: Option<String>,
    pub vendor: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub variants: Option<Vec<Variant>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Variant {
    pub id: Option<ShopifyId>,
    pub product_id: Option<ShopifyId>,
    pub title: Option<String>,
    pub sku: Option<String>,
    pub price: Option<Value>,
}

impl ShopifyProduct {
    /// The price of the first variant, which is what the storefront shows as the product price.
    pub fn first_variant_price(&self) -> Option<&Value> {
        self.variants.as_ref().and_then(|v| v.first()).and_then(|v| v.price.as_ref())
    }
}
