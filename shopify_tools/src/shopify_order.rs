use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::ShopifyId;

/// An order as it appears in `GET /orders.json` and in `orders/create` webhooks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShopifyOrder {
    pub id: ShopifyId,
    pub name: Option<String>,
    pub email: Option<String>,
    pub currency: Option<String>,
    pub total_price: Option<Value>,
    pub financial_status: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub customer: Option<OrderCustomer>,
    pub line_items: Option<Vec<LineItem>>,
}

/// The customer stub embedded in an order. Shopify includes most of the customer record, but only the id is needed
/// to link the order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderCustomer {
    pub id: Option<ShopifyId>,
    pub email: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineItem {
    pub id: Option<ShopifyId>,
    /// `null` for custom line items that do not refer to a catalogue product.
    pub product_id: Option<ShopifyId>,
    pub variant_id: Option<ShopifyId>,
    pub title: Option<String>,
    pub quantity: Option<Value>,
    pub price: Option<Value>,
}
