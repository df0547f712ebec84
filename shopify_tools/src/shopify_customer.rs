use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::ShopifyId;

/// A customer as it appears in `GET /customers.json` and in `customers/update` webhooks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShopifyCustomer {
    pub id: ShopifyId,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub orders_count: Option<Value>,
    pub total_spent: Option<Value>,
    pub currency: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}
