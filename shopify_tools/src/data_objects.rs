use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

/// Shopify resource ids are numeric in REST payloads, but some webhook and app-proxy payloads send them as strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ShopifyId {
    Number(i64),
    Text(String),
}

impl Display for ShopifyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShopifyId::Number(n) => write!(f, "{n}"),
            ShopifyId::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for ShopifyId {
    fn from(value: i64) -> Self {
        Self::Number(value)
    }
}

/// One page of a REST list endpoint.
///
/// `next_page_info` is the cursor taken from the `Link: <..>; rel="next"` response header. `None` means this was the
/// last page.
#[derive(Debug, Clone)]
pub struct ShopifyPage<T> {
    pub items: Vec<T>,
    pub next_page_info: Option<String>,
}
