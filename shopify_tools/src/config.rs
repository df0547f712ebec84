use shopsync_common::Secret;

pub const DEFAULT_API_VERSION: &str = "2024-04";
/// Shopify refuses `limit` values above 250 on its REST list endpoints.
pub const MAX_PAGE_SIZE: u32 = 250;

/// Connection details for one shop.
#[derive(Debug, Clone)]
pub struct ShopifyConfig {
    pub shop: String,
    pub admin_access_token: Secret<String>,
    pub api_version: String,
    pub page_size: u32,
}

impl ShopifyConfig {
    pub fn new<S: Into<String>>(shop: S, admin_access_token: Secret<String>) -> Self {
        Self {
            shop: shop.into(),
            admin_access_token,
            api_version: DEFAULT_API_VERSION.to_string(),
            page_size: MAX_PAGE_SIZE,
        }
    }

    pub fn with_api_version<S: Into<String>>(mut self, api_version: S) -> Self {
        self.api_version = api_version.into();
        self
    }

    /// Sets the number of records requested per page. The value is clamped to `1..=250`.
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.clamp(1, MAX_PAGE_SIZE);
        self
    }
}
