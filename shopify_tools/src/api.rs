use std::sync::Arc;

use log::*;
use reqwest::{
    header::{HeaderMap, HeaderValue, LINK},
    Client,
    Method,
    Response,
};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::{
    config::ShopifyConfig,
    helpers::next_page_info,
    ShopifyApiError,
    ShopifyCustomer,
    ShopifyOrder,
    ShopifyPage,
    ShopifyProduct,
};

#[derive(Clone)]
pub struct ShopifyApi {
    config: ShopifyConfig,
    client: Arc<Client>,
}

impl ShopifyApi {
    pub fn new(config: ShopifyConfig) -> Result<Self, ShopifyApiError> {
        let mut headers = HeaderMap::with_capacity(2);
        let val = HeaderValue::from_str(config.admin_access_token.reveal().as_str())
            .map_err(|e| ShopifyApiError::Initialization(e.to_string()))?;
        headers.insert("X-Shopify-Access-Token", val);
        headers.insert("Accept", HeaderValue::from_static("application/json"));
        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| ShopifyApiError::Initialization(e.to_string()))?;
        Ok(Self { config, client: Arc::new(client) })
    }

    pub fn shop(&self) -> &str {
        self.config.shop.as_str()
    }

    pub fn url(&self, path: &str) -> String {
        format!("https://{}/admin/api/{}{path}", self.config.shop, self.config.api_version)
    }

    async fn send(&self, method: Method, path: &str, params: &[(&str, &str)]) -> Result<Response, ShopifyApiError> {
        let url = self.url(path);
        trace!("Sending REST query: {url}");
        let mut req = self.client.request(method, url);
        if !params.is_empty() {
            req = req.query(params);
        }
        let response = req.send().await.map_err(|e| ShopifyApiError::RestRequestError(e.to_string()))?;
        if response.status().is_success() {
            trace!("REST query successful. {}", response.status());
            Ok(response)
        } else {
            let status = response.status().as_u16();
            let message = response.text().await.map_err(|e| ShopifyApiError::RestResponseError(e.to_string()))?;
            Err(ShopifyApiError::QueryError { status, message })
        }
    }

    /// Fetches a single page of a REST list endpoint (`/{resource}.json`).
    ///
    /// Shopify rejects filter parameters on any request that carries a `page_info` cursor, so `filters` are only sent
    /// with the first page. The filters of the first request stay in effect for the rest of the cursor.
    async fn fetch_page<T: DeserializeOwned>(
        &self,
        resource: &str,
        filters: &[(&str, &str)],
        page_info: Option<&str>,
    ) -> Result<ShopifyPage<T>, ShopifyApiError> {
        let path = format!("/{resource}.json");
        let limit = self.config.page_size.to_string();
        let mut params = vec![("limit", limit.as_str())];
        match page_info {
            Some(cursor) => params.push(("page_info", cursor)),
            None => params.extend_from_slice(filters),
        }
        let response = self.send(Method::GET, &path, &params).await?;
        let next_page_info =
            response.headers().get(LINK).and_then(|h| h.to_str().ok()).and_then(next_page_info);
        let mut body = response.json::<Value>().await.map_err(|e| ShopifyApiError::JsonError(e.to_string()))?;
        let items = match body.get_mut(resource).map(Value::take) {
            Some(list) => serde_json::from_value::<Vec<T>>(list)
                .map_err(|e| ShopifyApiError::JsonError(format!("Invalid '{resource}' list. {e}")))?,
            None => return Err(ShopifyApiError::JsonError(format!("Response is missing the '{resource}' list"))),
        };
        debug!(
            "Fetched {} {resource} from {}. {}",
            items.len(),
            self.config.shop,
            if next_page_info.is_some() { "More pages follow." } else { "This is the last page." }
        );
        Ok(ShopifyPage { items, next_page_info })
    }

    pub async fn fetch_products(&self, page_info: Option<&str>) -> Result<ShopifyPage<ShopifyProduct>, ShopifyApiError> {
        self.fetch_page("products", &[], page_info).await
    }

    pub async fn fetch_customers(
        &self,
        page_info: Option<&str>,
    ) -> Result<ShopifyPage<ShopifyCustomer>, ShopifyApiError> {
        self.fetch_page("customers", &[], page_info).await
    }

    /// Fetches orders in every state. Shopify's default filter only returns open orders.
    pub async fn fetch_orders(&self, page_info: Option<&str>) -> Result<ShopifyPage<ShopifyOrder>, ShopifyApiError> {
        self.fetch_page("orders", &[("status", "any")], page_info).await
    }
}
