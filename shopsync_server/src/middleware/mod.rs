mod hmac;

pub use hmac::{HmacMiddlewareFactory, HmacMiddlewareService, SHOPIFY_HMAC_HEADER, SHOPIFY_SHOP_DOMAIN_HEADER};
