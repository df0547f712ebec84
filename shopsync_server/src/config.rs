use std::{env, net::IpAddr};

use log::*;
use shopify_tools::{DEFAULT_API_VERSION, MAX_PAGE_SIZE};
use shopsync_common::{helpers::parse_boolean_flag, Secret};

const DEFAULT_SHOPSYNC_HOST: &str = "127.0.0.1";
const DEFAULT_SHOPSYNC_PORT: u16 = 8370;
const DEFAULT_DATABASE_URL: &str = "sqlite://data/shopsync.db";
const DEFAULT_MAX_CONNECTIONS: u32 = 25;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub max_connections: u32,
    /// If true, pending database migrations are applied when the server starts.
    pub run_migrations: bool,
    /// If true, the X-Forwarded-For header will be used to determine the client's IP address, rather than the
    /// connection's remote address.
    pub use_x_forwarded_for: bool,
    /// If true, the Forwarded header will be used to determine the client's IP address, rather than the
    /// connection's remote address.
    pub use_forwarded: bool,
    pub shopify_config: ShopifyConfig,
}

#[derive(Clone, Debug)]
pub struct ShopifyConfig {
    /// The app's webhook signing secret. Every delivery to `/shopify/webhook` is signed with it.
    pub webhook_secret: Secret<String>,
    /// If false, webhook signatures are not checked. **DANGER**
    pub hmac_checks: bool,
    /// If supplied, requests against /shopify endpoints will be checked against a whitelist of Shopify IP addresses.
    /// To explicitly disable the whitelist, set this to "false", "none", or "0".
    pub whitelist: Option<Vec<IpAddr>>,
    pub api_version: String,
    /// Records requested per page during bulk sync
    pub page_size: u32,
}

impl Default for ShopifyConfig {
    fn default() -> Self {
        Self {
            webhook_secret: Secret::default(),
            hmac_checks: true,
            whitelist: None,
            api_version: DEFAULT_API_VERSION.to_string(),
            page_size: MAX_PAGE_SIZE,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_SHOPSYNC_HOST.to_string(),
            port: DEFAULT_SHOPSYNC_PORT,
            database_url: DEFAULT_DATABASE_URL.to_string(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            run_migrations: true,
            use_x_forwarded_for: false,
            use_forwarded: false,
            shopify_config: ShopifyConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self { host: host.to_string(), port, ..Default::default() }
    }

    pub fn from_env_or_default() -> Self {
        let host = env::var("SHOPSYNC_HOST").ok().unwrap_or_else(|| DEFAULT_SHOPSYNC_HOST.into());
        let port = env::var("SHOPSYNC_PORT")
            .map(|s| {
                s.parse::<u16>().unwrap_or_else(|e| {
                    error!(
                        "🪛️ {s} is not a valid port for SHOPSYNC_PORT. {e} Using the default, {DEFAULT_SHOPSYNC_PORT}, \
                         instead."
                    );
                    DEFAULT_SHOPSYNC_PORT
                })
            })
            .ok()
            .unwrap_or(DEFAULT_SHOPSYNC_PORT);
        let database_url = env::var("SHOPSYNC_DATABASE_URL").ok().unwrap_or_else(|| {
            warn!("🪛️ SHOPSYNC_DATABASE_URL is not set. Using the default, {DEFAULT_DATABASE_URL}.");
            DEFAULT_DATABASE_URL.to_string()
        });
        let max_connections = env::var("SHOPSYNC_DATABASE_MAX_CONNECTIONS")
            .ok()
            .and_then(|s| {
                s.parse::<u32>()
                    .map_err(|e| warn!("🪛️ Invalid configuration value for SHOPSYNC_DATABASE_MAX_CONNECTIONS. {e}"))
                    .ok()
            })
            .filter(|n| *n > 0)
            .unwrap_or(DEFAULT_MAX_CONNECTIONS);
        let run_migrations = parse_boolean_flag(env::var("SHOPSYNC_RUN_MIGRATIONS").ok(), true);
        let use_x_forwarded_for = parse_boolean_flag(env::var("SHOPSYNC_USE_X_FORWARDED_FOR").ok(), false);
        let use_forwarded = parse_boolean_flag(env::var("SHOPSYNC_USE_FORWARDED").ok(), false);
        let shopify_config = ShopifyConfig::from_env_or_defaults();
        Self {
            host,
            port,
            database_url,
            max_connections,
            run_migrations,
            use_x_forwarded_for,
            use_forwarded,
            shopify_config,
        }
    }
}

impl ShopifyConfig {
    pub fn from_env_or_defaults() -> Self {
        let webhook_secret = env::var("SHOPSYNC_SHOPIFY_WEBHOOK_SECRET").ok().unwrap_or_else(|| {
            error!(
                "🪛️ SHOPSYNC_SHOPIFY_WEBHOOK_SECRET is not set. Please set it to the webhook signing key for your \
                 Shopify app."
            );
            String::default()
        });
        let webhook_secret = Secret::new(webhook_secret);
        let hmac_checks = parse_boolean_flag(env::var("SHOPSYNC_SHOPIFY_HMAC_CHECKS").ok(), true);
        if !hmac_checks {
            warn!("🚨️ Shopify webhook signature checks are DISABLED. Anyone can forge webhook deliveries.");
        }
        let whitelist = env::var("SHOPSYNC_SHOPIFY_IP_WHITELIST").ok().and_then(|s| parse_whitelist(&s));
        match &whitelist {
            Some(whitelist) if whitelist.is_empty() => {
                warn!(
                    "🚨️ The Shopify IP whitelist was configured, but is empty.  The server will run, but won't \
                     authorise any Shopify incoming requests."
                );
            },
            None => {
                info!("🪛️ No Shopify IP whitelist is set. Only HMAC validation will be used.");
            },
            Some(v) => {
                let addrs = v.iter().map(|a| a.to_string()).collect::<Vec<_>>().join(", ");
                info!("🪛️ Shopify IP whitelist: {addrs}");
            },
        }
        let api_version = env::var("SHOPSYNC_SHOPIFY_API_VERSION").ok().unwrap_or_else(|| {
            info!("🪛️ SHOPSYNC_SHOPIFY_API_VERSION is not set. Using {DEFAULT_API_VERSION}.");
            DEFAULT_API_VERSION.to_string()
        });
        let page_size = env::var("SHOPSYNC_SHOPIFY_PAGE_SIZE")
            .ok()
            .and_then(|s| {
                s.parse::<u32>()
                    .map_err(|e| warn!("🪛️ Invalid configuration value for SHOPSYNC_SHOPIFY_PAGE_SIZE. {e}"))
                    .ok()
            })
            .unwrap_or(MAX_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE);
        Self { webhook_secret, hmac_checks, whitelist, api_version, page_size }
    }
}

/// Parses a comma-separated list of IP addresses. "none", "false" and "0" disable the whitelist. Invalid entries are
/// skipped.
fn parse_whitelist(s: &str) -> Option<Vec<IpAddr>> {
    if ["none", "false", "0", ""].contains(&s.trim().to_lowercase().as_str()) {
        info!(
            "🪛️ Shopify IP whitelist is disabled. If this is not what you want, set SHOPSYNC_SHOPIFY_IP_WHITELIST to a \
             comma-separated list of IP addresses to enable it."
        );
        return None;
    }
    let ip_addrs = s
        .split(',')
        .filter_map(|s| {
            s.trim()
                .parse()
                .map_err(|e| {
                    warn!("🪛️ Ignoring invalid IP address ({s}) in SHOPSYNC_SHOPIFY_IP_WHITELIST: {e}");
                })
                .ok()
        })
        .collect::<Vec<IpAddr>>();
    Some(ip_addrs)
}

//-------------------------------------------------  ServerOptions  ----------------------------------------------------
/// A subset of the server configuration that is used to configure the server's behaviour. Generally we try to keep this
/// as small as possible, and exclude secrets to avoid passing sensitive information around the system.
#[derive(Clone, Copy, Debug, Default)]
pub struct ServerOptions {
    pub use_x_forwarded_for: bool,
    pub use_forwarded: bool,
}

impl ServerOptions {
    pub fn from_config(config: &ServerConfig) -> Self {
        Self { use_x_forwarded_for: config.use_x_forwarded_for, use_forwarded: config.use_forwarded }
    }
}
