use std::{path::Path, time::Duration};

use actix_web::{
    dev::{Server, Service, ServiceFactory, ServiceRequest, ServiceResponse},
    http::KeepAlive,
    middleware::Logger,
    web,
    App,
    HttpServer,
    Scope,
};
use futures::{future::ok, FutureExt};
use log::*;
use shopsync_engine::{BulkSyncApi, CommerceDatabase, InsightsApi, SqliteDatabase, TenantApi, WebhookApi};

use crate::{
    config::{ServerConfig, ServerOptions, ShopifyConfig},
    errors::ServerError,
    helpers::get_remote_ip,
    integrations::shopify::ShopifyFetcher,
    middleware::{HmacMiddlewareFactory, SHOPIFY_HMAC_HEADER},
    routes::{
        health,
        CreateTenantRoute,
        IngestRoute,
        InsightSummaryRoute,
        ListTenantsRoute,
        OrdersTrendRoute,
        TopCustomersRoute,
        TopProductsRoute,
    },
    shopify_routes::{CustomerUpdateRoute, OrderCreateRoute, ProductUpdateRoute},
};

/// Shopify order payloads with many line items comfortably exceed actix's default body limits.
const WEBHOOK_PAYLOAD_LIMIT: usize = 4 * 1024 * 1024;

/// Limits the raw body that the HMAC middleware reads. Scope data is only visible once the scope's middleware has
/// run, so this must be registered on the `App`.
pub fn webhook_payload_config() -> web::PayloadConfig {
    web::PayloadConfig::new(WEBHOOK_PAYLOAD_LIMIT)
}

fn webhook_json_config() -> web::JsonConfig {
    web::JsonConfig::default().limit(WEBHOOK_PAYLOAD_LIMIT)
}

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    ensure_sqlite_dir(&config.database_url)?;
    let db = SqliteDatabase::new_with_url(&config.database_url, config.max_connections)
        .await
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    if config.run_migrations {
        db.run_migrations().await.map_err(|e| ServerError::InitializeError(e.to_string()))?;
    }
    let srv = create_server_instance(config, db)?;
    srv.await.map_err(|e| ServerError::Unspecified(e.to_string()))
}

pub fn create_server_instance(config: ServerConfig, db: SqliteDatabase) -> Result<Server, ServerError> {
    let shopify_config = config.shopify_config.clone();
    let options = ServerOptions::from_config(&config);
    if !shopify_config.hmac_checks {
        warn!("🪛️ Shopify webhook signatures will NOT be checked. Anyone can write to any tenant's data.");
    }
    let srv = HttpServer::new(move || {
        let fetcher = ShopifyFetcher::new(shopify_config.api_version.clone(), shopify_config.page_size);
        let bulk_sync_api = BulkSyncApi::new(db.clone(), fetcher);
        let webhook_api = WebhookApi::new(db.clone());
        let tenant_api = TenantApi::new(db.clone());
        let insights_api = InsightsApi::new(db.clone());
        let app = App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("shopsync::access_log"))
            .app_data(webhook_payload_config())
            .app_data(web::Data::new(bulk_sync_api))
            .app_data(web::Data::new(webhook_api))
            .app_data(web::Data::new(tenant_api))
            .app_data(web::Data::new(insights_api));
        let api_scope = web::scope("/api")
            .service(IngestRoute::<SqliteDatabase, ShopifyFetcher>::new())
            .service(CreateTenantRoute::<SqliteDatabase>::new())
            .service(ListTenantsRoute::<SqliteDatabase>::new())
            .service(InsightSummaryRoute::<SqliteDatabase>::new())
            .service(OrdersTrendRoute::<SqliteDatabase>::new())
            .service(TopCustomersRoute::<SqliteDatabase>::new())
            .service(TopProductsRoute::<SqliteDatabase>::new());
        let webhook_scope = shopify_scope::<SqliteDatabase>(&shopify_config, options);
        app.service(health).service(api_scope).service(webhook_scope)
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((config.host.as_str(), config.port))?
    .run();
    Ok(srv)
}

/// The `/shopify` scope. Requests pass the IP whitelist first, then the HMAC check, before a webhook handler runs.
pub fn shopify_scope<B>(
    shopify_config: &ShopifyConfig,
    options: ServerOptions,
) -> Scope<
    impl ServiceFactory<ServiceRequest, Config = (), Response = ServiceResponse, Error = actix_web::Error, InitError = ()>,
>
where
    B: CommerceDatabase + 'static,
{
    let whitelist = shopify_config.whitelist.clone();
    let hmac_middleware =
        HmacMiddlewareFactory::new(SHOPIFY_HMAC_HEADER, shopify_config.webhook_secret.clone(), shopify_config.hmac_checks);
    web::scope("/shopify")
        .app_data(webhook_json_config())
        .wrap(hmac_middleware)
        .wrap_fn(move |req, srv| {
            let whitelisted = match &whitelist {
                None => true,
                Some(allowed) => {
                    match get_remote_ip(req.request(), options.use_x_forwarded_for, options.use_forwarded) {
                        Some(ip) => {
                            trace!("🛍️ Shopify webhook from {ip}");
                            allowed.contains(&ip)
                        },
                        None => {
                            warn!("🛍️ No IP address found in shopify remote peer request, denying access.");
                            false
                        },
                    }
                },
            };
            if whitelisted {
                srv.call(req).boxed_local()
            } else {
                ok(req.error_response(ServerError::ForbiddenPeer)).boxed_local()
            }
        })
        .service(ProductUpdateRoute::<B>::new())
        .service(OrderCreateRoute::<B>::new())
        .service(CustomerUpdateRoute::<B>::new())
}

/// SQLite creates a missing database file, but not the directory it lives in.
fn ensure_sqlite_dir(url: &str) -> Result<(), ServerError> {
    let path = url.trim_start_matches("sqlite://").trim_start_matches("sqlite:");
    let path = path.split('?').next().unwrap_or_default();
    if path.is_empty() || path.starts_with(":memory:") {
        return Ok(());
    }
    match Path::new(path).parent() {
        Some(dir) if !dir.as_os_str().is_empty() && !dir.exists() => {
            info!("🗃️ Creating database directory {}", dir.display());
            std::fs::create_dir_all(dir)?;
            Ok(())
        },
        _ => Ok(()),
    }
}
