//! Request handler definitions
//!
//! Define each route and it handler here.
//! Handlers that are more than a line or two MUST go into a separate module. Keep this module neat and tidy 🙏
//!
//! A note about performance:
//! Since each worker thread processes its requests sequentially, handlers which block the current thread will cause the
//! current worker to stop processing new requests. A bulk sync can take a long time, but it is entirely I/O bound, so
//! the ingest handler awaits it rather than blocking on it, and the worker keeps serving other requests meanwhile.
use actix_web::{get, http::StatusCode, web, HttpResponse, Responder};
use log::*;
use shopsync_engine::{
    BulkSyncApi,
    CommerceDatabase,
    CommerceInsights,
    InsightsApi,
    ResourceFetcher,
    SyncError,
    SyncReport,
    SyncTarget,
    TenantApi,
    TenantManagement,
};

use crate::{
    data_objects::{LimitParams, NewTenantRequest, TrendParams},
    errors::ServerError,
};

// Web-actix cannot handle generics in handlers, so it's implemented manually using the `route!` macro
#[macro_export]
macro_rules! route {
    ($name:ident => $method:ident $path:literal impl $($bounds:ty),+) => {
        paste::paste! { pub struct [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ >( $( core::marker::PhantomData<fn() -> [< T $bounds:camel> ] >,)+ );}
        paste::paste! { impl< $( [< T $bounds:camel> ],)+ > [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ > {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self($( core::marker::PhantomData::<fn() -> [< T $bounds:camel> ] >,)+)
            }
        }}
        paste::paste! { impl<$( [< T $bounds:camel >] , )+> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<$([<T $bounds:camel>],)+>
        where
            $([<T $bounds:camel>]: $bounds + 'static,)+
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::< $( [< T $bounds:camel >], )+>);
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };
}

// ----------------------------------------------   Health  ----------------------------------------------------
#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().body("👍️\n")
}

//----------------------------------------------   Ingest  ----------------------------------------------------
route!(ingest => Post "/ingest/{tenant_id}/{kind}" impl CommerceDatabase, ResourceFetcher);
/// Route handler for bulk ingestion.
///
/// Pulls the requested collection (`products`, `customers`, `orders`, or `all`) from Shopify for the tenant and
/// reconciles it into the database. `all` runs products, then customers, then orders, and stops at the first stage
/// that fails.
///
/// The response body is always a [`SyncReport`]. On failure it carries the counts that were completed, the failing
/// stage and the error message. The status is 404 if the tenant is unknown, 502 if Shopify could not be read and
/// 500 if the database write failed.
pub async fn ingest<B, F>(
    path: web::Path<(i64, String)>,
    api: web::Data<BulkSyncApi<B, F>>,
) -> Result<HttpResponse, ServerError>
where
    B: CommerceDatabase,
    F: ResourceFetcher,
{
    let (tenant_id, kind) = path.into_inner();
    let target = kind.parse::<SyncTarget>().map_err(ServerError::InvalidRequest)?;
    info!("💻️ Bulk ingest of {kind} requested for tenant #{tenant_id}");
    let result = api.sync(tenant_id, target).await;
    let status = match &result {
        Ok(_) => StatusCode::OK,
        Err(failure) => {
            warn!("💻️ Bulk ingest of {kind} for tenant #{tenant_id} failed. {failure}");
            match failure.source {
                SyncError::TenantNotFound(_) => StatusCode::NOT_FOUND,
                SyncError::UpstreamFetchFailed(_) => StatusCode::BAD_GATEWAY,
                SyncError::PersistenceFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
            }
        },
    };
    Ok(HttpResponse::build(status).json(SyncReport::from(result)))
}

//----------------------------------------------   Tenants  ----------------------------------------------------
route!(create_tenant => Post "/tenant" impl TenantManagement);
/// Registers a shop. All fields of [`NewTenantRequest`] are required. The response never includes the tenant's
/// credentials.
pub async fn create_tenant<B: TenantManagement>(
    body: web::Json<NewTenantRequest>,
    api: web::Data<TenantApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let request = body.into_inner();
    debug!("💻️ POST new tenant for {}", request.shop_domain);
    let tenant = api.create_tenant(request.into()).await?;
    Ok(HttpResponse::Created().json(tenant))
}

route!(list_tenants => Get "/tenant" impl TenantManagement);
pub async fn list_tenants<B: TenantManagement>(api: web::Data<TenantApi<B>>) -> Result<HttpResponse, ServerError> {
    trace!("💻️ GET tenants");
    let tenants = api.list_tenants().await?;
    Ok(HttpResponse::Ok().json(tenants))
}

//----------------------------------------------   Insights  ----------------------------------------------------
route!(insight_summary => Get "/insight/{tenant_id}/summary" impl CommerceInsights);
pub async fn insight_summary<B: CommerceInsights>(
    path: web::Path<i64>,
    api: web::Data<InsightsApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let tenant_id = path.into_inner();
    trace!("💻️ GET insight summary for tenant #{tenant_id}");
    let summary = api.summary(tenant_id).await?;
    Ok(HttpResponse::Ok().json(summary))
}

route!(orders_trend => Get "/insight/{tenant_id}/orders-trend" impl CommerceInsights);
/// Daily order counts and revenue. The optional `start` and `end` query parameters limit the window.
pub async fn orders_trend<B: CommerceInsights>(
    path: web::Path<i64>,
    query: web::Query<TrendParams>,
    api: web::Data<InsightsApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let tenant_id = path.into_inner();
    let (since, until) = query.range()?;
    trace!("💻️ GET orders trend for tenant #{tenant_id} between {since:?} and {until:?}");
    let trend = api.orders_trend(tenant_id, since, until).await?;
    Ok(HttpResponse::Ok().json(trend))
}

route!(top_customers => Get "/insight/{tenant_id}/top-customers" impl CommerceInsights);
pub async fn top_customers<B: CommerceInsights>(
    path: web::Path<i64>,
    query: web::Query<LimitParams>,
    api: web::Data<InsightsApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let tenant_id = path.into_inner();
    trace!("💻️ GET top customers for tenant #{tenant_id}");
    let customers = api.top_customers(tenant_id, query.limit).await?;
    Ok(HttpResponse::Ok().json(customers))
}

route!(top_products => Get "/insight/{tenant_id}/top-products" impl CommerceInsights);
pub async fn top_products<B: CommerceInsights>(
    path: web::Path<i64>,
    query: web::Query<LimitParams>,
    api: web::Data<InsightsApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let tenant_id = path.into_inner();
    trace!("💻️ GET top products for tenant #{tenant_id}");
    let products = api.top_products(tenant_id, query.limit).await?;
    Ok(HttpResponse::Ok().json(products))
}
