use actix_web::{http::StatusCode, test, test::TestRequest, web, App};
use shopsync_engine::{
    sync_objects::{ExternalCustomer, ExternalOrder, ExternalProduct},
    BulkSyncApi,
    CommerceDatabaseError,
    FetchError,
    Page,
    SyncReport,
    SyncStage,
};

use super::{
    helpers::{product, send, tenant, SHOP},
    mocks::{MockCommerceDb, MockFetcher},
};
use crate::routes::IngestRoute;

async fn ingest(db: MockCommerceDb, fetcher: MockFetcher, path: &str) -> (StatusCode, String) {
    let api = BulkSyncApi::new(db, fetcher);
    let app = App::new()
        .app_data(web::Data::new(api))
        .service(web::scope("/api").service(IngestRoute::<MockCommerceDb, MockFetcher>::new()));
    let service = test::init_service(app).await;
    let req = TestRequest::post().uri(path).to_request();
    send(&service, req).await
}

fn known_tenant(db: &mut MockCommerceDb) {
    db.expect_fetch_tenant().withf(|id| *id == 3).returning(|_| Ok(Some(tenant(3, SHOP))));
}

#[actix_web::test]
async fn unknown_kind_is_a_bad_request() {
    let _ = env_logger::try_init().ok();
    let (status, body) = ingest(MockCommerceDb::new(), MockFetcher::new(), "/api/ingest/3/refunds").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("Unknown sync target 'refunds'"));
}

#[actix_web::test]
async fn unknown_tenant_is_not_found() {
    let _ = env_logger::try_init().ok();
    let mut db = MockCommerceDb::new();
    db.expect_fetch_tenant().times(1).returning(|_| Ok(None));
    let (status, body) = ingest(db, MockFetcher::new(), "/api/ingest/9/all").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let report: SyncReport = serde_json::from_str(&body).unwrap();
    assert!(!report.success);
    assert_eq!(report.stage, None);
    assert_eq!(report.counts.products, 0);
    assert_eq!(report.error.as_deref(), Some("Tenant #9 does not exist"));
}

#[actix_web::test]
async fn products_are_pulled_across_pages() {
    let _ = env_logger::try_init().ok();
    let mut db = MockCommerceDb::new();
    known_tenant(&mut db);
    db.expect_upsert_product().times(3).returning(|tenant_id, p| Ok(product(1, tenant_id, p.shopify_id.as_str(), 0)));
    let mut fetcher = MockFetcher::new();
    fetcher.expect_fetch_products().withf(|_, cursor| cursor.is_none()).times(1).returning(|_, _| {
        Ok(Page::with_next(vec![ExternalProduct::new(1_i64), ExternalProduct::new(2_i64)], "page-2"))
    });
    fetcher
        .expect_fetch_products()
        .withf(|_, cursor| cursor.as_deref() == Some("page-2"))
        .times(1)
        .returning(|_, _| Ok(Page::last(vec![ExternalProduct::new(3_i64)])));
    let (status, body) = ingest(db, fetcher, "/api/ingest/3/products").await;
    assert_eq!(status, StatusCode::OK);
    let report: SyncReport = serde_json::from_str(&body).unwrap();
    assert!(report.success);
    assert_eq!(report.counts.products, 3);
    assert!(report.error.is_none());
}

#[actix_web::test]
async fn upstream_failure_stops_a_full_sync() {
    let _ = env_logger::try_init().ok();
    let mut db = MockCommerceDb::new();
    known_tenant(&mut db);
    db.expect_upsert_product().times(1).returning(|tenant_id, p| Ok(product(1, tenant_id, p.shopify_id.as_str(), 0)));
    let mut fetcher = MockFetcher::new();
    fetcher.expect_fetch_products().times(1).returning(|_, _| Ok(Page::last(vec![ExternalProduct::new(1_i64)])));
    fetcher
        .expect_fetch_customers()
        .times(1)
        .returning(|_, _| Err::<Page<ExternalCustomer>, _>(FetchError::RequestFailed("HTTP 503".into())));
    fetcher.expect_fetch_orders().times(0);
    let (status, body) = ingest(db, fetcher, "/api/ingest/3/all").await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    let report: SyncReport = serde_json::from_str(&body).unwrap();
    assert!(!report.success);
    assert_eq!(report.stage, Some(SyncStage::Customers));
    assert_eq!(report.counts.products, 1);
    assert_eq!(report.counts.customers, 0);
    assert!(report.error.unwrap().contains("HTTP 503"));
}

#[actix_web::test]
async fn persistence_failure_is_a_server_error() {
    let _ = env_logger::try_init().ok();
    let mut db = MockCommerceDb::new();
    known_tenant(&mut db);
    db.expect_upsert_order()
        .times(1)
        .returning(|_, _| Err(CommerceDatabaseError::DatabaseError("disk I/O error".into())));
    let mut fetcher = MockFetcher::new();
    fetcher.expect_fetch_orders().times(1).returning(|_, _| Ok(Page::last(vec![ExternalOrder::new(450789469_i64)])));
    let (status, body) = ingest(db, fetcher, "/api/ingest/3/order").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let report: SyncReport = serde_json::from_str(&body).unwrap();
    assert_eq!(report.stage, Some(SyncStage::Orders));
    assert_eq!(report.counts.orders, 0);
    assert!(report.error.unwrap().contains("disk I/O error"));
}
