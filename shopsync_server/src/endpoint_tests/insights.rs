use actix_web::{http::StatusCode, test, test::TestRequest, web, App};
use chrono::{TimeZone, Utc};
use serde_json::Value;
use shopsync_common::Money;
use shopsync_engine::{
    db_types::Order,
    traits::{InsightSummary, ProductSales},
    InsightsApi,
};

use super::{helpers::send, mocks::MockInsights};
use crate::routes::{InsightSummaryRoute, OrdersTrendRoute, TopCustomersRoute, TopProductsRoute};

async fn get(db: MockInsights, path: &str) -> (StatusCode, String) {
    let app = App::new().app_data(web::Data::new(InsightsApi::new(db))).service(
        web::scope("/api")
            .service(InsightSummaryRoute::<MockInsights>::new())
            .service(OrdersTrendRoute::<MockInsights>::new())
            .service(TopCustomersRoute::<MockInsights>::new())
            .service(TopProductsRoute::<MockInsights>::new()),
    );
    let service = test::init_service(app).await;
    send(&service, TestRequest::get().uri(path).to_request()).await
}

fn order(id: i64, cents: i64, day: u32, hour: u32) -> Order {
    let ts = Utc.with_ymd_and_hms(2024, 3, day, hour, 0, 0).unwrap();
    Order {
        id,
        tenant_id: 1,
        shopify_id: id.into(),
        total_price: Money::from_cents(cents),
        customer_id: None,
        created_at: ts,
        updated_at: ts,
    }
}

#[actix_web::test]
async fn summary() {
    let _ = env_logger::try_init().ok();
    let mut db = MockInsights::new();
    db.expect_fetch_summary().withf(|id| *id == 1).times(1).returning(|_| {
        Ok(InsightSummary { total_customers: 2, total_orders: 3, total_revenue: Money::from_cents(12050) })
    });
    let (status, body) = get(db, "/api/insight/1/summary").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, r#"{"total_customers":2,"total_orders":3,"total_revenue":"120.50"}"#);
}

#[actix_web::test]
async fn orders_trend_groups_by_day() {
    let _ = env_logger::try_init().ok();
    let mut db = MockInsights::new();
    db.expect_fetch_orders_between()
        .withf(|id, since, until| {
            *id == 1 &&
                since.map(|s| s.to_rfc3339()) == Some("2024-03-01T00:00:00+00:00".to_string()) &&
                until.map(|u| u.to_rfc3339()) == Some("2024-03-31T23:59:59.999+00:00".to_string())
        })
        .times(1)
        .returning(|_, _, _| Ok(vec![order(1, 1000, 2, 9), order(2, 550, 2, 17), order(3, 2000, 5, 12)]));
    let (status, body) = get(db, "/api/insight/1/orders-trend?start=2024-03-01&end=2024-03-31").await;
    assert_eq!(status, StatusCode::OK);
    let trend: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(trend["2024-03-02"]["total_orders"], 2);
    assert_eq!(trend["2024-03-02"]["total_revenue"], "15.50");
    assert_eq!(trend["2024-03-05"]["total_orders"], 1);
    assert_eq!(trend.as_object().unwrap().len(), 2);
}

#[actix_web::test]
async fn reversed_trend_window_is_a_bad_request() {
    let _ = env_logger::try_init().ok();
    let (status, _) = get(MockInsights::new(), "/api/insight/1/orders-trend?start=2024-04-01&end=2024-03-01").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = get(MockInsights::new(), "/api/insight/1/orders-trend?start=yesterday").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn top_customers_uses_the_default_limit() {
    let _ = env_logger::try_init().ok();
    let mut db = MockInsights::new();
    db.expect_fetch_top_customers().withf(|id, limit| *id == 1 && *limit == 5).times(1).returning(|_, _| Ok(vec![]));
    let (status, body) = get(db, "/api/insight/1/top-customers").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "[]");
}

#[actix_web::test]
async fn top_products_clamps_the_limit() {
    let _ = env_logger::try_init().ok();
    let mut db = MockInsights::new();
    db.expect_fetch_top_products().withf(|id, limit| *id == 1 && *limit == 100).times(1).returning(|_, _| {
        Ok(vec![ProductSales {
            product_id: 4,
            title: "IPod Nano - 8GB".into(),
            total_revenue: Money::from_cents(39800),
            total_quantity: 2,
        }])
    });
    let (status, body) = get(db, "/api/insight/1/top-products?limit=5000").await;
    assert_eq!(status, StatusCode::OK);
    let products: Vec<ProductSales> = serde_json::from_str(&body).unwrap();
    assert_eq!(products.len(), 1);
    assert_eq!(products[0].total_quantity, 2);
}
