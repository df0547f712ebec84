use actix_web::http::StatusCode;
use chrono::{TimeZone, Utc};
use shopsync_common::{Money, Secret};
use shopsync_engine::{
    db_types::{Customer, ExternalId, Order, OrderItem},
    CommerceDatabaseError,
};

use super::{
    helpers::{deliver, deliver_with, product, tenant, Delivery, SHOP, WEBHOOK_SECRET},
    mocks::MockCommerceDb,
};
use crate::config::ShopifyConfig;

const PRODUCT_UPDATE: &str = "/shopify/webhook/product_update";
const ORDER_CREATE: &str = "/shopify/webhook/order_create";
const CUSTOMER_UPDATE: &str = "/shopify/webhook/customer_update";

const PRODUCT_JSON: &str = r#"{"id": 632910392, "title": "IPod Nano - 8GB", "variants": [
    {"id": 808950810, "product_id": 632910392, "price": "199.00"}
]}"#;

const ORDER_JSON: &str = r#"{
    "id": 450789469,
    "created_at": "2024-03-13T16:09:54-04:00",
    "total_price": "204.00",
    "customer": {"id": 207119551},
    "line_items": [
        {"id": 466157049, "product_id": 632910392, "quantity": 1, "price": "199.00"},
        {"id": 518995019, "product_id": 921728736, "quantity": 1, "price": "5.00"}
    ]
}"#;

const CUSTOMER_JSON: &str = r#"{"id": 207119551, "email": "bob@example.com", "first_name": "Bob", "total_spent": "199.65"}"#;

// A mock with no expectations panics on any call, so these tests also prove that a refused delivery never reaches
// the database.
#[actix_web::test]
async fn bad_signature_is_refused_before_any_database_access() {
    let _ = env_logger::try_init().ok();
    let delivery = Delivery::new(PRODUCT_UPDATE, PRODUCT_JSON).signed_with("not-the-webhook-secret");
    let (status, body) = deliver(MockCommerceDb::new(), delivery, true).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, r#"{"error":"Authentication Error. Invalid HMAC signature."}"#);
}

#[actix_web::test]
async fn tampered_body_is_refused() {
    let _ = env_logger::try_init().ok();
    let mut delivery = Delivery::new(ORDER_CREATE, ORDER_JSON);
    delivery.body = delivery.body.replace("204.00", "0.01");
    let (status, _) = deliver(MockCommerceDb::new(), delivery, true).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn missing_signature_is_refused() {
    let _ = env_logger::try_init().ok();
    let delivery = Delivery::new(CUSTOMER_UPDATE, CUSTOMER_JSON).unsigned();
    let (status, body) = deliver(MockCommerceDb::new(), delivery, true).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body.contains("No HMAC signature was provided."));
}

#[actix_web::test]
async fn garbled_signature_is_refused() {
    let _ = env_logger::try_init().ok();
    let mut delivery = Delivery::new(PRODUCT_UPDATE, PRODUCT_JSON);
    delivery.signature = Some("%%% not base64 %%%".into());
    let (status, body) = deliver(MockCommerceDb::new(), delivery, true).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body.contains("not valid base64"));
}

#[actix_web::test]
async fn missing_shop_domain_is_refused() {
    let _ = env_logger::try_init().ok();
    let delivery = Delivery::new(PRODUCT_UPDATE, PRODUCT_JSON).from_shop(None);
    let (status, body) = deliver(MockCommerceDb::new(), delivery, true).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body.contains("No shop domain was provided."));
}

#[actix_web::test]
async fn missing_shop_domain_is_refused_without_hmac_checks() {
    let _ = env_logger::try_init().ok();
    let delivery = Delivery::new(PRODUCT_UPDATE, PRODUCT_JSON).unsigned().from_shop(None);
    let (status, body) = deliver(MockCommerceDb::new(), delivery, false).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body.contains("No shop domain was provided."));
}

#[actix_web::test]
async fn empty_body_is_refused() {
    let _ = env_logger::try_init().ok();
    let delivery = Delivery::new(PRODUCT_UPDATE, "");
    let (status, body) = deliver(MockCommerceDb::new(), delivery, true).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body.contains("The request body is empty."));
}

#[actix_web::test]
async fn unparsable_body_is_a_bad_request() {
    let _ = env_logger::try_init().ok();
    let delivery = Delivery::new(PRODUCT_UPDATE, r#"{"title": "no id here"}"#);
    let (status, _) = deliver(MockCommerceDb::new(), delivery, true).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn unknown_shop_is_not_found() {
    let _ = env_logger::try_init().ok();
    let mut db = MockCommerceDb::new();
    db.expect_fetch_tenant_by_shop_domain()
        .withf(|shop| shop.to_string() == "stranger.myshopify.com")
        .times(1)
        .returning(|_| Ok(None));
    let delivery = Delivery::new(PRODUCT_UPDATE, PRODUCT_JSON).from_shop(Some("stranger.myshopify.com"));
    let (status, body) = deliver(db, delivery, true).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.contains("stranger.myshopify.com"));
}

#[actix_web::test]
async fn product_update_is_stored_for_the_sending_shop() {
    let _ = env_logger::try_init().ok();
    let mut db = MockCommerceDb::new();
    db.expect_fetch_tenant_by_shop_domain()
        .withf(|shop| shop.to_string() == SHOP)
        .times(1)
        .returning(|_| Ok(Some(tenant(7, SHOP))));
    db.expect_upsert_product()
        .withf(|tenant_id, p| {
            *tenant_id == 7 &&
                p.shopify_id.as_str() == "632910392" &&
                p.title == "IPod Nano - 8GB" &&
                p.price == Money::from_cents(19900)
        })
        .times(1)
        .returning(|_, _| Ok(product(1, 7, "632910392", 19900)));
    // Shop domains are matched case-insensitively
    let delivery = Delivery::new(PRODUCT_UPDATE, PRODUCT_JSON).from_shop(Some("Acme.myshopify.com"));
    let (status, body) = deliver(db, delivery, true).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, r#"{"success":true,"message":"Product 632910392 updated."}"#);
}

#[actix_web::test]
async fn signed_payloads_larger_than_the_actix_default_are_accepted() {
    let _ = env_logger::try_init().ok();
    let mut db = MockCommerceDb::new();
    db.expect_fetch_tenant_by_shop_domain().times(1).returning(|_| Ok(Some(tenant(7, SHOP))));
    db.expect_upsert_product()
        .withf(|tenant_id, p| *tenant_id == 7 && p.shopify_id.as_str() == "632910392")
        .times(1)
        .returning(|_, _| Ok(product(1, 7, "632910392", 19900)));
    // Shopify sends the full product description; 300 KiB is past actix's 256 KiB payload default
    let description = "x".repeat(300 * 1024);
    let json = format!(
        r#"{{"id": 632910392, "title": "IPod Nano - 8GB", "body_html": "{description}", "variants": [
            {{"id": 808950810, "product_id": 632910392, "price": "199.00"}}
        ]}}"#
    );
    let (status, body) = deliver(db, Delivery::new(PRODUCT_UPDATE, &json), true).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, r#"{"success":true,"message":"Product 632910392 updated."}"#);
}

#[actix_web::test]
async fn order_create_fans_out_known_products_only() {
    let _ = env_logger::try_init().ok();
    let ts = Utc.with_ymd_and_hms(2024, 3, 13, 20, 9, 54).unwrap();
    let mut db = MockCommerceDb::new();
    db.expect_fetch_tenant_by_shop_domain().times(1).returning(|_| Ok(Some(tenant(7, SHOP))));
    db.expect_fetch_customer_by_external_id()
        .withf(|tenant_id, id| *tenant_id == 7 && id.as_str() == "207119551")
        .times(1)
        .returning(|_, _| Ok(None));
    db.expect_upsert_order()
        .withf(move |tenant_id, o| {
            *tenant_id == 7 &&
                o.shopify_id.as_str() == "450789469" &&
                o.total_price == Money::from_cents(20400) &&
                o.customer_id.is_none() &&
                o.created_at == Some(ts)
        })
        .times(1)
        .returning(move |tenant_id, o| {
            Ok(Order {
                id: 11,
                tenant_id,
                shopify_id: o.shopify_id,
                total_price: o.total_price,
                customer_id: None,
                created_at: ts,
                updated_at: ts,
            })
        });
    db.expect_fetch_products_by_external_ids()
        .withf(|tenant_id, ids| *tenant_id == 7 && ids.len() == 2)
        .times(1)
        .returning(|_, _| Ok(vec![product(3, 7, "632910392", 19900)]));
    db.expect_upsert_order_item()
        .withf(|item| item.order_id == 11 && item.product_id == 3 && item.quantity == 1)
        .times(1)
        .returning(|item| {
            Ok(OrderItem { id: 21, order_id: item.order_id, product_id: item.product_id, quantity: 1, price: item.price })
        });
    let (status, body) = deliver(db, Delivery::new(ORDER_CREATE, ORDER_JSON), true).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        r#"{"success":true,"message":"Order 450789469 stored with 1 items. 1 line items were dropped."}"#
    );
}

#[actix_web::test]
async fn persistence_failure_is_a_server_error() {
    let _ = env_logger::try_init().ok();
    let mut db = MockCommerceDb::new();
    db.expect_fetch_tenant_by_shop_domain().times(1).returning(|_| Ok(Some(tenant(7, SHOP))));
    db.expect_upsert_customer()
        .times(1)
        .returning(|_, _| Err(CommerceDatabaseError::DatabaseError("database is locked".into())));
    let (status, body) = deliver(db, Delivery::new(CUSTOMER_UPDATE, CUSTOMER_JSON), true).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body.contains("database is locked"));
}

#[actix_web::test]
async fn customer_update_is_stored() {
    let _ = env_logger::try_init().ok();
    let mut db = MockCommerceDb::new();
    db.expect_fetch_tenant_by_shop_domain().times(1).returning(|_| Ok(Some(tenant(7, SHOP))));
    db.expect_upsert_customer()
        .withf(|tenant_id, c| {
            *tenant_id == 7 &&
                c.shopify_id.as_str() == "207119551" &&
                c.email.as_deref() == Some("bob@example.com") &&
                c.last_name.is_none() &&
                c.total_spent == Money::from_cents(19965)
        })
        .times(1)
        .returning(|tenant_id, c| {
            let ts = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
            Ok(Customer {
                id: 5,
                tenant_id,
                shopify_id: ExternalId::from("207119551"),
                email: c.email,
                first_name: c.first_name,
                last_name: c.last_name,
                total_spent: c.total_spent,
                created_at: ts,
                updated_at: ts,
            })
        });
    let (status, body) = deliver(db, Delivery::new(CUSTOMER_UPDATE, CUSTOMER_JSON), true).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, r#"{"success":true,"message":"Customer 207119551 updated."}"#);
}

#[actix_web::test]
async fn peers_off_the_whitelist_are_forbidden() {
    let _ = env_logger::try_init().ok();
    let config = ShopifyConfig {
        webhook_secret: Secret::new(WEBHOOK_SECRET.to_string()),
        whitelist: Some(vec!["23.227.38.32".parse().unwrap()]),
        ..Default::default()
    };
    let delivery = Delivery::new(PRODUCT_UPDATE, PRODUCT_JSON).from_peer("10.0.0.7:4431");
    let (status, body) = deliver_with(MockCommerceDb::new(), delivery.into_request(), &config).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body, r#"{"error":"The request came from a peer that is not on the whitelist."}"#);

    let mut db = MockCommerceDb::new();
    db.expect_fetch_tenant_by_shop_domain().times(1).returning(|_| Ok(Some(tenant(7, SHOP))));
    db.expect_upsert_product().times(1).returning(|_, _| Ok(product(1, 7, "632910392", 19900)));
    let delivery = Delivery::new(PRODUCT_UPDATE, PRODUCT_JSON).from_peer("23.227.38.32:443");
    let (status, _) = deliver_with(db, delivery.into_request(), &config).await;
    assert_eq!(status, StatusCode::OK);
}
