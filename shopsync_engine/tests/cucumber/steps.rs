use cucumber::{then, when};
use shopsync_common::Money;
use shopsync_engine::{
    db_types::{ExternalId, Order},
    sync_objects::{ExternalCustomer, ExternalLineItem, ExternalOrder, ExternalProduct},
    CommerceDatabase,
    CommerceInsights,
    SyncReport,
    SyncStage,
    WebhookApi,
    WebhookError,
};

use crate::cucumber::SyncWorld;

fn shop_domain(shop: &str) -> String {
    format!("{shop}.myshopify.com")
}

fn money(value: &str) -> Money {
    value.parse().expect("Not a valid amount")
}

fn webhooks(world: &SyncWorld) -> WebhookApi<shopsync_engine::SqliteDatabase> {
    WebhookApi::new(world.db().clone())
}

async fn fetch_order(world: &SyncWorld, shop: &str, order_id: i64) -> Order {
    let tenant_id = world.tenant_id(shop);
    world
        .db()
        .fetch_order_by_external_id(tenant_id, &ExternalId::from(order_id))
        .await
        .expect("Error fetching order")
        .expect("Order does not exist")
}

//----------------------------------------------   Webhooks  ----------------------------------------------------
#[when(expr = "'{word}' sends a product update for product {int} priced at {word}")]
async fn product_update(world: &mut SyncWorld, shop: String, product_id: i64, price: String) {
    let product = ExternalProduct::new(product_id).with_title(format!("Product {product_id}")).with_variant_price(price);
    webhooks(world).handle_product_update(&shop_domain(&shop), product).await.expect("Product webhook failed");
}

#[when(expr = "'{word}' sends a customer update for customer {int} who has spent {word}")]
async fn customer_update(world: &mut SyncWorld, shop: String, customer_id: i64, spent: String) {
    let customer = ExternalCustomer::new(customer_id).with_total_spent(spent);
    webhooks(world).handle_customer_update(&shop_domain(&shop), customer).await.expect("Customer webhook failed");
}

#[when(expr = "'{word}' sends order {int} for {word} from customer {int}")]
async fn order_from_customer(world: &mut SyncWorld, shop: String, order_id: i64, total: String, customer_id: i64) {
    let order = ExternalOrder::new(order_id).with_total_price(total).with_customer(customer_id);
    webhooks(world).handle_order_create(&shop_domain(&shop), order).await.expect("Order webhook failed");
}

#[when(expr = "'{word}' sends order {int} for {word} with {int} of product {int} and {int} of product {int}")]
#[allow(clippy::too_many_arguments)]
async fn order_with_items(
    world: &mut SyncWorld,
    shop: String,
    order_id: i64,
    total: String,
    qty1: i64,
    product1: i64,
    qty2: i64,
    product2: i64,
) {
    let order = ExternalOrder::new(order_id)
        .with_total_price(total)
        .with_line_item(ExternalLineItem::new(product1, qty1, "1.00"))
        .with_line_item(ExternalLineItem::new(product2, qty2, "1.00"));
    webhooks(world).handle_order_create(&shop_domain(&shop), order).await.expect("Order webhook failed");
}

#[when(expr = "a product update arrives for the unregistered shop '{word}'")]
async fn unknown_shop(world: &mut SyncWorld, shop: String) {
    let product = ExternalProduct::new(1_i64);
    let result = webhooks(world).handle_product_update(&shop_domain(&shop), product).await;
    world.last_webhook_error = result.err();
}

#[then("the webhook is refused because the shop is unknown")]
async fn webhook_refused(world: &mut SyncWorld) {
    assert!(matches!(world.last_webhook_error, Some(WebhookError::TenantNotFound(_))));
}

//----------------------------------------------   Bulk sync  ---------------------------------------------------
#[when(expr = "the upstream store of '{word}' lists product {int} priced at {word}")]
async fn upstream_product(world: &mut SyncWorld, shop: String, product_id: i64, price: String) {
    let product = ExternalProduct::new(product_id).with_variant_price(price);
    world.system().upstream.edit(&shop_domain(&shop), |c| c.products.push(product));
}

#[when(expr = "the upstream store of '{word}' lists customer {int}")]
async fn upstream_customer(world: &mut SyncWorld, shop: String, customer_id: i64) {
    let customer = ExternalCustomer::new(customer_id);
    world.system().upstream.edit(&shop_domain(&shop), |c| c.customers.push(customer));
}

#[when(expr = "the upstream store of '{word}' lists order {int} from customer {int} with {int} of product {int}")]
async fn upstream_order(world: &mut SyncWorld, shop: String, order_id: i64, customer_id: i64, qty: i64, product: i64) {
    let order = ExternalOrder::new(order_id)
        .with_customer(customer_id)
        .with_line_item(ExternalLineItem::new(product, qty, "1.00"));
    world.system().upstream.edit(&shop_domain(&shop), |c| c.orders.push(order));
}

#[when(expr = "the upstream store of '{word}' cannot list customers")]
async fn upstream_customers_down(world: &mut SyncWorld, shop: String) {
    world.system().upstream.edit(&shop_domain(&shop), |c| c.customers_unavailable = true);
}

#[when(expr = "I run a full sync for '{word}'")]
async fn full_sync(world: &mut SyncWorld, shop: String) {
    let tenant_id = world.tenant_id(&shop);
    let result = world.system().bulk.sync_all(tenant_id).await;
    world.last_report = Some(SyncReport::from(result));
}

#[then(expr = "the sync succeeded with {int} products, {int} customers and {int} orders")]
async fn sync_succeeded(world: &mut SyncWorld, products: usize, customers: usize, orders: usize) {
    let report = world.last_report.as_ref().expect("No sync was run");
    assert!(report.success, "Sync failed: {:?}", report.error);
    assert_eq!(report.counts.products, products);
    assert_eq!(report.counts.customers, customers);
    assert_eq!(report.counts.orders, orders);
}

#[then(expr = "the sync failed at the {word} stage after {int} products")]
async fn sync_failed(world: &mut SyncWorld, stage: String, products: usize) {
    let report = world.last_report.as_ref().expect("No sync was run");
    assert!(!report.success);
    assert_eq!(report.stage.map(|s| s.to_string()), Some(stage));
    assert_eq!(report.counts.products, products);
    assert_eq!(report.counts.orders, 0);
}

#[then(expr = "the sync reported {int} dropped line items")]
async fn dropped_items(world: &mut SyncWorld, dropped: usize) {
    let report = world.last_report.as_ref().expect("No sync was run");
    assert_eq!(report.counts.dropped_line_items, dropped);
}

//----------------------------------------------   Assertions  --------------------------------------------------
#[then(expr = "order {int} of '{word}' has a total of {word}")]
async fn order_total(world: &mut SyncWorld, order_id: i64, shop: String, total: String) {
    let order = fetch_order(world, &shop, order_id).await;
    assert_eq!(order.total_price, money(&total));
}

#[then(expr = "order {int} of '{word}' is not linked to a customer")]
async fn order_unlinked(world: &mut SyncWorld, order_id: i64, shop: String) {
    let order = fetch_order(world, &shop, order_id).await;
    assert_eq!(order.customer_id, None);
}

#[then(expr = "order {int} of '{word}' is linked to customer {int}")]
async fn order_linked(world: &mut SyncWorld, order_id: i64, shop: String, customer_id: i64) {
    let order = fetch_order(world, &shop, order_id).await;
    let tenant_id = world.tenant_id(&shop);
    let customer = world
        .db()
        .fetch_customer_by_external_id(tenant_id, &ExternalId::from(customer_id))
        .await
        .expect("Error fetching customer")
        .expect("Customer does not exist");
    assert_eq!(order.customer_id, Some(customer.id));
}

#[then(expr = "order {int} of '{word}' has {int} line items")]
async fn order_items(world: &mut SyncWorld, order_id: i64, shop: String, count: usize) {
    let order = fetch_order(world, &shop, order_id).await;
    let items = world.db().fetch_order_items(order.id).await.expect("Error fetching items");
    assert_eq!(items.len(), count);
}

#[then(expr = "'{word}' has {int} products")]
async fn product_count(world: &mut SyncWorld, shop: String, count: i64) {
    let tenant_id = world.tenant_id(&shop);
    let stored: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE tenant_id = $1")
        .bind(tenant_id)
        .fetch_one(world.db().pool())
        .await
        .expect("Error counting products");
    assert_eq!(stored, count);
}

#[then(expr = "'{word}' has {int} orders worth {word} in total")]
async fn order_summary(world: &mut SyncWorld, shop: String, count: i64, revenue: String) {
    let tenant_id = world.tenant_id(&shop);
    let summary = world.db().fetch_summary(tenant_id).await.expect("Error fetching summary");
    assert_eq!(summary.total_orders, count);
    assert_eq!(summary.total_revenue, money(&revenue));
}

#[then("orders were never fetched")]
async fn orders_not_synced(world: &mut SyncWorld) {
    let report = world.last_report.as_ref().expect("No sync was run");
    assert_ne!(report.stage, Some(SyncStage::Orders));
    assert_eq!(report.counts.line_items, 0);
}
