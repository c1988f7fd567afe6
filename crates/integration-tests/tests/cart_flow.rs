//! Cart scenarios: expected absence, add/update/remove routing, and
//! upstream failure propagation.

use saltbox_client::{CommerceError, NewCartLine};
use saltbox_integration_tests::test_client;

const CART_PATH: &str = "cart/current";
const CART_ADD_PATH: &str = "cart/current/add";
const CART_UPDATE_PATH: &str = "cart/current/update";
const CART_REMOVE_PATH: &str = "cart/current/remove";

fn cart_body(lines: serde_json::Value) -> String {
    serde_json::json!({
        "cart": {
            "id": "cart-1",
            "currency": "USD",
            "subtotal": {"amount": "25.00"},
            "lines": lines,
        }
    })
    .to_string()
}

fn one_line() -> serde_json::Value {
    serde_json::json!([
        {
            "id": "line-1",
            "catalogItemId": "item-1",
            "quantity": 2,
            "price": {"amount": "12.50"},
        }
    ])
}

#[tokio::test]
async fn missing_cart_reads_as_none() {
    let t = test_client();
    t.transport
        .respond(CART_PATH, 404, r#"{"code": "CART_NOT_FOUND"}"#)
        .await;

    let cart = t.client.cart().current().await.expect("absence is not an error");
    assert!(cart.is_none());
}

#[tokio::test]
async fn reads_current_cart() {
    let t = test_client();
    t.transport.respond(CART_PATH, 200, cart_body(one_line())).await;

    let cart = t.client.cart().current().await.expect("read").expect("cart");
    assert_eq!(cart.id, "cart-1");
    assert_eq!(cart.total_quantity(), 2);
    assert_eq!(cart.subtotal.as_ref().map(|p| p.minor_units), Some(2500));
}

#[tokio::test]
async fn add_returns_the_updated_cart() {
    let t = test_client();
    t.transport.respond(CART_ADD_PATH, 200, cart_body(one_line())).await;

    let cart = t
        .client
        .cart()
        .add(vec![NewCartLine::new("item-1", 2)])
        .await
        .expect("add");

    assert_eq!(cart.lines.len(), 1);
    let line = &cart.lines[0];
    assert_eq!(line.catalog_item_id, "item-1");
    assert_eq!(line.unit_price.minor_units, 1250);
    assert_eq!(t.transport.calls_to(CART_ADD_PATH).await, 1);
}

#[tokio::test]
async fn positive_quantity_routes_to_update() {
    let t = test_client();
    t.transport
        .respond(CART_UPDATE_PATH, 200, cart_body(one_line()))
        .await;

    t.client
        .cart()
        .update_quantity("line-1", 3)
        .await
        .expect("update");

    assert_eq!(t.transport.calls_to(CART_UPDATE_PATH).await, 1);
    assert_eq!(t.transport.calls_to(CART_REMOVE_PATH).await, 0);
}

#[tokio::test]
async fn zero_quantity_routes_to_remove() {
    let t = test_client();
    t.transport
        .respond(CART_REMOVE_PATH, 200, cart_body(serde_json::json!([])))
        .await;

    let cart = t
        .client
        .cart()
        .update_quantity("line-1", 0)
        .await
        .expect("removal");

    assert!(cart.lines.is_empty());
    assert_eq!(t.transport.calls_to(CART_REMOVE_PATH).await, 1);
    assert_eq!(t.transport.calls_to(CART_UPDATE_PATH).await, 0);
}

#[tokio::test]
async fn remove_accepts_multiple_line_ids() {
    let t = test_client();
    t.transport
        .respond(CART_REMOVE_PATH, 200, cart_body(serde_json::json!([])))
        .await;

    let cart = t
        .client
        .cart()
        .remove(&["line-1".to_string(), "line-2".to_string()])
        .await
        .expect("remove");

    assert!(cart.lines.is_empty());
}

#[tokio::test]
async fn mutation_failure_propagates() {
    let t = test_client();
    t.transport
        .respond(CART_ADD_PATH, 500, r#"{"message": "inventory service down"}"#)
        .await;

    let err = t
        .client
        .cart()
        .add(vec![NewCartLine::new("item-1", 1)])
        .await
        .expect_err("upstream failure");
    assert!(matches!(err, CommerceError::Upstream { status: 500, .. }));
}

#[tokio::test]
async fn cart_operations_are_never_cached() {
    let t = test_client();
    t.transport.respond(CART_PATH, 200, cart_body(one_line())).await;

    t.client.cart().current().await.expect("first");
    t.client.cart().current().await.expect("second");

    assert_eq!(t.transport.calls_to(CART_PATH).await, 2);
}
