//! Catalog scenarios: caching behavior, search delegation, and the local
//! filter/sort/paginate fallback over an over-fetched page.

use saltbox_client::{CommerceError, QuerySpec, SortField, SortOrder};
use saltbox_integration_tests::{
    ITEMS_QUERY_PATH, item_json, items_body, no_cache, test_client, test_client_with,
};

fn fixture() -> String {
    items_body(&[
        item_json("item-1", "Walnut Desk", "450.00", true),
        item_json("item-2", "alder shelf", "85.00", true),
        item_json("item-3", "Birch Stool", "60.00", false),
        item_json("item-4", "Cedar Bench", "120.00", true),
        item_json("item-5", "oak table", "320.00", true),
    ])
}

#[tokio::test]
async fn repeated_basic_query_hits_network_once() {
    let t = test_client();
    t.transport.respond(ITEMS_QUERY_PATH, 200, fixture()).await;

    let spec = QuerySpec::with_limit(20).filtered("visible:true");
    let first = t.client.catalog().query(&spec).await.expect("first");
    let second = t.client.catalog().query(&spec).await.expect("second");

    assert_eq!(first, second);
    assert_eq!(first.items.len(), 4);
    assert_eq!(t.transport.calls_to(ITEMS_QUERY_PATH).await, 1);
}

#[tokio::test]
async fn zero_cache_duration_refetches_every_time() {
    let t = test_client_with(no_cache);
    t.transport.respond(ITEMS_QUERY_PATH, 200, fixture()).await;

    let spec = QuerySpec::with_limit(20);
    t.client.catalog().query(&spec).await.expect("first");
    t.client.catalog().query(&spec).await.expect("second");

    assert_eq!(t.transport.calls_to(ITEMS_QUERY_PATH).await, 2);
}

#[tokio::test]
async fn refresh_drops_cached_pages() {
    let t = test_client();
    t.transport.respond(ITEMS_QUERY_PATH, 200, fixture()).await;

    let spec = QuerySpec::with_limit(20);
    t.client.catalog().query(&spec).await.expect("first");
    t.client.catalog().refresh().await;
    t.client.catalog().query(&spec).await.expect("second");

    assert_eq!(t.transport.calls_to(ITEMS_QUERY_PATH).await, 2);
}

#[tokio::test]
async fn search_always_delegates_upstream() {
    let t = test_client();
    t.transport.respond(ITEMS_QUERY_PATH, 200, fixture()).await;

    let spec = QuerySpec::with_limit(20).searching("shelf");
    t.client.catalog().query(&spec).await.expect("first");
    t.client.catalog().query(&spec).await.expect("second");

    // Search results are never cached.
    assert_eq!(t.transport.calls_to(ITEMS_QUERY_PATH).await, 2);
}

#[tokio::test]
async fn availability_filter_drops_out_of_stock_items() {
    let t = test_client();
    t.transport.respond(ITEMS_QUERY_PATH, 200, fixture()).await;

    let spec = QuerySpec::with_limit(20).filtered("inStock:true");
    let page = t.client.catalog().query(&spec).await.expect("query");

    assert_eq!(page.total_count, 4);
    assert!(page.items.iter().all(|item| item.id != "item-3"));
}

#[tokio::test]
async fn malformed_filter_clause_is_dropped_not_fatal() {
    let t = test_client();
    t.transport.respond(ITEMS_QUERY_PATH, 200, fixture()).await;

    let spec = QuerySpec::with_limit(20).filtered("price>100");
    let page = t.client.catalog().query(&spec).await.expect("query");

    assert_eq!(page.items.len(), 5);
}

#[tokio::test]
async fn sorts_by_price_descending() {
    let t = test_client();
    t.transport.respond(ITEMS_QUERY_PATH, 200, fixture()).await;

    let spec =
        QuerySpec::with_limit(20).sorted(SortField::Price, SortOrder::Descending);
    let page = t.client.catalog().query(&spec).await.expect("query");

    let ids: Vec<&str> = page.items.iter().map(|i| i.id.as_str()).collect();
    assert_eq!(ids, ["item-1", "item-5", "item-4", "item-2", "item-3"]);
}

#[tokio::test]
async fn sorts_by_name_case_insensitively() {
    let t = test_client();
    t.transport.respond(ITEMS_QUERY_PATH, 200, fixture()).await;

    let spec = QuerySpec::with_limit(20).sorted(SortField::Name, SortOrder::Ascending);
    let page = t.client.catalog().query(&spec).await.expect("query");

    let names: Vec<&str> = page.items.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(
        names,
        ["alder shelf", "Birch Stool", "Cedar Bench", "oak table", "Walnut Desk"]
    );
}

#[tokio::test]
async fn paginates_after_sorting() {
    let t = test_client();
    t.transport.respond(ITEMS_QUERY_PATH, 200, fixture()).await;

    let spec = QuerySpec::with_limit(2)
        .sorted(SortField::Name, SortOrder::Ascending)
        .starting_at(2);
    let page = t.client.catalog().query(&spec).await.expect("query");

    let names: Vec<&str> = page.items.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(names, ["Cedar Bench", "oak table"]);
    assert_eq!(page.total_count, 5);
    assert!(page.has_more);

    let last = t
        .client
        .catalog()
        .query(&QuerySpec::with_limit(2).starting_at(4))
        .await
        .expect("last page");
    assert_eq!(last.items.len(), 1);
    assert!(!last.has_more);
}

#[tokio::test]
async fn category_filter_uses_membership() {
    let t = test_client();
    let body = items_body(&[
        serde_json::json!({
            "id": "item-1",
            "name": "Walnut Desk",
            "price": {"amount": "450.00", "currency": "USD"},
            "stock": {"inStock": true},
            "categoryIds": ["office"],
        }),
        serde_json::json!({
            "id": "item-2",
            "name": "Cedar Bench",
            "price": {"amount": "120.00", "currency": "USD"},
            "stock": {"inStock": true},
            "categoryIds": ["outdoor"],
        }),
    ]);
    t.transport.respond(ITEMS_QUERY_PATH, 200, body).await;

    let page = t
        .client
        .catalog()
        .query(&QuerySpec::with_limit(20).in_category("office"))
        .await
        .expect("query");
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].id, "item-1");

    // The sentinel category matches everything.
    let all = t
        .client
        .catalog()
        .query(&QuerySpec::with_limit(20).in_category("all-items"))
        .await
        .expect("query");
    assert_eq!(all.items.len(), 2);
}

#[tokio::test]
async fn single_item_is_cached_per_id() {
    let t = test_client();
    t.transport
        .respond(
            "catalog/items/item-1",
            200,
            serde_json::json!({"item": item_json("item-1", "Walnut Desk", "450.00", true)})
                .to_string(),
        )
        .await;

    let first = t.client.catalog().item("item-1").await.expect("first");
    let second = t.client.catalog().item("item-1").await.expect("second");

    assert_eq!(first, second);
    assert_eq!(first.price.minor_units, 45000);
    assert_eq!(t.transport.calls_to("catalog/items/item-1").await, 1);
}

#[tokio::test]
async fn missing_item_is_not_found() {
    let t = test_client();
    t.transport
        .respond("catalog/items/gone", 404, r#"{"code": "NOT_FOUND"}"#)
        .await;

    let err = t.client.catalog().item("gone").await.expect_err("absent item");
    assert!(matches!(err, CommerceError::NotFound(_)));
}

#[tokio::test]
async fn categories_are_cached() {
    let t = test_client();
    t.transport
        .respond(
            "catalog/categories/query",
            200,
            r#"{"categories": [
                {"id": "office", "name": "Office"},
                {"id": "outdoor", "name": "Outdoor", "visible": false}
            ]}"#,
        )
        .await;

    let first = t.client.catalog().categories().await.expect("first");
    let second = t.client.catalog().categories().await.expect("second");

    assert_eq!(first, second);
    assert_eq!(first.len(), 2);
    assert_eq!(first[0].name, "Office");
    assert!(!first[1].visible);
    assert_eq!(t.transport.calls_to("catalog/categories/query").await, 1);
}

#[tokio::test]
async fn upstream_failure_propagates() {
    let t = test_client();
    t.transport
        .respond(ITEMS_QUERY_PATH, 502, r#"{"message": "bad gateway"}"#)
        .await;

    let err = t
        .client
        .catalog()
        .query(&QuerySpec::with_limit(20))
        .await
        .expect_err("upstream failure");
    assert!(matches!(err, CommerceError::Upstream { status: 502, .. }));
}
