//! Integration tests for order placement and order history.

#![allow(clippy::unwrap_used)]

use apex_integration_tests::{TestContext, json_of, order_body};
use reqwest::StatusCode;
use serde_json::json;

// =============================================================================
// Placement
// =============================================================================

#[tokio::test]
async fn test_place_order_updates_stock_and_total() {
    let ctx = TestContext::new().await;
    let admin = ctx.admin_token().await;
    let product = ctx.create_product(&admin, "3200000", 5).await;
    let token = ctx.register("Linh", "a@x.com", "secret1").await;

    let response = ctx
        .post("/api/orders", Some(&token), &order_body(&[(product, "42", 2)]))
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let order_id = json_of(response).await["orderId"].as_i64().unwrap();

    assert_eq!(ctx.stock_of(product).await, 3);
    assert_eq!(ctx.count_rows("orders").await, 1);
    assert_eq!(ctx.count_rows("order_items").await, 1);

    let order = json_of(ctx.get(&format!("/api/orders/{order_id}"), Some(&token)).await).await;
    assert_eq!(order["total"], "6400000");
    assert_eq!(order["status"], "pending");
    assert_eq!(order["paymentMethod"], "cod");
    assert_eq!(order["shippingInfo"]["city"], "Ho Chi Minh City");
    assert_eq!(order["items"][0]["productId"], product);
    assert_eq!(order["items"][0]["quantity"], 2);
    assert_eq!(order["items"][0]["size"], "42");
    assert_eq!(order["items"][0]["price"], "3200000");
    assert_eq!(order["items"][0]["name"], "Apex Sneakers Runner Pro");
}

#[tokio::test]
async fn test_client_total_is_advisory() {
    let ctx = TestContext::new().await;
    let admin = ctx.admin_token().await;
    let product = ctx.create_product(&admin, "2500000", 5).await;
    let token = ctx.register("Linh", "a@x.com", "secret1").await;

    let mut body = order_body(&[(product, "40", 1)]);
    body["total"] = json!(1);
    let response = ctx.post("/api/orders", Some(&token), &body).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let order_id = json_of(response).await["orderId"].as_i64().unwrap();

    let order = json_of(ctx.get(&format!("/api/orders/{order_id}"), Some(&token)).await).await;
    assert_eq!(order["total"], "2500000");
}

#[tokio::test]
async fn test_unknown_product_changes_nothing() {
    let ctx = TestContext::new().await;
    let admin = ctx.admin_token().await;
    let product = ctx.create_product(&admin, "3200000", 5).await;
    let token = ctx.register("Linh", "a@x.com", "secret1").await;

    let response = ctx
        .post(
            "/api/orders",
            Some(&token),
            &order_body(&[(product, "40", 2), (9999, "40", 1)]),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(json_of(response).await["error"].is_string());

    assert_eq!(ctx.stock_of(product).await, 5);
    assert_eq!(ctx.count_rows("orders").await, 0);
    assert_eq!(ctx.count_rows("order_items").await, 0);
}

#[tokio::test]
async fn test_insufficient_stock_is_rejected() {
    let ctx = TestContext::new().await;
    let admin = ctx.admin_token().await;
    let product = ctx.create_product(&admin, "3200000", 1).await;
    let token = ctx.register("Linh", "a@x.com", "secret1").await;

    let response = ctx
        .post("/api/orders", Some(&token), &order_body(&[(product, "40", 2)]))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(ctx.stock_of(product).await, 1);
    assert_eq!(ctx.count_rows("orders").await, 0);
}

#[tokio::test]
async fn test_malformed_orders_are_rejected() {
    let ctx = TestContext::new().await;
    let admin = ctx.admin_token().await;
    let product = ctx.create_product(&admin, "3200000", 5).await;
    let token = ctx.register("Linh", "a@x.com", "secret1").await;

    let mut missing_city = order_body(&[(product, "40", 1)]);
    missing_city["shippingInfo"]["city"] = json!("");
    let mut bad_payment = order_body(&[(product, "40", 1)]);
    bad_payment["paymentMethod"] = json!("bitcoin");

    for body in [
        order_body(&[]),
        order_body(&[(product, "40", 0)]),
        order_body(&[(product, "47", 1)]),
        missing_city,
        bad_payment,
        json!({ "items": [] }),
    ] {
        let response = ctx.post("/api/orders", Some(&token), &body).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{body}");
    }
    assert_eq!(ctx.stock_of(product).await, 5);
    assert_eq!(ctx.count_rows("orders").await, 0);
}

#[tokio::test]
async fn test_order_requires_token() {
    let ctx = TestContext::new().await;

    let response = ctx.post("/api/orders", None, &order_body(&[(1, "40", 1)])).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// =============================================================================
// History
// =============================================================================

#[tokio::test]
async fn test_order_visibility() {
    let ctx = TestContext::new().await;
    let admin = ctx.admin_token().await;
    let product = ctx.create_product(&admin, "100", 10).await;
    let alice = ctx.register("Alice", "alice@x.com", "secret1").await;
    let bob = ctx.register("Bob", "bob@x.com", "secret1").await;

    let response = ctx
        .post("/api/orders", Some(&alice), &order_body(&[(product, "40", 1)]))
        .await;
    let alices = json_of(response).await["orderId"].as_i64().unwrap();
    let response = ctx
        .post("/api/orders", Some(&bob), &order_body(&[(product, "41", 1)]))
        .await;
    let bobs = json_of(response).await["orderId"].as_i64().unwrap();

    let own = json_of(ctx.get("/api/orders", Some(&alice)).await).await;
    let own = own.as_array().unwrap();
    assert_eq!(own.len(), 1);
    assert_eq!(own[0]["id"], alices);

    let all = json_of(ctx.get("/api/orders", Some(&admin)).await).await;
    assert_eq!(all.as_array().unwrap().len(), 2);

    let response = ctx.get(&format!("/api/orders/{bobs}"), Some(&alice)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = ctx.get(&format!("/api/orders/{bobs}"), Some(&admin)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = ctx.get("/api/orders/424242", Some(&admin)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
