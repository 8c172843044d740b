//! Integration tests for the product catalog API.

#![allow(clippy::unwrap_used)]

use apex_integration_tests::{TestContext, json_of};
use reqwest::{Method, StatusCode};
use serde_json::json;

// =============================================================================
// Public Reads
// =============================================================================

#[tokio::test]
async fn test_empty_catalog() {
    let ctx = TestContext::new().await;

    let response = ctx.get("/api/products", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_of(response).await, json!([]));
}

#[tokio::test]
async fn test_product_shape_and_repeatable_read() {
    let ctx = TestContext::new().await;
    let admin = ctx.admin_token().await;
    let id = ctx.create_product(&admin, "3200000", 5).await;

    let first = json_of(ctx.get(&format!("/api/products/{id}"), None).await).await;
    let second = json_of(ctx.get(&format!("/api/products/{id}"), None).await).await;
    assert_eq!(first, second);

    assert_eq!(first["id"], id);
    assert_eq!(first["name"], "Apex Sneakers Runner Pro");
    assert_eq!(first["price"], "3200000");
    assert_eq!(first["stock"], 5);
    assert_eq!(first["sizes"], json!(["40", "41", "42"]));
    assert_eq!(first["featured"], false);

    let list = json_of(ctx.get("/api/products", None).await).await;
    assert_eq!(list, json!([first]));
}

#[tokio::test]
async fn test_missing_product_is_not_found() {
    let ctx = TestContext::new().await;

    let response = ctx.get("/api/products/999", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(json_of(response).await["error"].is_string());
}

// =============================================================================
// Admin Writes
// =============================================================================

#[tokio::test]
async fn test_update_replaces_product() {
    let ctx = TestContext::new().await;
    let admin = ctx.admin_token().await;
    let id = ctx.create_product(&admin, "3200000", 5).await;

    let response = ctx
        .send_json(
            Method::PUT,
            &format!("/api/products/{id}"),
            Some(&admin),
            &json!({
                "name": "Apex Sneakers Kyrie",
                "price": 3_800_000,
                "stock": 15,
                "sizes": ["41", "42", "43", "44"],
                "featured": true,
            }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let product = json_of(ctx.get(&format!("/api/products/{id}"), None).await).await;
    assert_eq!(product["name"], "Apex Sneakers Kyrie");
    assert_eq!(product["price"], "3800000");
    assert_eq!(product["description"], "");
    assert_eq!(product["stock"], 15);
    assert_eq!(product["featured"], true);
}

#[tokio::test]
async fn test_delete_product() {
    let ctx = TestContext::new().await;
    let admin = ctx.admin_token().await;
    let id = ctx.create_product(&admin, "3200000", 5).await;

    let response = ctx
        .client
        .delete(ctx.url(&format!("/api/products/{id}")))
        .bearer_auth(&admin)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = ctx.get(&format!("/api/products/{id}"), None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = ctx
        .client
        .delete(ctx.url(&format!("/api/products/{id}")))
        .bearer_auth(&admin)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_invalid_product_payloads() {
    let ctx = TestContext::new().await;
    let admin = ctx.admin_token().await;

    for body in [
        json!({ "name": "", "price": "100", "stock": 1, "sizes": ["40"] }),
        json!({ "name": "Shoe", "price": "0", "stock": 1, "sizes": ["40"] }),
        json!({ "name": "Shoe", "price": "-5", "stock": 1, "sizes": ["40"] }),
        json!({ "name": "Shoe", "price": "100", "stock": -1, "sizes": ["40"] }),
        json!({ "name": "Shoe", "price": "100", "stock": 1, "sizes": [] }),
        json!({ "name": "Shoe", "price": "100", "stock": 1, "sizes": ["40", "40"] }),
        json!({ "name": "Shoe", "stock": 1, "sizes": ["40"] }),
    ] {
        let response = ctx.post("/api/products", Some(&admin), &body).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{body}");
    }
    assert_eq!(ctx.count_rows("products").await, 0);
}
