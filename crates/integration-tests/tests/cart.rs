//! Cart endpoints.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use reqwest::StatusCode;
use serde_json::{Value, json};
use vitrine_core::ProductId;
use vitrine_integration_tests::{MALFORMED_PRODUCT_ID, TestContext};

#[tokio::test]
async fn test_empty_cart() {
    let ctx = TestContext::spawn().await;
    let cart: Value = ctx
        .client
        .get(ctx.url("/cart"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(cart["items"], json!([]));
    assert_eq!(cart["total"], 0.0);
    assert_eq!(cart["totalItems"], 0);
    assert_eq!(cart["formattedTotal"], "R$ 0,00");
}

#[tokio::test]
async fn test_add_same_product_twice_merges_lines() {
    let ctx = TestContext::spawn().await;
    ctx.add_to_cart(1, 1).await;
    let cart = ctx.add_to_cart(1, 2).await;

    assert_eq!(cart["items"].as_array().unwrap().len(), 1);
    assert_eq!(cart["items"][0]["quantity"], 3);
    assert_eq!(cart["totalItems"], 3);
    assert_eq!(cart["formattedTotal"], "R$ 329,85");
}

#[tokio::test]
async fn test_add_defaults_to_one_unit() {
    let ctx = TestContext::spawn().await;
    let cart: Value = ctx
        .client
        .post(ctx.url("/cart/items"))
        .json(&json!({ "product_id": 4 }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(cart["totalItems"], 1);
    assert_eq!(cart["total"], 55.99);
}

#[tokio::test]
async fn test_add_rejects_zero_quantity() {
    let ctx = TestContext::spawn().await;
    let response = ctx
        .client
        .post(ctx.url("/cart/items"))
        .json(&json!({ "product_id": 1, "quantity": 0 }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(ctx.state.cart().cart().is_empty());
}

#[tokio::test]
async fn test_add_unknown_product_leaves_cart_unchanged() {
    let ctx = TestContext::spawn().await;
    let response = ctx
        .client
        .post(ctx.url("/cart/items"))
        .json(&json!({ "product_id": 99 }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(ctx.state.cart().cart().is_empty());
}

#[tokio::test]
async fn test_add_malformed_product_is_bad_gateway() {
    let ctx = TestContext::spawn().await;
    ctx.add_to_cart(1, 1).await;

    let response = ctx
        .client
        .post(ctx.url("/cart/items"))
        .json(&json!({ "product_id": MALFORMED_PRODUCT_ID }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "External service error");

    let cart = ctx.state.cart().cart();
    assert_eq!(cart.len(), 1);
    assert_eq!(cart.total_items(), 1);
}

#[tokio::test]
async fn test_item_status() {
    let ctx = TestContext::spawn().await;
    ctx.add_to_cart(2, 2).await;

    let item: Value = ctx
        .client
        .get(ctx.url("/cart/items/2"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(item, json!({ "product_id": 2, "quantity": 2, "in_cart": true }));

    let item: Value = ctx
        .client
        .get(ctx.url("/cart/items/3"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(item, json!({ "product_id": 3, "quantity": 0, "in_cart": false }));
}

#[tokio::test]
async fn test_update_absolute_and_relative() {
    let ctx = TestContext::spawn().await;
    ctx.add_to_cart(1, 2).await;

    let cart: Value = ctx
        .client
        .patch(ctx.url("/cart/items/1"))
        .json(&json!({ "quantity": 5 }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(cart["totalItems"], 5);

    let cart: Value = ctx
        .client
        .patch(ctx.url("/cart/items/1"))
        .json(&json!({ "delta": -1 }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(cart["totalItems"], 4);
}

#[tokio::test]
async fn test_update_to_zero_removes_line() {
    let ctx = TestContext::spawn().await;
    ctx.add_to_cart(1, 2).await;
    ctx.add_to_cart(3, 1).await;

    let cart: Value = ctx
        .client
        .patch(ctx.url("/cart/items/1"))
        .json(&json!({ "quantity": 0 }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(cart["items"].as_array().unwrap().len(), 1);
    assert_eq!(cart["items"][0]["id"], 3);
    assert_eq!(cart["total"], 109.0);
}

#[tokio::test]
async fn test_update_requires_exactly_one_field() {
    let ctx = TestContext::spawn().await;
    ctx.add_to_cart(1, 1).await;

    for body in [json!({}), json!({ "quantity": 2, "delta": 1 })] {
        let response = ctx
            .client
            .patch(ctx.url("/cart/items/1"))
            .json(&body)
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
    assert_eq!(ctx.state.cart().item_quantity(ProductId::new(1)), 1);
}

#[tokio::test]
async fn test_remove_and_clear() {
    let ctx = TestContext::spawn().await;
    ctx.add_to_cart(1, 1).await;
    ctx.add_to_cart(2, 1).await;

    let cart: Value = ctx
        .client
        .delete(ctx.url("/cart/items/1"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(cart["totalItems"], 1);

    // Removing an absent line is a no-op
    let response = ctx
        .client
        .delete(ctx.url("/cart/items/1"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let cart: Value = ctx
        .client
        .delete(ctx.url("/cart"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(cart["items"], json!([]));
    assert_eq!(cart["total"], 0.0);
}
