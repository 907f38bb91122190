//! Cart synchronization: every mutation is followed by a full refresh.

use rigshop_core::{CartItemId, ProductId};
use rigshop_storefront::StoreError;
use rust_decimal::Decimal;
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, ResponseTemplate};

use crate::common::{TOKEN, cart_body, mount_cart, setup};

#[tokio::test]
async fn refresh_replaces_items_and_totals() {
    let (server, storefront) = setup(Some(TOKEN)).await;
    mount_cart(
        &server,
        cart_body(json!([
            {"id": 1, "product_id": 10, "name": "DDR5 32GB", "price": 1000, "quantity": 2},
            {"id": 2, "product_id": 11, "name": "NVMe 2TB", "price": "500", "quantity": "1"}
        ])),
    )
    .await;

    let cart = storefront.cart();
    cart.refresh_cart().await.expect("refresh failed");

    assert_eq!(cart.items().await.len(), 2);
    assert_eq!(cart.total_price().await, Decimal::from(2500));
    assert_eq!(cart.total_items().await, 3);
}

#[tokio::test]
async fn refresh_without_token_sends_nothing() {
    let (server, storefront) = setup(None).await;

    Mock::given(method("GET"))
        .and(path("/cart"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&server)
        .await;

    storefront.cart().refresh_cart().await.expect("refresh failed");
    assert!(storefront.cart().is_empty().await);
}

#[tokio::test]
async fn add_posts_then_refreshes() {
    let (server, storefront) = setup(Some(TOKEN)).await;

    Mock::given(method("POST"))
        .and(path("/cart/items"))
        .and(body_json(json!({"product_id": 7, "quantity": 2})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"success": true})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/cart"))
        .respond_with(ResponseTemplate::new(200).set_body_json(cart_body(json!([
            {"id": 5, "product_id": 7, "name": "RTX 4070", "price": "15990000", "quantity": 2}
        ]))))
        .expect(1)
        .mount(&server)
        .await;

    let cart = storefront.cart();
    cart.add_to_cart(ProductId::new(7), 2).await.expect("add failed");

    let items = cart.items().await;
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].id, CartItemId::new(5));
    assert_eq!(cart.total_price().await, Decimal::from(31_980_000));
}

#[tokio::test]
async fn rejected_add_still_refreshes_and_reports_message() {
    let (server, storefront) = setup(Some(TOKEN)).await;

    Mock::given(method("POST"))
        .and(path("/cart/items"))
        .respond_with(
            ResponseTemplate::new(422).set_body_json(json!({"message": "Only 1 left in stock"})),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/cart"))
        .respond_with(ResponseTemplate::new(200).set_body_json(cart_body(json!([
            {"id": 9, "product_id": 3, "price": 100, "quantity": 1}
        ]))))
        .expect(1)
        .mount(&server)
        .await;

    let cart = storefront.cart();
    let err = cart
        .add_to_cart(ProductId::new(3), 5)
        .await
        .expect_err("should be rejected");

    assert_eq!(err, StoreError::Rejected("Only 1 left in stock".to_string()));
    assert_eq!(cart.total_items().await, 1);
}

#[tokio::test]
async fn update_to_zero_or_negative_removes() {
    for quantity in [0_i64, -1] {
        let (server, storefront) = setup(Some(TOKEN)).await;

        Mock::given(method("DELETE"))
            .and(path("/cart/items/4"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path("/cart/items/4"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;
        mount_cart(&server, json!({"items": []})).await;

        storefront
            .cart()
            .update_quantity(CartItemId::new(4), quantity)
            .await
            .expect("update failed");
        assert!(storefront.cart().is_empty().await);
    }
}

#[tokio::test]
async fn update_sends_new_quantity() {
    let (server, storefront) = setup(Some(TOKEN)).await;

    Mock::given(method("PUT"))
        .and(path("/cart/items/4"))
        .and(body_json(json!({"quantity": 3})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(1)
        .mount(&server)
        .await;
    mount_cart(
        &server,
        json!([{"id": 4, "product_id": 2, "price": 250, "quantity": 3}]),
    )
    .await;

    let cart = storefront.cart();
    cart.update_quantity(CartItemId::new(4), 3)
        .await
        .expect("update failed");
    assert_eq!(cart.total_price().await, Decimal::from(750));
}

#[tokio::test]
async fn clear_empties_cart() {
    let (server, storefront) = setup(Some(TOKEN)).await;

    Mock::given(method("DELETE"))
        .and(path("/cart"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(1)
        .mount(&server)
        .await;
    mount_cart(&server, cart_body(json!([]))).await;

    storefront.cart().clear_cart().await.expect("clear failed");
    assert!(storefront.cart().is_empty().await);
}

#[tokio::test]
async fn expired_session_empties_cart() {
    let (server, storefront) = setup(Some(TOKEN)).await;

    Mock::given(method("GET"))
        .and(path("/cart"))
        .respond_with(ResponseTemplate::new(200).set_body_json(cart_body(json!([
            {"id": 1, "product_id": 1, "price": 10, "quantity": 1}
        ]))))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/cart"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let cart = storefront.cart();
    cart.refresh_cart().await.expect("first refresh failed");
    assert_eq!(cart.total_items().await, 1);

    let err = cart.refresh_cart().await.expect_err("second refresh should fail");
    assert_eq!(err, StoreError::SessionExpired);
    assert!(cart.is_empty().await);
}
