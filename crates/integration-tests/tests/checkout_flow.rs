//! Checkout: from the server-side cart to a placed order.

#![allow(clippy::unwrap_used)]

use rigshop_core::{PaymentMethod, ShippingAddress};
use rigshop_integration_tests::{TestShop, cart_line_json, ok, order_json};
use rigshop_storefront::StoreError;
use rigshop_storefront::checkout::CheckoutRequest;
use rust_decimal::Decimal;
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, ResponseTemplate};

fn request() -> CheckoutRequest {
    CheckoutRequest {
        shipping_address: ShippingAddress {
            full_name: " Tran Linh ".to_string(),
            phone: "0912 345 678".to_string(),
            address: "12 Hang Bai".to_string(),
            city: "Hanoi".to_string(),
            district: Some("Hoan Kiem".to_string()),
            ward: None,
        },
        payment_method: PaymentMethod::BankTransfer,
        notes: Some("   ".to_string()),
    }
}

async fn refuse_orders(shop: &TestShop) {
    Mock::given(method("POST"))
        .and(path("/orders"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&shop.server)
        .await;
}

#[tokio::test]
async fn empty_cart_is_refused_before_posting() {
    let shop = TestShop::signed_in().await;
    shop.serve("/cart", json!({ "items": [] })).await;
    refuse_orders(&shop).await;

    shop.storefront.cart().refresh_cart().await.unwrap();
    let err = shop
        .storefront
        .checkout()
        .place_order(request())
        .await
        .unwrap_err();

    assert_eq!(err, StoreError::Invalid("Your cart is empty".to_string()));
}

#[tokio::test]
async fn incomplete_address_is_refused_before_posting() {
    let shop = TestShop::signed_in().await;
    shop.serve("/cart", json!({ "items": [cart_line_json(1, 3, 750_000, 2)] }))
        .await;
    refuse_orders(&shop).await;

    shop.storefront.cart().refresh_cart().await.unwrap();

    let mut missing_city = request();
    missing_city.shipping_address.city = "  ".to_string();
    let err = shop
        .storefront
        .checkout()
        .place_order(missing_city)
        .await
        .unwrap_err();
    assert_eq!(err, StoreError::Invalid("City is required".to_string()));

    let mut bad_phone = request();
    bad_phone.shipping_address.phone = "call me".to_string();
    let err = shop
        .storefront
        .checkout()
        .place_order(bad_phone)
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Invalid(_)));

    // The cart is untouched by a refused checkout.
    assert_eq!(shop.storefront.cart().total_items().await, 2);
}

#[tokio::test]
async fn order_is_placed_and_cart_refreshed() {
    let shop = TestShop::signed_in().await;

    // First load shows the line; the server empties the cart once ordered.
    Mock::given(method("GET"))
        .and(path("/cart"))
        .respond_with(ok(json!({ "items": [cart_line_json(1, 3, 750_000, 2)] })))
        .up_to_n_times(1)
        .mount(&shop.server)
        .await;
    shop.serve("/cart", json!({ "items": [] })).await;

    Mock::given(method("POST"))
        .and(path("/orders"))
        .and(body_partial_json(json!({
            "payment_method": "bank_transfer",
            "shipping_address": {
                "full_name": "Tran Linh",
                "city": "Hanoi",
                "district": "Hoan Kiem",
            },
        })))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(json!({ "success": true, "data": { "order": order_json(41, "pending") } })),
        )
        .expect(1)
        .mount(&shop.server)
        .await;

    let cart = shop.storefront.cart();
    cart.refresh_cart().await.unwrap();
    assert_eq!(cart.total_price().await, Decimal::new(1_500_000, 0));

    let order = shop.storefront.checkout().place_order(request()).await.unwrap();

    assert_eq!(order.order_number, "RS-00041");
    assert!(order.status.can_cancel());
    assert_eq!(order.total_amount, Decimal::new(1_500_000, 0));
    assert_eq!(order.items_total(), order.total_amount);
    assert!(cart.is_empty().await);
}

#[tokio::test]
async fn rejected_order_keeps_server_message() {
    let shop = TestShop::signed_in().await;
    shop.serve("/cart", json!({ "items": [cart_line_json(1, 3, 750_000, 2)] }))
        .await;
    Mock::given(method("POST"))
        .and(path("/orders"))
        .respond_with(
            ResponseTemplate::new(422).set_body_json(json!({
                "success": false,
                "message": "Product 3 only has 1 left in stock",
            })),
        )
        .mount(&shop.server)
        .await;

    shop.storefront.cart().refresh_cart().await.unwrap();
    let err = shop
        .storefront
        .checkout()
        .place_order(request())
        .await
        .unwrap_err();

    assert_eq!(
        err,
        StoreError::Rejected("Product 3 only has 1 left in stock".to_string())
    );
    assert_eq!(shop.storefront.cart().total_items().await, 2);
}
