//! Request shape and status pass-through of `ApiClient`.

use rigshop_core::{CategoryId, ProductId};
use rigshop_storefront::StoreError;
use rigshop_storefront::api::{ApiError, ProductQuery, ProductSort};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

use crate::common::{TOKEN, setup};

#[tokio::test]
async fn bearer_token_is_attached() {
    let (server, storefront) = setup(Some(TOKEN)).await;

    Mock::given(method("GET"))
        .and(path("/cart"))
        .and(header("Authorization", format!("Bearer {TOKEN}").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let items = storefront.api().get_cart().await.expect("get_cart failed");
    assert!(items.is_empty());
}

#[tokio::test]
async fn add_cart_item_sends_json_body() {
    let (server, storefront) = setup(Some(TOKEN)).await;

    Mock::given(method("POST"))
        .and(path("/cart/items"))
        .and(body_json(json!({"product_id": 42, "quantity": 3})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"success": true})))
        .expect(1)
        .mount(&server)
        .await;

    storefront
        .api()
        .add_cart_item(ProductId::new(42), 3)
        .await
        .expect("add_cart_item failed");
}

#[tokio::test]
async fn error_message_is_passed_through() {
    let (server, storefront) = setup(Some(TOKEN)).await;

    Mock::given(method("POST"))
        .and(path("/cart/items"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({"message": "Only 2 left in stock"})),
        )
        .mount(&server)
        .await;

    let err = storefront
        .api()
        .add_cart_item(ProductId::new(1), 5)
        .await
        .expect_err("should be rejected");
    assert!(matches!(
        err,
        ApiError::Api { status: 400, ref message } if message == "Only 2 left in stock"
    ));
    assert_eq!(
        StoreError::from(err),
        StoreError::Rejected("Only 2 left in stock".to_string())
    );
}

#[tokio::test]
async fn unauthorized_statuses_are_distinguished() {
    let (server, storefront) = setup(Some(TOKEN)).await;

    Mock::given(method("GET"))
        .and(path("/cart"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({"error": "Forbidden"})))
        .mount(&server)
        .await;

    let err = storefront.api().get_cart().await.expect_err("should fail");
    assert!(matches!(err, ApiError::Unauthorized { status: 403 }));
}

#[tokio::test]
async fn success_false_is_an_error() {
    let (server, storefront) = setup(Some(TOKEN)).await;

    Mock::given(method("DELETE"))
        .and(path("/cart"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"success": false, "message": "Cart is locked"})),
        )
        .mount(&server)
        .await;

    let err = storefront.api().clear_cart().await.expect_err("should fail");
    assert!(matches!(err, ApiError::Api { ref message, .. } if message == "Cart is locked"));
}

#[tokio::test]
async fn product_listing_sends_filters_and_normalizes() {
    let (server, storefront) = setup(None).await;

    Mock::given(method("GET"))
        .and(path("/products"))
        .and(query_param("page", "2"))
        .and(query_param("category", "3"))
        .and(query_param("sort", "price_asc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {
                "products": [{
                    "id": "11",
                    "name": "Ryzen 7 7800X3D",
                    "price": "10990000",
                    "images": "[\"/uploads/7800x3d.jpg\"]",
                    "specifications": "{\"Socket\": \"AM5\"}"
                }],
                "pagination": {"page": 2, "limit": 12, "total": 13}
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let query = ProductQuery::new()
        .page(2)
        .category(CategoryId::new(3))
        .sort(ProductSort::PriceAsc);
    let page = storefront
        .api()
        .list_products(&query)
        .await
        .expect("list_products failed");

    assert_eq!(page.pagination.total_pages, 2);
    let product = &page.products[0];
    assert_eq!(product.id, ProductId::new(11));
    assert_eq!(
        product.images,
        vec![format!("{}/uploads/7800x3d.jpg", server.uri())]
    );
    assert_eq!(product.specification("socket"), Some("AM5"));
}

#[tokio::test]
async fn missing_product_is_not_found() {
    let (server, storefront) = setup(None).await;

    Mock::given(method("GET"))
        .and(path("/products/999"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({"message": "Product not found"})),
        )
        .mount(&server)
        .await;

    let err = storefront
        .catalog()
        .product(ProductId::new(999))
        .await
        .expect_err("should be missing");
    assert_eq!(err, StoreError::NotFound("Product not found".to_string()));
}

#[tokio::test]
async fn enveloped_listing_keeps_pagination() {
    let (server, storefront) = setup(None).await;

    Mock::given(method("GET"))
        .and(path("/products"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": [
                {"id": 1, "name": "Ryzen 5 7600", "price": 5490000},
                {"id": 2, "name": "Ryzen 7 7700", "price": 7990000}
            ],
            "pagination": {"page": 1, "limit": 2, "total": 10, "totalPages": 5}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let page = storefront
        .catalog()
        .list_products(&ProductQuery::new())
        .await
        .expect("list_products failed");

    assert_eq!(page.products.len(), 2);
    assert_eq!(page.pagination.total, 10);
    assert_eq!(page.pagination.total_pages, 5);
    assert!(page.pagination.has_next());
}

#[tokio::test]
async fn slug_is_escaped_as_a_path_segment() {
    let (server, storefront) = setup(None).await;

    Mock::given(method("GET"))
        .and(path("/products/slug/rtx%204070%2Fti"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "product": {"id": 5, "name": "RTX 4070 Ti", "slug": "rtx-4070-ti", "price": 19990000}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let product = storefront
        .api()
        .get_product_by_slug("rtx 4070/ti")
        .await
        .expect("get_product_by_slug failed");
    assert_eq!(product.id, ProductId::new(5));
}
