//! Which catalog reads are answered from the cache.

#![allow(clippy::unwrap_used)]

use rigshop_core::ProductId;
use rigshop_integration_tests::{TestShop, ok, product_json};
use rigshop_storefront::StoreError;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn product_is_fetched_once_and_shared_with_slug_lookup() {
    let shop = TestShop::signed_out().await;
    Mock::given(method("GET"))
        .and(path("/products/5"))
        .respond_with(ok(json!({ "product": product_json(5, "rtx-4070", "15990000") })))
        .expect(1)
        .mount(&shop.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/products/slug/rtx-4070"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&shop.server)
        .await;

    let catalog = shop.storefront.catalog();
    let first = catalog.product(ProductId::new(5)).await.unwrap();
    let second = catalog.product(ProductId::new(5)).await.unwrap();
    let by_slug = catalog.product_by_reference("rtx-4070").await.unwrap();

    assert_eq!(first, second);
    assert_eq!(by_slug.id, ProductId::new(5));
    let image = first.primary_image().unwrap();
    assert!(image.starts_with(&shop.server.uri()));
    assert!(image.ends_with("/uploads/rtx-4070.jpg"));
}

#[tokio::test]
async fn invalidated_product_is_fetched_again() {
    let shop = TestShop::signed_out().await;
    Mock::given(method("GET"))
        .and(path("/products/5"))
        .respond_with(ok(product_json(5, "rtx-4070", "15990000")))
        .expect(2)
        .mount(&shop.server)
        .await;

    let catalog = shop.storefront.catalog();
    catalog.product(ProductId::new(5)).await.unwrap();
    catalog.invalidate_product(ProductId::new(5)).await;
    catalog.product(ProductId::new(5)).await.unwrap();
}

#[tokio::test]
async fn invalidation_also_drops_redirected_slugs() {
    let shop = TestShop::signed_out().await;
    Mock::given(method("GET"))
        .and(path("/products/slug/rtx-4070-oc"))
        .respond_with(ok(json!({ "product": product_json(5, "rtx-4070", "15990000") })))
        .expect(2)
        .mount(&shop.server)
        .await;

    let catalog = shop.storefront.catalog();
    catalog.product_by_slug("rtx-4070-oc").await.unwrap();
    catalog.product_by_slug("rtx-4070-oc").await.unwrap();
    catalog.invalidate_product(ProductId::new(5)).await;
    assert_eq!(catalog.cached_entries().await, 0);
    catalog.product_by_slug("rtx-4070-oc").await.unwrap();
}

#[tokio::test]
async fn categories_and_featured_are_cached_until_cleared() {
    let shop = TestShop::signed_out().await;
    Mock::given(method("GET"))
        .and(path("/categories"))
        .respond_with(ok(json!([
            { "id": 1, "name": "Graphics Cards", "product_count": 12 },
            { "id": 2, "name": "Power Supplies", "slug": "psu" },
        ])))
        .expect(2)
        .mount(&shop.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/products/featured"))
        .respond_with(ok(json!([product_json(5, "rtx-4070", "15990000")])))
        .expect(1)
        .mount(&shop.server)
        .await;

    let catalog = shop.storefront.catalog();
    let categories = catalog.categories().await.unwrap();
    assert_eq!(categories.len(), 2);
    assert_eq!(categories.first().unwrap().slug, "graphics-cards");
    catalog.categories().await.unwrap();
    catalog.featured_products().await.unwrap();
    catalog.featured_products().await.unwrap();
    assert_eq!(catalog.cached_entries().await, 2);

    catalog.invalidate_all().await;
    assert_eq!(catalog.cached_entries().await, 0);
    catalog.categories().await.unwrap();
}

#[tokio::test]
async fn search_always_asks_the_server() {
    let shop = TestShop::signed_out().await;
    Mock::given(method("GET"))
        .and(path("/products/search"))
        .and(query_param("q", "rtx 4070"))
        .respond_with(ok(json!({ "products": [product_json(5, "rtx-4070", "15990000")] })))
        .expect(2)
        .mount(&shop.server)
        .await;

    let catalog = shop.storefront.catalog();
    assert_eq!(catalog.search(" rtx 4070 ").await.unwrap().len(), 1);
    assert_eq!(catalog.search("rtx 4070").await.unwrap().len(), 1);
    assert!(catalog.search("   ").await.unwrap().is_empty());
}

#[tokio::test]
async fn missing_product_is_not_found() {
    let shop = TestShop::signed_out().await;
    Mock::given(method("GET"))
        .and(path("/products/slug/no-such-thing"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({ "message": "Product not found" })),
        )
        .mount(&shop.server)
        .await;

    let err = shop
        .storefront
        .catalog()
        .product_by_reference("no-such-thing")
        .await
        .unwrap_err();
    assert_eq!(err, StoreError::NotFound("Product not found".to_string()));
}
