//! Favorites synchronization: optimistic insert with rollback.

use std::time::Duration;

use rigshop_core::{FavoriteId, FavoriteKey, ProductId};
use rigshop_storefront::StoreError;
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, ResponseTemplate};

use crate::common::{TOKEN, setup};

fn favorites_body() -> serde_json::Value {
    json!({
        "data": [
            {
                "id": 1,
                "product": {"id": 20, "name": "Noctua NH-D15", "price": 2500000, "images": ["/uploads/nhd15.jpg"]},
                "created_at": "2024-06-01T12:00:00Z"
            },
            {"id": 2, "product_id": 21, "name": "Arctic P12", "price": "99000"}
        ]
    })
}

#[tokio::test]
async fn refresh_loads_and_authenticates() {
    let (server, storefront) = setup(Some(TOKEN)).await;
    Mock::given(method("GET"))
        .and(path("/favorites"))
        .respond_with(ResponseTemplate::new(200).set_body_json(favorites_body()))
        .mount(&server)
        .await;

    let favorites = storefront.favorites();
    favorites.refresh_favorites().await.expect("refresh failed");

    assert!(favorites.is_authenticated());
    assert_eq!(favorites.favorite_count().await, 2);
    assert!(favorites.is_favorite(ProductId::new(21)).await);
    let items = favorites.items().await;
    assert_eq!(
        items[0].product.image.as_deref(),
        Some(format!("{}/uploads/nhd15.jpg", server.uri()).as_str())
    );
}

#[tokio::test]
async fn successful_add_replaces_placeholder_with_server_record() {
    let (server, storefront) = setup(Some(TOKEN)).await;
    Mock::given(method("POST"))
        .and(path("/favorites"))
        .and(body_json(json!({"product_id": 30})))
        .respond_with(
            ResponseTemplate::new(201)
                .set_delay(Duration::from_millis(300))
                .set_body_json(json!({
                    "success": true,
                    "data": {"id": 77, "product": {"id": 30, "name": "be quiet! Dark Rock 4", "price": 1800000}}
                })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let favorites = storefront.favorites().clone();
    let task = {
        let favorites = favorites.clone();
        tokio::spawn(async move { favorites.add_to_favorites(ProductId::new(30)).await })
    };

    // The placeholder shows up before the server answers.
    let mut saw_placeholder = false;
    for _ in 0..20 {
        let items = favorites.items().await;
        if items.iter().any(|item| item.key.is_placeholder()) {
            saw_placeholder = true;
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert!(saw_placeholder);

    task.await.expect("task panicked").expect("add failed");

    let items = favorites.items().await;
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].key, FavoriteKey::Server(FavoriteId::new(77)));
    assert_eq!(items[0].product.name, "be quiet! Dark Rock 4");
}

#[tokio::test]
async fn failed_add_leaves_list_as_it_was() {
    let (server, storefront) = setup(Some(TOKEN)).await;
    Mock::given(method("GET"))
        .and(path("/favorites"))
        .respond_with(ResponseTemplate::new(200).set_body_json(favorites_body()))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/favorites"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(json!({"message": "Database unavailable"})),
        )
        .mount(&server)
        .await;

    let favorites = storefront.favorites();
    favorites.refresh_favorites().await.expect("refresh failed");
    let before = favorites.items().await;

    let err = favorites
        .add_to_favorites(ProductId::new(99))
        .await
        .expect_err("should fail");

    assert_eq!(err, StoreError::Rejected("Database unavailable".to_string()));
    assert_eq!(favorites.items().await, before);
    assert!(favorites.is_authenticated());
}

#[tokio::test]
async fn add_existing_favorite_is_a_no_op() {
    let (server, storefront) = setup(Some(TOKEN)).await;
    Mock::given(method("GET"))
        .and(path("/favorites"))
        .respond_with(ResponseTemplate::new(200).set_body_json(favorites_body()))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/favorites"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let favorites = storefront.favorites();
    favorites.refresh_favorites().await.expect("refresh failed");
    favorites
        .add_to_favorites(ProductId::new(20))
        .await
        .expect("no-op add failed");
    assert_eq!(favorites.favorite_count().await, 2);
}

#[tokio::test]
async fn unauthorized_add_expires_session_and_rolls_back() {
    let (server, storefront) = setup(Some(TOKEN)).await;
    Mock::given(method("POST"))
        .and(path("/favorites"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"message": "jwt expired"})))
        .mount(&server)
        .await;

    let favorites = storefront.favorites();
    assert!(favorites.is_authenticated());

    let err = favorites
        .add_to_favorites(ProductId::new(5))
        .await
        .expect_err("should fail");

    assert_eq!(err, StoreError::SessionExpired);
    assert!(!favorites.is_authenticated());
    assert_eq!(favorites.favorite_count().await, 0);
}

#[tokio::test]
async fn add_without_echo_falls_back_to_refresh() {
    let (server, storefront) = setup(Some(TOKEN)).await;
    Mock::given(method("POST"))
        .and(path("/favorites"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"success": true, "message": "Added"})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/favorites"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 12, "product_id": 5, "name": "Lian Li O11", "price": 3000000}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let favorites = storefront.favorites();
    favorites
        .add_to_favorites(ProductId::new(5))
        .await
        .expect("add failed");

    let items = favorites.items().await;
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].key, FavoriteKey::Server(FavoriteId::new(12)));
}

#[tokio::test]
async fn remove_and_clear() {
    let (server, storefront) = setup(Some(TOKEN)).await;
    Mock::given(method("GET"))
        .and(path("/favorites"))
        .respond_with(ResponseTemplate::new(200).set_body_json(favorites_body()))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/favorites/20"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/favorites"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let favorites = storefront.favorites();
    favorites.refresh_favorites().await.expect("refresh failed");

    favorites
        .remove_from_favorites(ProductId::new(20))
        .await
        .expect("remove failed");
    assert!(!favorites.is_favorite(ProductId::new(20)).await);
    assert_eq!(favorites.favorite_count().await, 1);

    favorites.clear_favorites().await.expect("clear failed");
    assert_eq!(favorites.favorite_count().await, 0);
}

#[tokio::test]
async fn failed_remove_keeps_entry() {
    let (server, storefront) = setup(Some(TOKEN)).await;
    Mock::given(method("GET"))
        .and(path("/favorites"))
        .respond_with(ResponseTemplate::new(200).set_body_json(favorites_body()))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/favorites/21"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let favorites = storefront.favorites();
    favorites.refresh_favorites().await.expect("refresh failed");

    let err = favorites
        .remove_from_favorites(ProductId::new(21))
        .await
        .expect_err("should fail");
    assert_eq!(
        err,
        StoreError::Rejected("Request failed with status 503".to_string())
    );
    assert!(favorites.is_favorite(ProductId::new(21)).await);
}
