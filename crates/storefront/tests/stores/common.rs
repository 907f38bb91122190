//! Shared mock-server setup.

use std::sync::Arc;

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use rigshop_storefront::Storefront;
use rigshop_storefront::api::ApiClient;
use rigshop_storefront::session::{MemoryTokenStore, TokenStore};

pub const TOKEN: &str = "test-access-token";

/// Start a mock server and a storefront pointed at it.
///
/// `token` is the bearer token the store starts with (`None` = signed out).
pub async fn setup(token: Option<&str>) -> (MockServer, Storefront) {
    let server = MockServer::start().await;
    let store = match token {
        Some(token) => MemoryTokenStore::with_token(token),
        None => MemoryTokenStore::new(),
    };
    let tokens: Arc<dyn TokenStore> = Arc::new(store);
    let api = ApiClient::with_base_url(&server.uri(), tokens).expect("mock server URI is valid");
    (server, Storefront::from_client(api))
}

/// Mount `GET /cart` answering with `body`.
pub async fn mount_cart(server: &MockServer, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/cart"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

/// Cart payload in the `{"success": true, "data": {"items": [...]}}` shape.
pub fn cart_body(items: serde_json::Value) -> serde_json::Value {
    serde_json::json!({ "success": true, "data": { "items": items } })
}
