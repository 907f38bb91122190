//! Integration tests for the Rigshop storefront.
//!
//! Every test starts its own `wiremock` server standing in for the REST API
//! and drives a real [`Storefront`] against it, so the full path from store
//! method to HTTP request to normalized state is exercised.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p rigshop-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `checkout_flow` - Cart to order, including local validation
//! - `catalog_cache` - Which catalog reads hit the server
//! - `order_status` - Cancel and confirm-receipt rules
//! - `session_flow` - File-backed tokens, sign-out and expired sessions

use std::sync::Arc;

use rigshop_storefront::Storefront;
use rigshop_storefront::api::ApiClient;
use rigshop_storefront::session::{MemoryTokenStore, TokenStore};
use serde_json::{Value, json};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TOKEN: &str = "integration-token";

/// A mock API and a storefront pointed at it.
pub struct TestShop {
    pub server: MockServer,
    pub storefront: Storefront,
    pub tokens: Arc<dyn TokenStore>,
}

impl TestShop {
    /// Signed in with [`TOKEN`].
    pub async fn signed_in() -> Self {
        Self::with_tokens(Arc::new(MemoryTokenStore::with_token(TOKEN))).await
    }

    pub async fn signed_out() -> Self {
        Self::with_tokens(Arc::new(MemoryTokenStore::new())).await
    }

    /// # Panics
    ///
    /// Panics if the mock server URI cannot be parsed.
    pub async fn with_tokens(tokens: Arc<dyn TokenStore>) -> Self {
        let server = MockServer::start().await;
        let api = ApiClient::with_base_url(&server.uri(), Arc::clone(&tokens))
            .expect("mock server URI is valid");
        Self {
            server,
            storefront: Storefront::from_client(api),
            tokens,
        }
    }

    /// Answer `GET <route>` with a success envelope around `data`.
    pub async fn serve(&self, route: &str, data: Value) {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(ok(data))
            .mount(&self.server)
            .await;
    }
}

/// `200 {"success": true, "data": ...}`
#[must_use]
pub fn ok(data: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "success": true, "data": data }))
}

// =============================================================================
// Payload builders
// =============================================================================

/// A product as the API returns it, with string prices and JSON-encoded
/// images.
#[must_use]
pub fn product_json(id: i64, slug: &str, price: &str) -> Value {
    json!({
        "id": id,
        "name": format!("Product {id}"),
        "slug": slug,
        "price": price,
        "images": format!("[\"/uploads/{slug}.jpg\"]"),
        "stock_quantity": 10,
        "status": "active",
    })
}

/// A cart line with the product nested.
#[must_use]
pub fn cart_line_json(id: i64, product_id: i64, price: u32, quantity: u32) -> Value {
    json!({
        "id": id,
        "product_id": product_id,
        "quantity": quantity,
        "price": price,
        "product": { "id": product_id, "name": format!("Product {product_id}") },
    })
}

/// An order in `status` with a single line.
#[must_use]
pub fn order_json(id: i64, status: &str) -> Value {
    json!({
        "id": id,
        "order_number": format!("RS-{id:05}"),
        "status": status,
        "total_amount": "1500000",
        "payment_method": "cod",
        "shipping_address": {
            "full_name": "Tran Linh",
            "phone": "0912345678",
            "address": "12 Hang Bai",
            "city": "Hanoi",
        },
        "items": [
            { "product_id": 3, "product_name": "Product 3", "price": "750000", "quantity": 2 }
        ],
        "created_at": "2026-03-14T09:30:00Z",
    })
}
