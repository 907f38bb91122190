//! Typed wrappers over the REST endpoints.
//!
//! Every method hands the raw payload to `rigshop_core::normalize` and
//! resolves relative image paths against the configured asset URL.

use serde_json::json;
use tracing::instrument;

use rigshop_core::normalize::{
    normalize_cart_items, normalize_categories, normalize_favorite, normalize_favorites,
    normalize_order, normalize_orders, normalize_product, normalize_product_page,
    normalize_products, resolve_image_url,
};
use rigshop_core::{
    CartItem, CartItemId, Category, CreateOrderRequest, FavoriteItem, Order, OrderId, Product,
    ProductId, ProductPage,
};

use super::{ApiClient, ApiError, ProductQuery};

impl ApiClient {
    // =========================================================================
    // Cart
    // =========================================================================

    /// `GET /cart`
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn get_cart(&self) -> Result<Vec<CartItem>, ApiError> {
        let payload = self.get("/cart").await?;
        let mut items = normalize_cart_items(&payload);
        for item in &mut items {
            item.image = item.image.take().map(|raw| self.resolve(&raw));
        }
        Ok(items)
    }

    /// `POST /cart/items`
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn add_cart_item(
        &self,
        product_id: ProductId,
        quantity: u32,
    ) -> Result<(), ApiError> {
        self.post(
            "/cart/items",
            &json!({ "product_id": product_id, "quantity": quantity }),
        )
        .await?;
        Ok(())
    }

    /// `PUT /cart/items/:id`
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self), fields(item_id = %item_id))]
    pub async fn update_cart_item(
        &self,
        item_id: CartItemId,
        quantity: u32,
    ) -> Result<(), ApiError> {
        self.put(
            &format!("/cart/items/{item_id}"),
            Some(&json!({ "quantity": quantity })),
        )
        .await?;
        Ok(())
    }

    /// `DELETE /cart/items/:id`
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self), fields(item_id = %item_id))]
    pub async fn remove_cart_item(&self, item_id: CartItemId) -> Result<(), ApiError> {
        self.delete(&format!("/cart/items/{item_id}")).await?;
        Ok(())
    }

    /// `DELETE /cart`
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn clear_cart(&self) -> Result<(), ApiError> {
        self.delete("/cart").await?;
        Ok(())
    }

    // =========================================================================
    // Favorites
    // =========================================================================

    /// `GET /favorites`
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn get_favorites(&self) -> Result<Vec<FavoriteItem>, ApiError> {
        let payload = self.get("/favorites").await?;
        Ok(normalize_favorites(&payload)
            .into_iter()
            .map(|favorite| self.resolve_favorite(favorite))
            .collect())
    }

    /// `POST /favorites`
    ///
    /// Returns the created record when the server echoes one back.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn add_favorite(
        &self,
        product_id: ProductId,
    ) -> Result<Option<FavoriteItem>, ApiError> {
        let payload = self
            .post("/favorites", &json!({ "product_id": product_id }))
            .await?;
        let record = payload.get("favorite").unwrap_or(&payload);
        Ok(normalize_favorite(record).map(|favorite| self.resolve_favorite(favorite)))
    }

    /// `DELETE /favorites/:productId`
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn remove_favorite(&self, product_id: ProductId) -> Result<(), ApiError> {
        self.delete(&format!("/favorites/{product_id}")).await?;
        Ok(())
    }

    /// `DELETE /favorites`
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn clear_favorites(&self) -> Result<(), ApiError> {
        self.delete("/favorites").await?;
        Ok(())
    }

    // =========================================================================
    // Catalog
    // =========================================================================

    /// `GET /products`
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn list_products(&self, query: &ProductQuery) -> Result<ProductPage, ApiError> {
        let payload = self.get_with_query("/products", &query.to_pairs()).await?;
        let mut page = normalize_product_page(&payload);
        page.products = self.resolve_products(page.products);
        Ok(page)
    }

    /// `GET /products/:id`
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` if the payload holds no product.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn get_product(&self, id: ProductId) -> Result<Product, ApiError> {
        let payload = self.get(&format!("/products/{id}")).await?;
        self.single_product(&payload, || format!("Product not found: {id}"))
    }

    /// `GET /products/slug/:slug`
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` if the payload holds no product.
    #[instrument(skip(self), fields(slug = %slug))]
    pub async fn get_product_by_slug(&self, slug: &str) -> Result<Product, ApiError> {
        let path = format!("/products/slug/{}", urlencoding::encode(slug));
        let payload = self.get(&path).await?;
        self.single_product(&payload, || format!("Product not found: {slug}"))
    }

    /// `GET /products/featured`
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn featured_products(&self) -> Result<Vec<Product>, ApiError> {
        let payload = self.get("/products/featured").await?;
        Ok(self.resolve_products(normalize_products(&payload)))
    }

    /// `GET /products/search?q=`
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn search_products(&self, query: &str) -> Result<Vec<Product>, ApiError> {
        let payload = self
            .get_with_query("/products/search", &[("q", query.to_string())])
            .await?;
        Ok(self.resolve_products(normalize_products(&payload)))
    }

    /// `GET /categories`
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn categories(&self) -> Result<Vec<Category>, ApiError> {
        let payload = self.get("/categories").await?;
        Ok(normalize_categories(&payload))
    }

    // =========================================================================
    // Orders
    // =========================================================================

    /// `POST /orders`
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response holds no order.
    #[instrument(skip(self, request))]
    pub async fn create_order(&self, request: &CreateOrderRequest) -> Result<Order, ApiError> {
        let payload = self.post("/orders", request).await?;
        let record = payload.get("order").unwrap_or(&payload);
        normalize_order(record)
            .map(|order| self.resolve_order(order))
            .ok_or_else(|| ApiError::Api {
                status: 200,
                message: "Order was accepted but no order was returned".to_string(),
            })
    }

    /// `GET /orders/history`
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn order_history(&self) -> Result<Vec<Order>, ApiError> {
        let payload = self.get("/orders/history").await?;
        Ok(normalize_orders(&payload)
            .into_iter()
            .map(|order| self.resolve_order(order))
            .collect())
    }

    /// `GET /orders/:id`
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` if the payload holds no order.
    #[instrument(skip(self), fields(order_id = %id))]
    pub async fn get_order(&self, id: OrderId) -> Result<Order, ApiError> {
        let payload = self.get(&format!("/orders/{id}")).await?;
        let record = payload.get("order").unwrap_or(&payload);
        normalize_order(record)
            .map(|order| self.resolve_order(order))
            .ok_or_else(|| ApiError::NotFound(format!("Order not found: {id}")))
    }

    /// `PUT /orders/:id/cancel`
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self), fields(order_id = %id))]
    pub async fn cancel_order(&self, id: OrderId) -> Result<(), ApiError> {
        self.put::<()>(&format!("/orders/{id}/cancel"), None).await?;
        Ok(())
    }

    /// `PUT /orders/:id/confirm`
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self), fields(order_id = %id))]
    pub async fn confirm_order(&self, id: OrderId) -> Result<(), ApiError> {
        self.put::<()>(&format!("/orders/{id}/confirm"), None).await?;
        Ok(())
    }

    // =========================================================================
    // Image resolution
    // =========================================================================

    fn resolve(&self, raw: &str) -> String {
        resolve_image_url(self.asset_url(), raw)
    }

    fn resolve_product(&self, mut product: Product) -> Product {
        product.images = product.images.iter().map(|raw| self.resolve(raw)).collect();
        product
    }

    fn resolve_products(&self, products: Vec<Product>) -> Vec<Product> {
        products
            .into_iter()
            .map(|product| self.resolve_product(product))
            .collect()
    }

    fn resolve_favorite(&self, mut favorite: FavoriteItem) -> FavoriteItem {
        favorite.product.image = favorite.product.image.take().map(|raw| self.resolve(&raw));
        favorite
    }

    fn resolve_order(&self, mut order: Order) -> Order {
        for item in &mut order.items {
            item.product_image = item.product_image.take().map(|raw| self.resolve(&raw));
        }
        order
    }

    fn single_product(
        &self,
        payload: &serde_json::Value,
        not_found: impl FnOnce() -> String,
    ) -> Result<Product, ApiError> {
        let record = payload.get("product").unwrap_or(payload);
        let product = normalize_product(record);
        if product.id.as_i64() == 0 && product.name.is_empty() {
            return Err(ApiError::NotFound(not_found()));
        }
        Ok(self.resolve_product(product))
    }
}
