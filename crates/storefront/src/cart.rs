//! Shopping cart synchronized with the server.
//!
//! The server is the source of truth. Every mutation sends its request and
//! then re-fetches `GET /cart`, replacing the local list wholesale, whether
//! or not the mutation succeeded. Nothing is patched locally.

use std::sync::Arc;

use rigshop_core::types::cart;
use rigshop_core::{CartItem, CartItemId, ProductId};
use rust_decimal::Decimal;
use tokio::sync::RwLock;
use tracing::{debug, instrument};

use crate::api::ApiClient;
use crate::error::{StoreError, log_failure};

/// Client-side view of the customer's cart.
#[derive(Clone)]
pub struct CartStore {
    inner: Arc<CartStoreInner>,
}

struct CartStoreInner {
    api: ApiClient,
    items: RwLock<Vec<CartItem>>,
}

impl CartStore {
    /// Create an empty store. Call [`CartStore::refresh_cart`] to load it.
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self {
            inner: Arc::new(CartStoreInner {
                api,
                items: RwLock::new(Vec::new()),
            }),
        }
    }

    /// Snapshot of the current lines.
    pub async fn items(&self) -> Vec<CartItem> {
        self.inner.items.read().await.clone()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.items.read().await.is_empty()
    }

    /// Sum of `price × quantity` over the current lines.
    pub async fn total_price(&self) -> Decimal {
        cart::total_price(&self.inner.items.read().await)
    }

    /// Total units across the current lines.
    pub async fn total_items(&self) -> u64 {
        cart::total_items(&self.inner.items.read().await)
    }

    async fn replace(&self, items: Vec<CartItem>) {
        *self.inner.items.write().await = items;
    }

    /// Signed-out carts are always empty; mutations are refused.
    async fn require_token(&self) -> Result<(), StoreError> {
        if self.inner.api.has_token() {
            Ok(())
        } else {
            self.replace(Vec::new()).await;
            Err(StoreError::NotSignedIn)
        }
    }

    /// Replace the local lines with the server's.
    ///
    /// Without a token the cart is emptied and no request is sent.
    ///
    /// # Errors
    ///
    /// Returns the translated API error; the local list is left unchanged
    /// unless the session expired, in which case it is emptied.
    #[instrument(skip(self))]
    pub async fn refresh_cart(&self) -> Result<(), StoreError> {
        if !self.inner.api.has_token() {
            debug!("No session token, cart cleared locally");
            self.replace(Vec::new()).await;
            return Ok(());
        }

        match self.inner.api.get_cart().await {
            Ok(items) => {
                debug!(lines = items.len(), "Cart refreshed");
                self.replace(items).await;
                Ok(())
            }
            Err(err) => {
                let err = log_failure("refresh_cart", err);
                if err == StoreError::SessionExpired {
                    self.replace(Vec::new()).await;
                }
                Err(err)
            }
        }
    }

    /// Report the mutation's outcome first, then the refresh's.
    async fn finish(
        &self,
        operation: &'static str,
        outcome: Result<(), crate::api::ApiError>,
    ) -> Result<(), StoreError> {
        let refreshed = self.refresh_cart().await;
        outcome.map_err(|err| log_failure(operation, err))?;
        refreshed
    }

    /// Add `quantity` units of a product.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotSignedIn` without a token,
    /// `StoreError::Invalid` for a zero quantity, or the translated API error.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn add_to_cart(
        &self,
        product_id: ProductId,
        quantity: u32,
    ) -> Result<(), StoreError> {
        self.require_token().await?;
        if quantity == 0 {
            return Err(StoreError::Invalid(
                "Quantity must be at least 1".to_string(),
            ));
        }

        let outcome = self.inner.api.add_cart_item(product_id, quantity).await;
        self.finish("add_to_cart", outcome).await
    }

    /// Remove a line.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotSignedIn` without a token, or the translated
    /// API error.
    #[instrument(skip(self), fields(item_id = %item_id))]
    pub async fn remove_from_cart(&self, item_id: CartItemId) -> Result<(), StoreError> {
        self.require_token().await?;

        let outcome = self.inner.api.remove_cart_item(item_id).await;
        self.finish("remove_from_cart", outcome).await
    }

    /// Set a line's quantity. Zero or negative removes the line.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotSignedIn` without a token,
    /// `StoreError::Invalid` for an absurd quantity, or the translated API error.
    #[instrument(skip(self), fields(item_id = %item_id))]
    pub async fn update_quantity(
        &self,
        item_id: CartItemId,
        quantity: i64,
    ) -> Result<(), StoreError> {
        if quantity <= 0 {
            return self.remove_from_cart(item_id).await;
        }
        self.require_token().await?;
        let quantity = u32::try_from(quantity)
            .map_err(|_| StoreError::Invalid(format!("Quantity {quantity} is too large")))?;

        let outcome = self.inner.api.update_cart_item(item_id, quantity).await;
        self.finish("update_quantity", outcome).await
    }

    /// Remove every line.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotSignedIn` without a token, or the translated
    /// API error.
    #[instrument(skip(self))]
    pub async fn clear_cart(&self) -> Result<(), StoreError> {
        self.require_token().await?;

        let outcome = self.inner.api.clear_cart().await;
        self.finish("clear_cart", outcome).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::session::{MemoryTokenStore, TokenStore};

    fn signed_out_store() -> CartStore {
        let tokens: Arc<dyn TokenStore> = Arc::new(MemoryTokenStore::new());
        // Nothing listens here; a request would fail with Unavailable.
        let api = ApiClient::with_base_url("http://127.0.0.1:9", tokens).unwrap();
        CartStore::new(api)
    }

    #[tokio::test]
    async fn test_refresh_without_token_is_empty_and_ok() {
        let store = signed_out_store();
        store.refresh_cart().await.unwrap();
        assert!(store.is_empty().await);
        assert_eq!(store.total_price().await, Decimal::ZERO);
        assert_eq!(store.total_items().await, 0);
    }

    #[tokio::test]
    async fn test_mutations_without_token_are_refused() {
        let store = signed_out_store();
        assert_eq!(
            store.add_to_cart(ProductId::new(1), 1).await,
            Err(StoreError::NotSignedIn)
        );
        assert_eq!(
            store.update_quantity(CartItemId::new(1), 2).await,
            Err(StoreError::NotSignedIn)
        );
        assert_eq!(
            store.update_quantity(CartItemId::new(1), 0).await,
            Err(StoreError::NotSignedIn)
        );
        assert_eq!(
            store.remove_from_cart(CartItemId::new(1)).await,
            Err(StoreError::NotSignedIn)
        );
        assert_eq!(store.clear_cart().await, Err(StoreError::NotSignedIn));
    }

    #[tokio::test]
    async fn test_zero_quantity_add_is_invalid() {
        let tokens: Arc<dyn TokenStore> = Arc::new(MemoryTokenStore::with_token("t"));
        let api = ApiClient::with_base_url("http://127.0.0.1:9", tokens).unwrap();
        let store = CartStore::new(api);

        assert!(matches!(
            store.add_to_cart(ProductId::new(1), 0).await,
            Err(StoreError::Invalid(_))
        ));
    }
}
