//! Favorites (wishlist) synchronized with the server.
//!
//! Adding is optimistic: a placeholder entry appears immediately and is
//! swapped for the server record once `POST /favorites` succeeds, or removed
//! again if it fails. The placeholder is always located by its key, never by
//! position, so concurrent changes to the list cannot misdirect the swap.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use rigshop_core::{FavoriteItem, FavoriteKey, ProductId};
use tokio::sync::RwLock;
use tracing::{debug, instrument};

use crate::api::{ApiClient, ApiError};
use crate::error::{StoreError, log_failure};

/// Client-side view of the customer's favorites.
#[derive(Clone)]
pub struct FavoritesStore {
    inner: Arc<FavoritesStoreInner>,
}

struct FavoritesStoreInner {
    api: ApiClient,
    items: RwLock<Vec<FavoriteItem>>,
    is_authenticated: AtomicBool,
}

impl FavoritesStore {
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        let is_authenticated = AtomicBool::new(api.has_token());
        Self {
            inner: Arc::new(FavoritesStoreInner {
                api,
                items: RwLock::new(Vec::new()),
                is_authenticated,
            }),
        }
    }

    /// Snapshot of the current entries, placeholders included.
    pub async fn items(&self) -> Vec<FavoriteItem> {
        self.inner.items.read().await.clone()
    }

    pub async fn is_favorite(&self, product_id: ProductId) -> bool {
        self.inner
            .items
            .read()
            .await
            .iter()
            .any(|item| item.product_id() == product_id)
    }

    pub async fn favorite_count(&self) -> usize {
        self.inner.items.read().await.len()
    }

    /// False once the server has rejected the session; true again after a
    /// successful refresh.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.inner.is_authenticated.load(Ordering::Acquire)
    }

    /// Translate an API failure, noting an expired session.
    fn fail(&self, operation: &'static str, err: ApiError) -> StoreError {
        let err = log_failure(operation, err);
        if err == StoreError::SessionExpired {
            self.inner.is_authenticated.store(false, Ordering::Release);
        }
        err
    }

    async fn require_token(&self) -> Result<(), StoreError> {
        if self.inner.api.has_token() {
            Ok(())
        } else {
            self.inner.is_authenticated.store(false, Ordering::Release);
            self.inner.items.write().await.clear();
            Err(StoreError::NotSignedIn)
        }
    }

    /// Replace the local entries with the server's.
    ///
    /// Without a token the list is emptied and no request is sent.
    ///
    /// # Errors
    ///
    /// Returns the translated API error; the local list is left unchanged.
    #[instrument(skip(self))]
    pub async fn refresh_favorites(&self) -> Result<(), StoreError> {
        if !self.inner.api.has_token() {
            debug!("No session token, favorites cleared locally");
            self.inner.is_authenticated.store(false, Ordering::Release);
            self.inner.items.write().await.clear();
            return Ok(());
        }

        let items = self
            .inner
            .api
            .get_favorites()
            .await
            .map_err(|err| self.fail("refresh_favorites", err))?;

        debug!(count = items.len(), "Favorites refreshed");
        *self.inner.items.write().await = items;
        self.inner.is_authenticated.store(true, Ordering::Release);
        Ok(())
    }

    /// Mark a product as a favorite.
    ///
    /// Does nothing if the product is already present (placeholder or not).
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotSignedIn` without a token, or the translated
    /// API error after rolling back the placeholder.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn add_to_favorites(&self, product_id: ProductId) -> Result<(), StoreError> {
        self.require_token().await?;

        let placeholder = FavoriteItem::placeholder(product_id);
        let key = placeholder.key;
        {
            let mut items = self.inner.items.write().await;
            if items.iter().any(|item| item.product_id() == product_id) {
                debug!("Already a favorite");
                return Ok(());
            }
            items.push(placeholder);
        }

        match self.inner.api.add_favorite(product_id).await {
            Ok(Some(record)) => {
                let mut items = self.inner.items.write().await;
                if let Some(slot) = items.iter_mut().find(|item| item.key == key) {
                    *slot = record;
                }
                Ok(())
            }
            Ok(None) => {
                // Accepted, but nothing usable came back; take the server's list.
                self.remove_key(key).await;
                self.refresh_favorites().await
            }
            Err(err) => {
                self.remove_key(key).await;
                Err(self.fail("add_to_favorites", err))
            }
        }
    }

    async fn remove_key(&self, key: FavoriteKey) {
        self.inner.items.write().await.retain(|item| item.key != key);
    }

    /// Remove a product from favorites.
    ///
    /// The local entry is dropped only after the server confirms.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotSignedIn` without a token, or the translated
    /// API error.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn remove_from_favorites(&self, product_id: ProductId) -> Result<(), StoreError> {
        self.require_token().await?;

        self.inner
            .api
            .remove_favorite(product_id)
            .await
            .map_err(|err| self.fail("remove_from_favorites", err))?;

        self.inner
            .items
            .write()
            .await
            .retain(|item| item.product_id() != product_id);
        Ok(())
    }

    /// Remove every favorite.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotSignedIn` without a token, or the translated
    /// API error.
    #[instrument(skip(self))]
    pub async fn clear_favorites(&self) -> Result<(), StoreError> {
        self.require_token().await?;

        self.inner
            .api
            .clear_favorites()
            .await
            .map_err(|err| self.fail("clear_favorites", err))?;

        self.inner.items.write().await.clear();
        Ok(())
    }
}
