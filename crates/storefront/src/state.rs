//! Storefront handle bundling the API client and every store.

use std::sync::Arc;

use crate::api::{ApiClient, ApiError};
use crate::cart::CartStore;
use crate::catalog::CatalogService;
use crate::checkout::Checkout;
use crate::config::StorefrontConfig;
use crate::favorites::FavoritesStore;
use crate::orders::OrderService;
use crate::session::TokenStore;

/// Everything a front end needs, sharing one client and one token store.
///
/// This struct is cheaply cloneable; every component is an `Arc` handle.
#[derive(Clone)]
pub struct Storefront {
    api: ApiClient,
    cart: CartStore,
    favorites: FavoritesStore,
    catalog: CatalogService,
    orders: OrderService,
}

impl Storefront {
    /// Build the storefront from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(config: &StorefrontConfig, tokens: Arc<dyn TokenStore>) -> Result<Self, ApiError> {
        Ok(Self::from_client(ApiClient::new(config, tokens)?))
    }

    /// Build the storefront around an existing client.
    #[must_use]
    pub fn from_client(api: ApiClient) -> Self {
        Self {
            cart: CartStore::new(api.clone()),
            favorites: FavoritesStore::new(api.clone()),
            catalog: CatalogService::new(api.clone()),
            orders: OrderService::new(api.clone()),
            api,
        }
    }

    #[must_use]
    pub const fn api(&self) -> &ApiClient {
        &self.api
    }

    #[must_use]
    pub const fn cart(&self) -> &CartStore {
        &self.cart
    }

    #[must_use]
    pub const fn favorites(&self) -> &FavoritesStore {
        &self.favorites
    }

    #[must_use]
    pub const fn catalog(&self) -> &CatalogService {
        &self.catalog
    }

    #[must_use]
    pub const fn orders(&self) -> &OrderService {
        &self.orders
    }

    /// Checkout over this storefront's cart and orders.
    #[must_use]
    pub fn checkout(&self) -> Checkout {
        Checkout::new(self.cart.clone(), self.orders.clone())
    }
}
