//! Read-only catalog access with response caching.
//!
//! Single products (by id and by slug), the featured list and the category
//! list are cached in memory via `moka` for 5 minutes. Filtered listings and
//! searches always go to the server.

mod cache;

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use rigshop_core::{Category, Product, ProductId, ProductPage};
use tracing::{debug, instrument};

use crate::api::{ApiClient, ProductQuery};
use crate::error::{StoreError, log_failure};

use cache::{CacheKey, CacheValue};

const CACHE_CAPACITY: u64 = 1000;
const CACHE_TTL: Duration = Duration::from_secs(300);

// =============================================================================
// CatalogService
// =============================================================================

/// Products and categories, cached where the data is slow to change.
#[derive(Clone)]
pub struct CatalogService {
    inner: Arc<CatalogServiceInner>,
}

struct CatalogServiceInner {
    api: ApiClient,
    cache: Cache<CacheKey, CacheValue>,
}

impl CatalogService {
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self::with_ttl(api, CACHE_TTL)
    }

    /// Create a service whose cache entries live for `ttl`.
    #[must_use]
    pub fn with_ttl(api: ApiClient, ttl: Duration) -> Self {
        let cache = Cache::builder()
            .max_capacity(CACHE_CAPACITY)
            .time_to_live(ttl)
            .build();

        Self {
            inner: Arc::new(CatalogServiceInner { api, cache }),
        }
    }

    // =========================================================================
    // Product Methods
    // =========================================================================

    /// A page of products matching `query`. Never cached.
    ///
    /// # Errors
    ///
    /// Returns the translated API error.
    #[instrument(skip(self))]
    pub async fn list_products(&self, query: &ProductQuery) -> Result<ProductPage, StoreError> {
        self.inner
            .api
            .list_products(query)
            .await
            .map_err(|err| log_failure("list_products", err))
    }

    /// Get a product by id.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the product does not exist, or the
    /// translated API error.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn product(&self, id: ProductId) -> Result<Product, StoreError> {
        let cache_key = CacheKey::Product(id);

        // Check cache
        if let Some(CacheValue::Product(product)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for product");
            return Ok(*product);
        }

        let product = self
            .inner
            .api
            .get_product(id)
            .await
            .map_err(|err| log_failure("product", err))?;

        self.cache_product(&product).await;
        Ok(product)
    }

    /// Get a product by slug.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the product does not exist, or the
    /// translated API error.
    #[instrument(skip(self), fields(slug = %slug))]
    pub async fn product_by_slug(&self, slug: &str) -> Result<Product, StoreError> {
        let slug = slug.trim();
        if slug.is_empty() {
            return Err(StoreError::Invalid("Product slug is empty".to_string()));
        }
        let cache_key = CacheKey::ProductSlug(slug.to_string());

        // Check cache
        if let Some(CacheValue::Product(product)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for product slug");
            return Ok(*product);
        }

        let product = self
            .inner
            .api
            .get_product_by_slug(slug)
            .await
            .map_err(|err| log_failure("product_by_slug", err))?;

        self.cache_product(&product).await;
        // Slugs the server redirects from still map to this product.
        if product.slug != slug {
            self.inner
                .cache
                .insert(cache_key, CacheValue::Product(Box::new(product.clone())))
                .await;
        }
        Ok(product)
    }

    /// Look a product up by numeric id or, failing that, by slug.
    ///
    /// # Errors
    ///
    /// See [`CatalogService::product`] and [`CatalogService::product_by_slug`].
    pub async fn product_by_reference(&self, reference: &str) -> Result<Product, StoreError> {
        match reference.trim().parse::<ProductId>() {
            Ok(id) => self.product(id).await,
            Err(_) => self.product_by_slug(reference).await,
        }
    }

    async fn cache_product(&self, product: &Product) {
        let value = CacheValue::Product(Box::new(product.clone()));
        self.inner
            .cache
            .insert(CacheKey::Product(product.id), value.clone())
            .await;
        if !product.slug.is_empty() {
            self.inner
                .cache
                .insert(CacheKey::ProductSlug(product.slug.clone()), value)
                .await;
        }
    }

    /// Featured products for the landing view.
    ///
    /// # Errors
    ///
    /// Returns the translated API error.
    #[instrument(skip(self))]
    pub async fn featured_products(&self) -> Result<Vec<Product>, StoreError> {
        if let Some(CacheValue::Products(products)) =
            self.inner.cache.get(&CacheKey::Featured).await
        {
            debug!("Cache hit for featured products");
            return Ok(products);
        }

        let products = self
            .inner
            .api
            .featured_products()
            .await
            .map_err(|err| log_failure("featured_products", err))?;

        self.inner
            .cache
            .insert(CacheKey::Featured, CacheValue::Products(products.clone()))
            .await;
        Ok(products)
    }

    /// Full-text product search. Never cached.
    ///
    /// A blank query returns no results without contacting the server.
    ///
    /// # Errors
    ///
    /// Returns the translated API error.
    #[instrument(skip(self))]
    pub async fn search(&self, query: &str) -> Result<Vec<Product>, StoreError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }
        self.inner
            .api
            .search_products(query)
            .await
            .map_err(|err| log_failure("search", err))
    }

    // =========================================================================
    // Category Methods
    // =========================================================================

    /// All categories.
    ///
    /// # Errors
    ///
    /// Returns the translated API error.
    #[instrument(skip(self))]
    pub async fn categories(&self) -> Result<Vec<Category>, StoreError> {
        if let Some(CacheValue::Categories(categories)) =
            self.inner.cache.get(&CacheKey::Categories).await
        {
            debug!("Cache hit for categories");
            return Ok(categories);
        }

        let categories = self
            .inner
            .api
            .categories()
            .await
            .map_err(|err| log_failure("categories", err))?;

        self.inner
            .cache
            .insert(
                CacheKey::Categories,
                CacheValue::Categories(categories.clone()),
            )
            .await;
        Ok(categories)
    }

    // =========================================================================
    // Invalidation
    // =========================================================================

    /// Drop every cached entry for a product (its id, its slug and any slug
    /// that redirected to it) and the featured list.
    pub async fn invalidate_product(&self, id: ProductId) {
        let stale: Vec<_> = self
            .inner
            .cache
            .iter()
            .filter(|(_, value)| matches!(value, CacheValue::Product(product) if product.id == id))
            .map(|(key, _)| key)
            .collect();
        for key in stale {
            self.inner.cache.invalidate(key.as_ref()).await;
        }
        self.inner.cache.invalidate(&CacheKey::Product(id)).await;
        self.inner.cache.invalidate(&CacheKey::Featured).await;
    }

    /// Drop every cached entry.
    pub async fn invalidate_all(&self) {
        self.inner.cache.invalidate_all();
        self.inner.cache.run_pending_tasks().await;
    }

    /// Number of live cache entries (after pending maintenance).
    pub async fn cached_entries(&self) -> u64 {
        self.inner.cache.run_pending_tasks().await;
        self.inner.cache.entry_count()
    }
}
