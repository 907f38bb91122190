//! Canonical product types.
//!
//! These are the shapes the rest of the workspace works with. Raw API
//! payloads are converted into them by [`crate::normalize`].

use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use super::id::{CategoryId, ProductId};
use super::status::ProductStatus;

/// A single key/value row of a product's technical specifications
/// (e.g. `Socket` → `AM5`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Specification {
    pub key: String,
    pub value: String,
}

impl Specification {
    #[must_use]
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Reference to the category a product belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRef {
    pub id: Option<CategoryId>,
    pub name: String,
    pub slug: Option<String>,
}

/// A catalog category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub parent_id: Option<CategoryId>,
    pub product_count: u32,
}

/// A product in its normalized form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub short_description: String,
    /// Current selling price.
    pub price: Decimal,
    /// Price before discount, if the product is on sale.
    pub original_price: Option<Decimal>,
    pub category: Option<CategoryRef>,
    pub brand: String,
    /// Ordered image URLs. Never contains empty strings or placeholders.
    pub images: Vec<String>,
    pub specifications: Vec<Specification>,
    pub stock_quantity: u32,
    pub in_stock: bool,
    pub tags: Vec<String>,
    pub status: ProductStatus,
    pub is_featured: bool,
    pub created_at: Option<DateTime<Utc>>,
}

impl Product {
    /// The first image, used for thumbnails.
    #[must_use]
    pub fn primary_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }

    /// Whole-number discount percentage when the product is on sale.
    #[must_use]
    pub fn discount_percent(&self) -> Option<u32> {
        let original = self.original_price?;
        if original <= Decimal::ZERO || original <= self.price {
            return None;
        }
        let percent = ((original - self.price) / original * Decimal::ONE_HUNDRED)
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
        percent.to_u32()
    }

    /// Look up a specification value by key (case-insensitive).
    #[must_use]
    pub fn specification(&self, key: &str) -> Option<&str> {
        self.specifications
            .iter()
            .find(|spec| spec.key.eq_ignore_ascii_case(key))
            .map(|spec| spec.value.as_str())
    }

    /// Compact summary embedded in favorites.
    #[must_use]
    pub fn summary(&self) -> ProductSummary {
        ProductSummary {
            id: self.id,
            name: self.name.clone(),
            slug: self.slug.clone(),
            price: self.price,
            original_price: self.original_price,
            image: self.primary_image().map(String::from),
            brand: self.brand.clone(),
            in_stock: self.in_stock,
        }
    }
}

/// The product fields embedded in a favorite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductSummary {
    pub id: ProductId,
    pub name: String,
    pub slug: String,
    pub price: Decimal,
    pub original_price: Option<Decimal>,
    pub image: Option<String>,
    pub brand: String,
    pub in_stock: bool,
}

impl ProductSummary {
    /// Minimal summary used while a favorite is waiting for the server.
    #[must_use]
    pub fn pending(id: ProductId) -> Self {
        Self {
            id,
            name: String::new(),
            slug: String::new(),
            price: Decimal::ZERO,
            original_price: None,
            image: None,
            brand: String::new(),
            in_stock: false,
        }
    }
}

/// Pagination metadata returned with product listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub total_pages: u32,
}

impl Pagination {
    /// Whether another page follows this one.
    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.page < self.total_pages
    }
}

/// One page of products.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductPage {
    pub products: Vec<Product>,
    pub pagination: Pagination,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn product(price: &str, original: Option<&str>) -> Product {
        Product {
            id: ProductId::new(1),
            name: "Ryzen 7 7800X3D".to_string(),
            slug: "ryzen-7-7800x3d".to_string(),
            description: String::new(),
            short_description: String::new(),
            price: price.parse().unwrap(),
            original_price: original.map(|o| o.parse().unwrap()),
            category: None,
            brand: "AMD".to_string(),
            images: vec!["/uploads/cpu.jpg".to_string()],
            specifications: vec![Specification::new("Socket", "AM5")],
            stock_quantity: 3,
            in_stock: true,
            tags: vec![],
            status: ProductStatus::Active,
            is_featured: false,
            created_at: None,
        }
    }

    #[test]
    fn test_discount_percent() {
        assert_eq!(product("750", Some("1000")).discount_percent(), Some(25));
        assert_eq!(product("1000", Some("1000")).discount_percent(), None);
        assert_eq!(product("1000", None).discount_percent(), None);
        assert_eq!(product("2", Some("3")).discount_percent(), Some(33));
    }

    #[test]
    fn test_specification_lookup_ignores_case() {
        let p = product("1", None);
        assert_eq!(p.specification("socket"), Some("AM5"));
        assert_eq!(p.specification("TDP"), None);
    }

    #[test]
    fn test_summary_uses_primary_image() {
        let summary = product("449", Some("499")).summary();
        assert_eq!(summary.image.as_deref(), Some("/uploads/cpu.jpg"));
        assert_eq!(summary.original_price, Some("499".parse().unwrap()));
    }

    #[test]
    fn test_pagination_has_next() {
        let page = Pagination {
            page: 1,
            limit: 12,
            total: 30,
            total_pages: 3,
        };
        assert!(page.has_next());
        assert!(!Pagination { page: 3, ..page }.has_next());
    }
}
