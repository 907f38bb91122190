//! Favorite (wishlist) entries.

use core::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::id::{FavoriteId, ProductId};
use super::product::ProductSummary;

/// Prefix of placeholder keys; server ids are numeric so they never collide.
pub const PLACEHOLDER_PREFIX: &str = "temp-";

/// Identity of a favorite entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FavoriteKey {
    /// Record confirmed by the server.
    Server(FavoriteId),
    /// Local record inserted before the server answered.
    Placeholder(Uuid),
}

impl FavoriteKey {
    /// Generate a fresh placeholder key.
    #[must_use]
    pub fn placeholder() -> Self {
        Self::Placeholder(Uuid::new_v4())
    }

    #[must_use]
    pub const fn is_placeholder(&self) -> bool {
        matches!(self, Self::Placeholder(_))
    }
}

impl fmt::Display for FavoriteKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Server(id) => write!(f, "{id}"),
            Self::Placeholder(uuid) => write!(f, "{PLACEHOLDER_PREFIX}{uuid}"),
        }
    }
}

/// A product the customer marked as a favorite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FavoriteItem {
    pub key: FavoriteKey,
    pub product: ProductSummary,
    pub added_at: DateTime<Utc>,
}

impl FavoriteItem {
    /// Optimistic entry shown while `POST /favorites` is in flight.
    #[must_use]
    pub fn placeholder(product_id: ProductId) -> Self {
        Self {
            key: FavoriteKey::placeholder(),
            product: ProductSummary::pending(product_id),
            added_at: Utc::now(),
        }
    }

    #[must_use]
    pub const fn product_id(&self) -> ProductId {
        self.product.id
    }
}
