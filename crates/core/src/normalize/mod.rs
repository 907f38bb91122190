//! Normalization of raw API payloads into the canonical types.
//!
//! The backend has accumulated several shapes for the same data: numbers
//! sent as strings, images stored as JSON inside a text column, and
//! specifications as either an object map or an ordered array. Everything
//! here is infallible; malformed fields fall back to empty defaults so that
//! one bad row never hides the rest of a listing.

pub mod images;
mod records;
pub mod specifications;
pub mod value;

pub use images::{parse_images, resolve_image_url};
pub use records::{
    normalize_cart_item, normalize_cart_items, normalize_categories, normalize_category,
    normalize_favorite, normalize_favorites, normalize_order, normalize_orders,
    normalize_pagination, normalize_product, normalize_product_page, normalize_products,
};
pub use specifications::normalize_specifications;
pub use value::lenient_decimal;
