//! Core types for Rigshop.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod cart;
pub mod favorite;
pub mod id;
pub mod order;
pub mod price;
pub mod product;
pub mod status;

pub use cart::CartItem;
pub use favorite::{FavoriteItem, FavoriteKey};
pub use id::*;
pub use order::{AddressError, CreateOrderRequest, Order, OrderItem, ShippingAddress};
pub use price::{CurrencyCode, Price};
pub use product::{
    Category, CategoryRef, Pagination, Product, ProductPage, ProductSummary, Specification,
};
pub use status::*;
