//! Rigshop storefront client library.
//!
//! Async client for the Rigshop REST API with server-synchronized cart and
//! favorites, a cached catalog, order history and checkout. Front ends (the
//! `rigshop` CLI, tests) drive it through [`Storefront`].

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod error;
pub mod favorites;
pub mod orders;
pub mod session;
pub mod state;

pub use error::StoreError;
pub use state::Storefront;
