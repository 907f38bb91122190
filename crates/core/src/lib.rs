//! Rigshop Core - Shared types library.
//!
//! This crate provides the types used across all Rigshop components:
//! - `storefront` - REST API client and cart/favorites synchronization
//! - `cli` - Command-line storefront
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, prices, statuses and the canonical resource shapes
//! - [`normalize`] - Coercion of loosely-typed API payloads into [`types`]

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod normalize;
pub mod types;

pub use types::*;
