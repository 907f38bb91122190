//! Command implementations.
//!
//! Each command drives the storefront stores and writes its result through
//! [`Output`](crate::render::Output).

pub mod cart;
pub mod catalog;
pub mod favorites;
pub mod orders;
pub mod session;

use rigshop_storefront::Storefront;
use rigshop_storefront::config::StorefrontConfig;

use crate::render::Output;

/// Shared state handed to every command.
pub struct Context {
    pub config: StorefrontConfig,
    pub storefront: Storefront,
    pub output: Output,
    /// Whether the token came from `RIGSHOP_TOKEN` rather than the session file.
    pub token_from_env: bool,
}
