//! Cart commands.
//!
//! Every command loads the server's cart first: a fresh process starts with
//! an empty local cart.

use std::io::Write;

use rigshop_core::{CartItemId, ProductId};

use super::Context;
use crate::error::CliError;
use crate::render::{self, CartView};

/// # Errors
///
/// Returns an error if the cart cannot be loaded or written.
pub async fn show(ctx: &Context, out: &mut impl Write) -> Result<(), CliError> {
    ctx.storefront.cart().refresh_cart().await?;
    print(ctx, out).await
}

/// # Errors
///
/// Returns the store error if the server rejects the line.
pub async fn add(
    ctx: &Context,
    out: &mut impl Write,
    product_id: ProductId,
    quantity: u32,
) -> Result<(), CliError> {
    ctx.storefront.cart().add_to_cart(product_id, quantity).await?;
    ctx.output
        .note(out, &format!("Added {quantity} x product {product_id}"))?;
    print(ctx, out).await
}

/// A quantity of zero or less removes the line.
///
/// # Errors
///
/// Returns the store error if the server rejects the change.
pub async fn update(
    ctx: &Context,
    out: &mut impl Write,
    item_id: CartItemId,
    quantity: i64,
) -> Result<(), CliError> {
    ctx.storefront.cart().update_quantity(item_id, quantity).await?;
    if quantity <= 0 {
        ctx.output.note(out, &format!("Removed item {item_id}"))?;
    } else {
        ctx.output
            .note(out, &format!("Item {item_id} now has quantity {quantity}"))?;
    }
    print(ctx, out).await
}

/// # Errors
///
/// Returns the store error if the server rejects the removal.
pub async fn remove(
    ctx: &Context,
    out: &mut impl Write,
    item_id: CartItemId,
) -> Result<(), CliError> {
    ctx.storefront.cart().remove_from_cart(item_id).await?;
    ctx.output.note(out, &format!("Removed item {item_id}"))?;
    print(ctx, out).await
}

/// # Errors
///
/// Returns the store error if the server rejects the request.
pub async fn clear(ctx: &Context, out: &mut impl Write) -> Result<(), CliError> {
    ctx.storefront.cart().clear_cart().await?;
    ctx.output.note(out, "Cart cleared")?;
    print(ctx, out).await
}

async fn print(ctx: &Context, out: &mut impl Write) -> Result<(), CliError> {
    let cart = ctx.storefront.cart();
    let view = CartView {
        items: cart.items().await,
        total_items: cart.total_items().await,
        total_price: cart.total_price().await,
    };
    ctx.output
        .emit(out, &view, |out| render::cart(out, &ctx.output, &view))
}
