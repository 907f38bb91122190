//! Favorites commands.

use std::io::Write;

use rigshop_core::ProductId;

use super::Context;
use crate::error::CliError;
use crate::render;

/// # Errors
///
/// Returns an error if the favorites cannot be loaded or written.
pub async fn list(ctx: &Context, out: &mut impl Write) -> Result<(), CliError> {
    ctx.storefront.favorites().refresh_favorites().await?;
    print(ctx, out).await
}

/// Adding a product that is already a favorite is a no-op.
///
/// # Errors
///
/// Returns the store error if the server rejects the favorite.
pub async fn add(
    ctx: &Context,
    out: &mut impl Write,
    product_id: ProductId,
) -> Result<(), CliError> {
    let favorites = ctx.storefront.favorites();
    // Load first so a duplicate is recognised locally.
    favorites.refresh_favorites().await?;
    if favorites.is_favorite(product_id).await {
        ctx.output
            .note(out, &format!("Product {product_id} is already a favorite"))?;
    } else {
        favorites.add_to_favorites(product_id).await?;
        ctx.output
            .note(out, &format!("Added product {product_id} to favorites"))?;
    }
    print(ctx, out).await
}

/// # Errors
///
/// Returns the store error if the server rejects the removal.
pub async fn remove(
    ctx: &Context,
    out: &mut impl Write,
    product_id: ProductId,
) -> Result<(), CliError> {
    let favorites = ctx.storefront.favorites();
    favorites.remove_from_favorites(product_id).await?;
    favorites.refresh_favorites().await?;
    ctx.output
        .note(out, &format!("Removed product {product_id} from favorites"))?;
    print(ctx, out).await
}

/// # Errors
///
/// Returns the store error if the server rejects the request.
pub async fn clear(ctx: &Context, out: &mut impl Write) -> Result<(), CliError> {
    ctx.storefront.favorites().clear_favorites().await?;
    ctx.output.note(out, "Favorites cleared")?;
    print(ctx, out).await
}

async fn print(ctx: &Context, out: &mut impl Write) -> Result<(), CliError> {
    let items = ctx.storefront.favorites().items().await;
    ctx.output
        .emit(out, &items, |out| render::favorites(out, &ctx.output, &items))
}
