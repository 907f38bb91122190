//! Order history, status changes and checkout.

use std::io::Write;

use rigshop_core::OrderId;
use rigshop_storefront::checkout::CheckoutRequest;

use super::Context;
use crate::error::CliError;
use crate::render;

/// # Errors
///
/// Returns the store error if the history cannot be loaded.
pub async fn history(ctx: &Context, out: &mut impl Write) -> Result<(), CliError> {
    let orders = ctx.storefront.orders().history().await?;
    ctx.output
        .emit(out, &orders, |out| render::orders(out, &ctx.output, &orders))
}

/// # Errors
///
/// Returns the store error if the order cannot be loaded.
pub async fn show(ctx: &Context, out: &mut impl Write, id: OrderId) -> Result<(), CliError> {
    let order = ctx.storefront.orders().order(id).await?;
    ctx.output
        .emit(out, &order, |out| render::order_detail(out, &ctx.output, &order))
}

/// # Errors
///
/// Returns `StoreError::Invalid` if the order can no longer be cancelled.
pub async fn cancel(ctx: &Context, out: &mut impl Write, id: OrderId) -> Result<(), CliError> {
    let order = ctx.storefront.orders().cancel_order(id).await?;
    ctx.output
        .note(out, &format!("Order {} cancelled", order.order_number))?;
    ctx.output
        .emit(out, &order, |out| render::order_detail(out, &ctx.output, &order))
}

/// # Errors
///
/// Returns `StoreError::Invalid` if the order has not shipped.
pub async fn confirm(ctx: &Context, out: &mut impl Write, id: OrderId) -> Result<(), CliError> {
    let order = ctx.storefront.orders().confirm_receipt(id).await?;
    ctx.output
        .note(out, &format!("Receipt of order {} confirmed", order.order_number))?;
    ctx.output
        .emit(out, &order, |out| render::order_detail(out, &ctx.output, &order))
}

/// Place an order for everything in the server-side cart.
///
/// # Errors
///
/// Returns `StoreError::Invalid` for an empty cart or incomplete address, or
/// the store error from the server.
pub async fn checkout(
    ctx: &Context,
    out: &mut impl Write,
    request: CheckoutRequest,
) -> Result<(), CliError> {
    ctx.storefront.cart().refresh_cart().await?;
    let order = ctx.storefront.checkout().place_order(request).await?;
    ctx.output
        .note(out, &format!("Order {} placed", order.order_number))?;
    ctx.output
        .emit(out, &order, |out| render::order_detail(out, &ctx.output, &order))
}
