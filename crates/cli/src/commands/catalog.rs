//! Product and category browsing.

use std::io::Write;

use rigshop_storefront::api::ProductQuery;

use super::Context;
use crate::error::CliError;
use crate::render;

/// # Errors
///
/// Returns an error if the listing cannot be fetched or written.
pub async fn list(
    ctx: &Context,
    out: &mut impl Write,
    query: &ProductQuery,
) -> Result<(), CliError> {
    let page = ctx.storefront.catalog().list_products(query).await?;
    ctx.output
        .emit(out, &page, |out| render::product_page(out, &ctx.output, &page))
}

/// Show one product, looked up by numeric id or slug.
///
/// # Errors
///
/// Returns `StoreError::NotFound` if nothing matches.
pub async fn show(ctx: &Context, out: &mut impl Write, reference: &str) -> Result<(), CliError> {
    let product = ctx.storefront.catalog().product_by_reference(reference).await?;
    ctx.output.emit(out, &product, |out| {
        render::product_detail(out, &ctx.output, &product)
    })
}

/// # Errors
///
/// Returns an error if the listing cannot be fetched or written.
pub async fn featured(ctx: &Context, out: &mut impl Write) -> Result<(), CliError> {
    let products = ctx.storefront.catalog().featured_products().await?;
    ctx.output
        .emit(out, &products, |out| render::products(out, &ctx.output, &products))
}

/// # Errors
///
/// Returns an error if the search fails or cannot be written.
pub async fn search(ctx: &Context, out: &mut impl Write, query: &str) -> Result<(), CliError> {
    let products = ctx.storefront.catalog().search(query).await?;
    ctx.output
        .emit(out, &products, |out| render::products(out, &ctx.output, &products))
}

/// # Errors
///
/// Returns an error if the categories cannot be fetched or written.
pub async fn categories(ctx: &Context, out: &mut impl Write) -> Result<(), CliError> {
    let categories = ctx.storefront.catalog().categories().await?;
    ctx.output
        .emit(out, &categories, |out| render::categories(out, &categories))
}
