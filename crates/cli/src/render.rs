//! Plain-text tables and JSON output.
//!
//! Everything is written through `std::io::Write` so commands can be tested
//! against a buffer.

use std::io::{self, Write};

use chrono::{DateTime, Utc};
use rigshop_core::{
    CartItem, Category, CurrencyCode, FavoriteItem, Order, PaymentMethod, Price, Product,
    ProductPage,
};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::error::CliError;

/// Output settings shared by every command.
#[derive(Debug, Clone, Copy)]
pub struct Output {
    pub json: bool,
    pub currency: CurrencyCode,
}

impl Output {
    #[must_use]
    pub const fn new(json: bool, currency: CurrencyCode) -> Self {
        Self { json, currency }
    }

    #[must_use]
    pub fn price(&self, amount: Decimal) -> String {
        Price::new(amount, self.currency).display()
    }

    /// Write `value` as JSON in `--json` mode, otherwise run `text`.
    ///
    /// # Errors
    ///
    /// Returns an error if writing or encoding fails.
    pub fn emit<W, T, F>(&self, out: &mut W, value: &T, text: F) -> Result<(), CliError>
    where
        W: Write,
        T: Serialize + ?Sized,
        F: FnOnce(&mut W) -> io::Result<()>,
    {
        if self.json {
            serde_json::to_writer_pretty(&mut *out, value)?;
            writeln!(out)?;
        } else {
            text(out)?;
        }
        Ok(())
    }

    /// A status line; suppressed in `--json` mode so the output stays parseable.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn note(&self, out: &mut impl Write, message: &str) -> Result<(), CliError> {
        if !self.json {
            writeln!(out, "{message}")?;
        }
        Ok(())
    }
}

// =============================================================================
// Table
// =============================================================================

/// Left-aligned text table with a dashed rule under the header.
#[derive(Debug, Default)]
pub struct Table {
    headers: Vec<&'static str>,
    rows: Vec<Vec<String>>,
}

impl Table {
    #[must_use]
    pub fn new(headers: &[&'static str]) -> Self {
        Self {
            headers: headers.to_vec(),
            rows: Vec::new(),
        }
    }

    pub fn row(&mut self, cells: Vec<String>) {
        self.rows.push(cells);
    }

    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn write(&self, out: &mut impl Write) -> io::Result<()> {
        let mut widths: Vec<usize> = self.headers.iter().map(|h| h.chars().count()).collect();
        for row in &self.rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.chars().count());
            }
        }

        let headers: Vec<String> = self.headers.iter().map(ToString::to_string).collect();
        write_line(out, &headers, &widths)?;
        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        write_line(out, &rule, &widths)?;
        for row in &self.rows {
            write_line(out, row, &widths)?;
        }
        Ok(())
    }
}

fn write_line(out: &mut impl Write, cells: &[String], widths: &[usize]) -> io::Result<()> {
    let line = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join("  ");
    writeln!(out, "{}", line.trim_end())
}

// =============================================================================
// Helpers
// =============================================================================

fn date(value: Option<DateTime<Utc>>) -> String {
    value.map_or_else(|| "-".to_string(), |d| d.format("%Y-%m-%d").to_string())
}

fn or_dash(value: &str) -> String {
    if value.trim().is_empty() {
        "-".to_string()
    } else {
        value.to_string()
    }
}

fn stock_label(in_stock: bool) -> &'static str {
    if in_stock { "in stock" } else { "sold out" }
}

const fn payment_label(method: PaymentMethod) -> &'static str {
    match method {
        PaymentMethod::Cod => "Cash on delivery",
        PaymentMethod::BankTransfer => "Bank transfer",
        PaymentMethod::Card => "Card",
    }
}

// =============================================================================
// Catalog
// =============================================================================

/// # Errors
///
/// Returns an error if writing fails.
pub fn products(out: &mut impl Write, output: &Output, products: &[Product]) -> io::Result<()> {
    if products.is_empty() {
        return writeln!(out, "No products found");
    }
    let mut table = Table::new(&["ID", "NAME", "PRICE", "SALE", "BRAND", "STOCK"]);
    for product in products {
        table.row(vec![
            product.id.to_string(),
            product.name.clone(),
            output.price(product.price),
            product
                .discount_percent()
                .map(|p| format!("-{p}%"))
                .unwrap_or_default(),
            or_dash(&product.brand),
            stock_label(product.in_stock).to_string(),
        ]);
    }
    table.write(out)
}

/// # Errors
///
/// Returns an error if writing fails.
pub fn product_page(out: &mut impl Write, output: &Output, page: &ProductPage) -> io::Result<()> {
    products(out, output, &page.products)?;
    let pagination = &page.pagination;
    writeln!(
        out,
        "\nPage {} of {} ({} products)",
        pagination.page,
        pagination.total_pages.max(1),
        pagination.total
    )
}

/// # Errors
///
/// Returns an error if writing fails.
pub fn product_detail(out: &mut impl Write, output: &Output, product: &Product) -> io::Result<()> {
    writeln!(out, "{} (#{})", product.name, product.id)?;
    if !product.slug.is_empty() {
        writeln!(out, "Slug:      {}", product.slug)?;
    }
    match (product.original_price, product.discount_percent()) {
        (Some(original), Some(percent)) => writeln!(
            out,
            "Price:     {} (was {}, -{percent}%)",
            output.price(product.price),
            output.price(original)
        )?,
        _ => writeln!(out, "Price:     {}", output.price(product.price))?,
    }
    writeln!(out, "Brand:     {}", or_dash(&product.brand))?;
    if let Some(category) = &product.category {
        writeln!(out, "Category:  {}", category.name)?;
    }
    writeln!(
        out,
        "Stock:     {} ({} available)",
        stock_label(product.in_stock),
        product.stock_quantity
    )?;
    if !product.tags.is_empty() {
        writeln!(out, "Tags:      {}", product.tags.join(", "))?;
    }

    let description = if product.description.is_empty() {
        &product.short_description
    } else {
        &product.description
    };
    if !description.is_empty() {
        writeln!(out, "\n{description}")?;
    }

    if !product.specifications.is_empty() {
        writeln!(out, "\nSpecifications")?;
        let mut table = Table::new(&["KEY", "VALUE"]);
        for spec in &product.specifications {
            table.row(vec![spec.key.clone(), spec.value.clone()]);
        }
        table.write(out)?;
    }

    if !product.images.is_empty() {
        writeln!(out, "\nImages")?;
        for image in &product.images {
            writeln!(out, "  {image}")?;
        }
    }
    Ok(())
}

/// # Errors
///
/// Returns an error if writing fails.
pub fn categories(out: &mut impl Write, categories: &[Category]) -> io::Result<()> {
    if categories.is_empty() {
        return writeln!(out, "No categories");
    }
    let mut table = Table::new(&["ID", "NAME", "SLUG", "PRODUCTS"]);
    for category in categories {
        table.row(vec![
            category.id.to_string(),
            category.name.clone(),
            category.slug.clone(),
            category.product_count.to_string(),
        ]);
    }
    table.write(out)
}

// =============================================================================
// Cart & Favorites
// =============================================================================

/// Cart contents with the derived totals.
#[derive(Debug, Serialize)]
pub struct CartView {
    pub items: Vec<CartItem>,
    pub total_items: u64,
    pub total_price: Decimal,
}

/// # Errors
///
/// Returns an error if writing fails.
pub fn cart(out: &mut impl Write, output: &Output, cart: &CartView) -> io::Result<()> {
    if cart.items.is_empty() {
        return writeln!(out, "Your cart is empty");
    }
    let mut table = Table::new(&["ITEM", "PRODUCT", "NAME", "QTY", "PRICE", "SUBTOTAL"]);
    for item in &cart.items {
        let mut quantity = item.quantity.to_string();
        if item.exceeds_stock() {
            quantity.push('!');
        }
        table.row(vec![
            item.id.to_string(),
            item.product_id.to_string(),
            item.name.clone(),
            quantity,
            output.price(item.price),
            output.price(item.line_total()),
        ]);
    }
    table.write(out)?;
    writeln!(
        out,
        "\n{} item(s), total {}",
        cart.total_items,
        output.price(cart.total_price)
    )?;
    if cart.items.iter().any(CartItem::exceeds_stock) {
        writeln!(out, "! quantity exceeds available stock")?;
    }
    Ok(())
}

/// # Errors
///
/// Returns an error if writing fails.
pub fn favorites(out: &mut impl Write, output: &Output, items: &[FavoriteItem]) -> io::Result<()> {
    if items.is_empty() {
        return writeln!(out, "No favorites yet");
    }
    let mut table = Table::new(&["PRODUCT", "NAME", "PRICE", "STOCK", "ADDED"]);
    for item in items {
        let product = &item.product;
        table.row(vec![
            product.id.to_string(),
            or_dash(&product.name),
            output.price(product.price),
            stock_label(product.in_stock).to_string(),
            date(Some(item.added_at)),
        ]);
    }
    table.write(out)
}

// =============================================================================
// Orders
// =============================================================================

/// # Errors
///
/// Returns an error if writing fails.
pub fn orders(out: &mut impl Write, output: &Output, orders: &[Order]) -> io::Result<()> {
    if orders.is_empty() {
        return writeln!(out, "No orders yet");
    }
    let mut table = Table::new(&["ID", "ORDER", "STATUS", "ITEMS", "TOTAL", "PLACED"]);
    for order in orders {
        table.row(vec![
            order.id.to_string(),
            order.order_number.clone(),
            order.status.label().to_string(),
            order.item_count().to_string(),
            output.price(order.total_amount),
            date(order.created_at),
        ]);
    }
    table.write(out)
}

/// # Errors
///
/// Returns an error if writing fails.
pub fn order_detail(out: &mut impl Write, output: &Output, order: &Order) -> io::Result<()> {
    writeln!(out, "Order {} (#{})", order.order_number, order.id)?;
    writeln!(out, "Status:    {}", order.status.label())?;
    writeln!(out, "Placed:    {}", date(order.created_at))?;
    writeln!(out, "Payment:   {}", payment_label(order.payment_method))?;

    let address = &order.shipping_address;
    let locality = [
        address.ward.as_deref(),
        address.district.as_deref(),
        Some(address.city.as_str()),
    ]
    .into_iter()
    .flatten()
    .filter(|part| !part.is_empty())
    .collect::<Vec<_>>()
    .join(", ");
    writeln!(out, "Ship to:   {} ({})", or_dash(&address.full_name), or_dash(&address.phone))?;
    writeln!(out, "           {}", or_dash(&address.address))?;
    if !locality.is_empty() {
        writeln!(out, "           {locality}")?;
    }
    if let Some(notes) = &order.notes {
        writeln!(out, "Notes:     {notes}")?;
    }

    writeln!(out)?;
    let mut table = Table::new(&["PRODUCT", "NAME", "QTY", "PRICE", "SUBTOTAL"]);
    for item in &order.items {
        table.row(vec![
            item.product_id.map_or_else(|| "-".to_string(), |id| id.to_string()),
            item.product_name.clone(),
            item.quantity.to_string(),
            output.price(item.price),
            output.price(item.subtotal()),
        ]);
    }
    table.write(out)?;
    writeln!(out, "\nTotal:     {}", output.price(order.total_amount))?;

    if order.status.can_cancel() {
        writeln!(out, "This order can still be cancelled.")?;
    } else if order.status.can_confirm() {
        writeln!(out, "Confirm receipt once the package arrives.")?;
    }
    Ok(())
}
