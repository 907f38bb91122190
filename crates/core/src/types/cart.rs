//! Cart line items and totals.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::{CartItemId, ProductId};

/// One line of the shopping cart.
///
/// `price` is the unit price captured when the line was added, so a later
/// catalog price change does not silently change the cart total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub id: CartItemId,
    pub product_id: ProductId,
    pub quantity: u32,
    pub price: Decimal,
    pub name: String,
    pub image: Option<String>,
    /// Units the warehouse reports as available, when the API includes it.
    pub stock_quantity: Option<u32>,
}

impl CartItem {
    /// `price × quantity`.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }

    /// Whether the requested quantity exceeds known stock.
    #[must_use]
    pub fn exceeds_stock(&self) -> bool {
        self.stock_quantity
            .is_some_and(|available| self.quantity > available)
    }
}

/// Sum of `price × quantity` over all lines.
#[must_use]
pub fn total_price(items: &[CartItem]) -> Decimal {
    items.iter().map(CartItem::line_total).sum()
}

/// Total number of units across all lines.
#[must_use]
pub fn total_items(items: &[CartItem]) -> u64 {
    items.iter().map(|item| u64::from(item.quantity)).sum()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn item(id: i64, price: &str, quantity: u32) -> CartItem {
        CartItem {
            id: CartItemId::new(id),
            product_id: ProductId::new(id * 10),
            quantity,
            price: price.parse().unwrap(),
            name: format!("item {id}"),
            image: None,
            stock_quantity: None,
        }
    }

    #[test]
    fn test_totals_scenario() {
        let items = vec![item(1, "1000", 2), item(2, "500", 1)];
        assert_eq!(total_price(&items), Decimal::from(2500));
        assert_eq!(total_items(&items), 3);
    }

    #[test]
    fn test_totals_empty_cart() {
        assert_eq!(total_price(&[]), Decimal::ZERO);
        assert_eq!(total_items(&[]), 0);
    }

    #[test]
    fn test_line_total_keeps_cents() {
        let line = item(1, "19.99", 3);
        assert_eq!(line.line_total(), "59.97".parse::<Decimal>().unwrap());
    }

    #[test]
    fn test_exceeds_stock() {
        let mut line = item(1, "10", 4);
        assert!(!line.exceeds_stock());
        line.stock_quantity = Some(3);
        assert!(line.exceeds_stock());
    }
}
