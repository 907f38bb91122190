//! Status enums for various entities.
//!
//! The API stores these as free-form strings, so each enum has a lenient
//! `parse_lenient` constructor that never fails and falls back to the default
//! variant for anything it does not recognise.

use serde::{Deserialize, Serialize};

/// Catalog visibility of a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProductStatus {
    #[default]
    Active,
    Inactive,
    OutOfStock,
    Discontinued,
}

impl ProductStatus {
    /// Parse a status string, defaulting to `Active`.
    #[must_use]
    pub fn parse_lenient(raw: &str) -> Self {
        match normalize_key(raw).as_str() {
            "inactive" | "draft" | "hidden" => Self::Inactive,
            "out_of_stock" | "outofstock" | "sold_out" => Self::OutOfStock,
            "discontinued" | "archived" => Self::Discontinued,
            _ => Self::Active,
        }
    }

    /// Whether the product can be added to a cart.
    #[must_use]
    pub const fn is_purchasable(self) -> bool {
        matches!(self, Self::Active)
    }
}

/// Order lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Pending,
    Confirmed,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// Parse a status string, defaulting to `Pending`.
    #[must_use]
    pub fn parse_lenient(raw: &str) -> Self {
        match normalize_key(raw).as_str() {
            "confirmed" => Self::Confirmed,
            "processing" => Self::Processing,
            "shipped" | "shipping" => Self::Shipped,
            "delivered" | "completed" => Self::Delivered,
            "cancelled" | "canceled" => Self::Cancelled,
            _ => Self::Pending,
        }
    }

    /// Customers may cancel until the order starts processing.
    #[must_use]
    pub const fn can_cancel(self) -> bool {
        matches!(self, Self::Pending | Self::Confirmed)
    }

    /// Customers confirm receipt once the order has shipped.
    #[must_use]
    pub const fn can_confirm(self) -> bool {
        matches!(self, Self::Shipped)
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Confirmed => "Confirmed",
            Self::Processing => "Processing",
            Self::Shipped => "Shipped",
            Self::Delivered => "Delivered",
            Self::Cancelled => "Cancelled",
        }
    }
}

/// How the customer pays for an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Cash on delivery.
    #[default]
    Cod,
    BankTransfer,
    Card,
}

impl PaymentMethod {
    /// Parse a payment method string, defaulting to cash on delivery.
    #[must_use]
    pub fn parse_lenient(raw: &str) -> Self {
        match normalize_key(raw).as_str() {
            "bank_transfer" | "bank" | "transfer" => Self::BankTransfer,
            "card" | "credit_card" => Self::Card,
            _ => Self::Cod,
        }
    }
}

fn normalize_key(raw: &str) -> String {
    raw.trim().to_ascii_lowercase().replace([' ', '-'], "_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_status_lenient() {
        assert_eq!(ProductStatus::parse_lenient("Out of stock"), ProductStatus::OutOfStock);
        assert_eq!(ProductStatus::parse_lenient("ARCHIVED"), ProductStatus::Discontinued);
        assert_eq!(ProductStatus::parse_lenient(""), ProductStatus::Active);
        assert_eq!(ProductStatus::parse_lenient("weird"), ProductStatus::Active);
    }

    #[test]
    fn test_order_status_lenient() {
        assert_eq!(OrderStatus::parse_lenient("canceled"), OrderStatus::Cancelled);
        assert_eq!(OrderStatus::parse_lenient("Shipped"), OrderStatus::Shipped);
        assert_eq!(OrderStatus::parse_lenient("???"), OrderStatus::Pending);
    }

    #[test]
    fn test_order_status_transitions() {
        assert!(OrderStatus::Pending.can_cancel());
        assert!(OrderStatus::Confirmed.can_cancel());
        assert!(!OrderStatus::Shipped.can_cancel());
        assert!(OrderStatus::Shipped.can_confirm());
        assert!(!OrderStatus::Delivered.can_confirm());
    }

    #[test]
    fn test_payment_method_serde() {
        let json = serde_json::to_string(&PaymentMethod::BankTransfer).ok();
        assert_eq!(json.as_deref(), Some("\"bank_transfer\""));
        assert_eq!(PaymentMethod::parse_lenient("credit-card"), PaymentMethod::Card);
    }
}
