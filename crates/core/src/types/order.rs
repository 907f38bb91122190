//! Orders and order history.
//!
//! Order items are snapshots: name, price and image are copied at purchase
//! time and never re-read from the live catalog, so historical totals stay
//! fixed even if a product is repriced or deleted.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::{OrderId, ProductId};
use super::status::{OrderStatus, PaymentMethod};

/// Purchased line, frozen at order time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    /// The product this line was bought from, if it still has one.
    pub product_id: Option<ProductId>,
    pub product_name: String,
    pub product_image: Option<String>,
    pub price: Decimal,
    pub quantity: u32,
}

impl OrderItem {
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

/// Delivery details for an order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ShippingAddress {
    pub full_name: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub district: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ward: Option<String>,
}

/// Errors from [`ShippingAddress::validate`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AddressError {
    #[error("{0} is required")]
    Missing(&'static str),
    #[error("phone number must contain 9 to 15 digits")]
    InvalidPhone,
}

impl ShippingAddress {
    /// Check the fields the API requires before an order is placed.
    ///
    /// # Errors
    ///
    /// Returns the first missing or malformed field.
    pub fn validate(&self) -> Result<(), AddressError> {
        for (label, value) in [
            ("Full name", &self.full_name),
            ("Phone", &self.phone),
            ("Address", &self.address),
            ("City", &self.city),
        ] {
            if value.trim().is_empty() {
                return Err(AddressError::Missing(label));
            }
        }

        let digits = self.phone.chars().filter(char::is_ascii_digit).count();
        let allowed = self
            .phone
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '+' | ' ' | '-' | '.' | '(' | ')'));
        if !allowed || !(9..=15).contains(&digits) {
            return Err(AddressError::InvalidPhone);
        }

        Ok(())
    }
}

/// A placed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub order_number: String,
    pub status: OrderStatus,
    pub items: Vec<OrderItem>,
    /// Total charged, as recorded by the server.
    pub total_amount: Decimal,
    pub shipping_address: ShippingAddress,
    pub payment_method: PaymentMethod,
    pub notes: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

impl Order {
    /// Sum of the snapshotted item subtotals.
    #[must_use]
    pub fn items_total(&self) -> Decimal {
        self.items.iter().map(OrderItem::subtotal).sum()
    }

    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }
}

/// Body of `POST /orders`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateOrderRequest {
    pub shipping_address: ShippingAddress,
    pub payment_method: PaymentMethod,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}
