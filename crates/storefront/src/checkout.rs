//! Turning the cart into an order.

use rigshop_core::{CreateOrderRequest, Order, PaymentMethod, ShippingAddress};
use tracing::{instrument, warn};

use crate::cart::CartStore;
use crate::error::StoreError;
use crate::orders::OrderService;

/// What the customer fills in at checkout.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CheckoutRequest {
    pub shipping_address: ShippingAddress,
    pub payment_method: PaymentMethod,
    pub notes: Option<String>,
}

/// Places orders from the current cart.
#[derive(Clone)]
pub struct Checkout {
    cart: CartStore,
    orders: OrderService,
}

impl Checkout {
    #[must_use]
    pub const fn new(cart: CartStore, orders: OrderService) -> Self {
        Self { cart, orders }
    }

    /// Validate locally, submit the order, then refresh the cart (the server
    /// empties it once the order exists).
    ///
    /// The cart is checked as currently loaded; refresh it first if it may
    /// be stale.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Invalid` for an empty cart or an incomplete
    /// address, `StoreError::NotSignedIn` without a token, or the translated
    /// API error.
    #[instrument(skip_all, fields(payment_method = ?request.payment_method))]
    pub async fn place_order(&self, request: CheckoutRequest) -> Result<Order, StoreError> {
        if self.cart.is_empty().await {
            return Err(StoreError::Invalid("Your cart is empty".to_string()));
        }
        request.shipping_address.validate()?;

        let order_request = CreateOrderRequest {
            shipping_address: trimmed(request.shipping_address),
            payment_method: request.payment_method,
            notes: request
                .notes
                .map(|notes| notes.trim().to_string())
                .filter(|notes| !notes.is_empty()),
        };

        let order = self.orders.create_order(&order_request).await?;

        if let Err(err) = self.cart.refresh_cart().await {
            warn!(error = %err, order_id = %order.id, "Cart refresh after checkout failed");
        }
        Ok(order)
    }
}

fn trimmed(address: ShippingAddress) -> ShippingAddress {
    let optional = |value: Option<String>| {
        value
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };
    ShippingAddress {
        full_name: address.full_name.trim().to_string(),
        phone: address.phone.trim().to_string(),
        address: address.address.trim().to_string(),
        city: address.city.trim().to_string(),
        district: optional(address.district),
        ward: optional(address.ward),
    }
}
