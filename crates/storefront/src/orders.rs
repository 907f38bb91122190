//! Order placement, history and status changes.

use rigshop_core::{CreateOrderRequest, Order, OrderId};
use tracing::{info, instrument};

use crate::api::ApiClient;
use crate::error::{StoreError, log_failure};

/// Orders belonging to the signed-in customer.
#[derive(Clone)]
pub struct OrderService {
    api: ApiClient,
}

impl OrderService {
    #[must_use]
    pub const fn new(api: ApiClient) -> Self {
        Self { api }
    }

    fn require_token(&self) -> Result<(), StoreError> {
        if self.api.has_token() {
            Ok(())
        } else {
            Err(StoreError::NotSignedIn)
        }
    }

    /// Submit an order. Prefer [`crate::checkout::Checkout`], which validates
    /// the request and refreshes the cart afterwards.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotSignedIn` without a token, or the translated
    /// API error.
    #[instrument(skip(self, request), fields(payment_method = ?request.payment_method))]
    pub async fn create_order(&self, request: &CreateOrderRequest) -> Result<Order, StoreError> {
        self.require_token()?;
        let order = self
            .api
            .create_order(request)
            .await
            .map_err(|err| log_failure("create_order", err))?;
        info!(order_id = %order.id, order_number = %order.order_number, "Order placed");
        Ok(order)
    }

    /// The customer's past orders, most recent first as returned by the server.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotSignedIn` without a token, or the translated
    /// API error.
    #[instrument(skip(self))]
    pub async fn history(&self) -> Result<Vec<Order>, StoreError> {
        self.require_token()?;
        self.api
            .order_history()
            .await
            .map_err(|err| log_failure("order_history", err))
    }

    /// A single order.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotSignedIn` without a token, or the translated
    /// API error.
    #[instrument(skip(self), fields(order_id = %id))]
    pub async fn order(&self, id: OrderId) -> Result<Order, StoreError> {
        self.require_token()?;
        self.api
            .get_order(id)
            .await
            .map_err(|err| log_failure("get_order", err))
    }

    /// Cancel an order that has not shipped yet.
    ///
    /// Returns the order as the server reports it afterwards.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Invalid` if the order's status does not allow
    /// cancelling, or the translated API error.
    #[instrument(skip(self), fields(order_id = %id))]
    pub async fn cancel_order(&self, id: OrderId) -> Result<Order, StoreError> {
        let order = self.order(id).await?;
        if !order.status.can_cancel() {
            return Err(StoreError::Invalid(format!(
                "Order {} is {} and can no longer be cancelled",
                order.order_number,
                order.status.label().to_lowercase()
            )));
        }

        self.api
            .cancel_order(id)
            .await
            .map_err(|err| log_failure("cancel_order", err))?;
        info!(order_number = %order.order_number, "Order cancelled");
        self.order(id).await
    }

    /// Confirm that a shipped order was received.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Invalid` if the order has not shipped, or the
    /// translated API error.
    #[instrument(skip(self), fields(order_id = %id))]
    pub async fn confirm_receipt(&self, id: OrderId) -> Result<Order, StoreError> {
        let order = self.order(id).await?;
        if !order.status.can_confirm() {
            return Err(StoreError::Invalid(format!(
                "Order {} is {}; only shipped orders can be confirmed",
                order.order_number,
                order.status.label().to_lowercase()
            )));
        }

        self.api
            .confirm_order(id)
            .await
            .map_err(|err| log_failure("confirm_order", err))?;
        info!(order_number = %order.order_number, "Order receipt confirmed");
        self.order(id).await
    }
}
