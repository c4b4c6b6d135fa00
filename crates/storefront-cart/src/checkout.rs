//! Order placement from the current cart.

use std::fmt;
use std::future::Future;

use storefront_api::{ApiError, CommerceClient, CreateOrderRequest, Order, OrderItemRequest};
use storefront_core::Cart;

use crate::engine::CartEngine;
use crate::error::CheckoutError;
use crate::store::RemoteCartStore;

/// Where an order ships to. Rendered as `"{street}, {city}, {state} {zip}"`
/// on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShippingAddress {
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
}

impl ShippingAddress {
    /// # Errors
    ///
    /// Returns [`CheckoutError::IncompleteAddress`] naming the first blank field.
    pub fn validate(&self) -> Result<(), CheckoutError> {
        let fields = [
            ("street", &self.street),
            ("city", &self.city),
            ("state", &self.state),
            ("zip code", &self.zip_code),
        ];
        match fields.into_iter().find(|(_, value)| value.trim().is_empty()) {
            Some((name, _)) => Err(CheckoutError::IncompleteAddress(name)),
            None => Ok(()),
        }
    }
}

impl fmt::Display for ShippingAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}, {}, {} {}",
            self.street.trim(),
            self.city.trim(),
            self.state.trim(),
            self.zip_code.trim()
        )
    }
}

/// Submits orders to the commerce backend.
pub trait OrderPlacer: Send + Sync {
    fn submit_order(
        &self,
        request: &CreateOrderRequest,
    ) -> impl Future<Output = Result<Order, ApiError>> + Send;
}

impl OrderPlacer for CommerceClient {
    async fn submit_order(&self, request: &CreateOrderRequest) -> Result<Order, ApiError> {
        self.create_order(request).await
    }
}

/// Builds the order body from every line in `cart`, local lines included.
#[must_use]
pub fn build_order_request(
    cart: &Cart,
    address: &ShippingAddress,
    payment_method: &str,
) -> CreateOrderRequest {
    CreateOrderRequest {
        items: cart
            .lines()
            .iter()
            .map(|line| OrderItemRequest {
                product_id: line.product_id(),
                quantity: line.quantity(),
            })
            .collect(),
        shipping_address: address.to_string(),
        payment_method: payment_method.to_string(),
    }
}

/// Places an order for the engine's current cart and clears the cart once the
/// backend accepts it.
///
/// Runs under the engine's operation gate, so a mutation already in flight
/// lands before the cart is read and nothing can slip in before the clear.
///
/// # Errors
///
/// - [`CheckoutError::EmptyCart`] if there is nothing to order.
/// - [`CheckoutError::IncompleteAddress`] if an address field is blank.
/// - [`CheckoutError::Submission`] if the backend refuses or is unreachable.
///
/// The cart is untouched on every error.
pub async fn place_order<S, P>(
    engine: &CartEngine<S>,
    placer: &P,
    address: &ShippingAddress,
    payment_method: &str,
) -> Result<Order, CheckoutError>
where
    S: RemoteCartStore,
    P: OrderPlacer,
{
    engine
        .checkout_with(|cart| async move {
            if cart.is_empty() {
                return Err(CheckoutError::EmptyCart);
            }
            address.validate()?;

            let request = build_order_request(&cart, address, payment_method);
            let order = placer.submit_order(&request).await.map_err(|err| {
                tracing::warn!(error = %err, items = request.items.len(), "order submission failed");
                CheckoutError::Submission(err)
            })?;

            tracing::info!(order_id = order.id, total = %order.total, "order placed");
            Ok(order)
        })
        .await
}
