use std::time::Duration;

use storefront_api::ApiError;
use thiserror::Error;

/// Outcome classes of a remote cart-store call.
///
/// The engine treats every variant as "remote unavailable" and falls back to
/// the local cart; the split exists so logs can tell a refused request from
/// an outage.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    /// Network failure or 5xx answer.
    #[error("remote cart unavailable: {0}")]
    Unavailable(String),

    /// The store answered 4xx (unknown line, invalid quantity, ...).
    #[error("remote cart rejected request: {0}")]
    InvalidInput(String),

    /// No answer within the engine's remote timeout.
    #[error("remote cart did not answer within {0:?}")]
    TimedOut(Duration),
}

impl From<ApiError> for StoreError {
    fn from(err: ApiError) -> Self {
        if err.is_client_error() {
            StoreError::InvalidInput(err.to_string())
        } else {
            StoreError::Unavailable(err.to_string())
        }
    }
}

/// Errors a cart mutation reports to its caller. Remote failures never appear
/// here; they are absorbed by the local fallback.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CartError {
    #[error("invalid quantity {0}: must be at least 1")]
    InvalidQuantity(u32),
}

/// Errors surfaced by order placement. The cart is left intact on every variant.
#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("cart is empty")]
    EmptyCart,

    #[error("shipping address is missing {0}")]
    IncompleteAddress(&'static str),

    #[error("Failed to place order. Please try again.")]
    Submission(#[source] ApiError),
}
