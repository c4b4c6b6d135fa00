//! Cart endpoints: `GET/POST /cart/`, `PUT/DELETE /cart/{line_id}`.

use reqwest::Method;
use storefront_core::{LineId, ProductId, Quantity, RemoteLine};

use crate::client::CommerceClient;
use crate::error::ApiError;
use crate::types::{Acknowledgement, AddCartItemRequest, CartRecord, UpdateCartItemRequest};

impl CommerceClient {
    /// Fetches the full remote cart.
    ///
    /// Records without a product id or with a zero quantity are logged and
    /// skipped rather than failing the whole fetch.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Status`] on a non-2xx answer.
    /// - [`ApiError::Http`] on network failure.
    /// - [`ApiError::Deserialize`] if the body is not a JSON array of records.
    pub async fn get_cart(&self) -> Result<Vec<RemoteLine>, ApiError> {
        let url = self.endpoint("cart/")?;
        let records: Vec<serde_json::Value> = self
            .send_json(Method::GET, url, None::<&()>)
            .await?;

        let lines = records
            .into_iter()
            .enumerate()
            .filter_map(|(idx, value)| {
                let line = serde_json::from_value::<CartRecord>(value)
                    .map_err(|e| {
                        tracing::warn!(idx, error = %e, "get_cart: skipping malformed record");
                    })
                    .ok()?
                    .into_remote_line();
                if line.is_none() {
                    tracing::warn!(idx, "get_cart: skipping record without product or quantity");
                }
                line
            })
            .collect();
        Ok(lines)
    }

    /// Adds `quantity` of `product_id` to the remote cart.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Status`] on a non-2xx answer.
    /// - [`ApiError::Http`] on network failure.
    pub async fn add_cart_item(
        &self,
        product_id: ProductId,
        quantity: Quantity,
    ) -> Result<Acknowledgement, ApiError> {
        let url = self.endpoint("cart/")?;
        let body = AddCartItemRequest {
            product_id,
            quantity,
        };
        self.send_ack(Method::POST, url, Some(&body)).await
    }

    /// Sets the quantity of an existing remote line.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Status`] on a non-2xx answer (404 for an unknown line).
    /// - [`ApiError::Http`] on network failure.
    pub async fn update_cart_item(
        &self,
        line_id: LineId,
        quantity: Quantity,
    ) -> Result<Acknowledgement, ApiError> {
        let url = self.endpoint(&format!("cart/{line_id}"))?;
        let body = UpdateCartItemRequest { quantity };
        self.send_ack(Method::PUT, url, Some(&body)).await
    }

    /// Removes a line from the remote cart.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Status`] on a non-2xx answer.
    /// - [`ApiError::Http`] on network failure.
    pub async fn remove_cart_item(&self, line_id: LineId) -> Result<Acknowledgement, ApiError> {
        let url = self.endpoint(&format!("cart/{line_id}"))?;
        self.send_ack(Method::DELETE, url, None::<&()>).await
    }
}
