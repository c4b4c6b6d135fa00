//! Order endpoints.

use reqwest::Method;

use crate::client::CommerceClient;
use crate::error::ApiError;
use crate::types::{CreateOrderRequest, Order};

impl CommerceClient {
    /// Submits a new order. Never retried.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Status`] on a non-2xx answer.
    /// - [`ApiError::Http`] on network failure.
    /// - [`ApiError::Deserialize`] if the created order cannot be parsed.
    pub async fn create_order(&self, order: &CreateOrderRequest) -> Result<Order, ApiError> {
        let url = self.endpoint("orders/")?;
        self.send_json(Method::POST, url, Some(order)).await
    }

    /// # Errors
    ///
    /// Same classes as [`CommerceClient::create_order`].
    pub async fn list_orders(&self) -> Result<Vec<Order>, ApiError> {
        let url = self.endpoint("orders/")?;
        self.send_json(Method::GET, url, None::<&()>).await
    }

    /// # Errors
    ///
    /// [`ApiError::Status`] with status 404 if no such order exists.
    pub async fn get_order(&self, id: i64) -> Result<Order, ApiError> {
        let url = self.endpoint(&format!("orders/{id}"))?;
        self.send_json(Method::GET, url, None::<&()>).await
    }
}
