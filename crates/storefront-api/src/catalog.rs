//! Product catalog endpoints.

use reqwest::Method;
use storefront_core::{Product, ProductId};

use crate::client::CommerceClient;
use crate::error::ApiError;

impl CommerceClient {
    /// Lists every product in the catalog.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Status`] on a non-2xx answer.
    /// - [`ApiError::Http`] on network failure.
    /// - [`ApiError::Deserialize`] if the body is not a product list.
    pub async fn list_products(&self) -> Result<Vec<Product>, ApiError> {
        let url = self.endpoint("products/")?;
        self.send_json(Method::GET, url, None::<&()>).await
    }

    /// Fetches one product by id.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Status`] with status 404 if the product does not exist.
    /// - [`ApiError::Http`] on network failure.
    /// - [`ApiError::Deserialize`] if the body is not a product.
    pub async fn get_product(&self, id: ProductId) -> Result<Product, ApiError> {
        let url = self.endpoint(&format!("products/{id}"))?;
        self.send_json(Method::GET, url, None::<&()>).await
    }
}
