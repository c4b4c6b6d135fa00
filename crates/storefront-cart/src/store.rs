//! The remote cart store seam.

use std::future::Future;
use std::sync::Arc;

use storefront_api::CommerceClient;
use storefront_core::{LineId, ProductId, Quantity, RemoteLine};

use crate::error::StoreError;

/// Authoritative cart storage the engine synchronizes against.
///
/// Mutations only acknowledge; the engine re-fetches the full cart after
/// every confirmed change.
pub trait RemoteCartStore: Send + Sync {
    fn fetch_cart(&self) -> impl Future<Output = Result<Vec<RemoteLine>, StoreError>> + Send;

    fn add_item(
        &self,
        product_id: ProductId,
        quantity: Quantity,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    fn update_item(
        &self,
        line_id: LineId,
        quantity: Quantity,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    fn remove_item(&self, line_id: LineId) -> impl Future<Output = Result<(), StoreError>> + Send;
}

impl RemoteCartStore for CommerceClient {
    async fn fetch_cart(&self) -> Result<Vec<RemoteLine>, StoreError> {
        Ok(self.get_cart().await?)
    }

    async fn add_item(&self, product_id: ProductId, quantity: Quantity) -> Result<(), StoreError> {
        self.add_cart_item(product_id, quantity).await?;
        Ok(())
    }

    async fn update_item(&self, line_id: LineId, quantity: Quantity) -> Result<(), StoreError> {
        self.update_cart_item(line_id, quantity).await?;
        Ok(())
    }

    async fn remove_item(&self, line_id: LineId) -> Result<(), StoreError> {
        self.remove_cart_item(line_id).await?;
        Ok(())
    }
}

impl<T: RemoteCartStore> RemoteCartStore for Arc<T> {
    fn fetch_cart(&self) -> impl Future<Output = Result<Vec<RemoteLine>, StoreError>> + Send {
        (**self).fetch_cart()
    }

    fn add_item(
        &self,
        product_id: ProductId,
        quantity: Quantity,
    ) -> impl Future<Output = Result<(), StoreError>> + Send {
        (**self).add_item(product_id, quantity)
    }

    fn update_item(
        &self,
        line_id: LineId,
        quantity: Quantity,
    ) -> impl Future<Output = Result<(), StoreError>> + Send {
        (**self).update_item(line_id, quantity)
    }

    fn remove_item(&self, line_id: LineId) -> impl Future<Output = Result<(), StoreError>> + Send {
        (**self).remove_item(line_id)
    }
}
