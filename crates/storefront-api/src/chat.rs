//! Support chat and health-check endpoints.
//!
//! The chat exchange is stateless: one message in, one reply out.

use reqwest::Method;

use crate::client::CommerceClient;
use crate::error::ApiError;
use crate::types::{ChatReply, ChatRequest, HealthStatus};

impl CommerceClient {
    /// Sends a support-chat message and returns the assistant's reply.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Status`] on a non-2xx answer.
    /// - [`ApiError::Http`] on network failure.
    pub async fn send_chat_message(
        &self,
        message: &str,
        user_id: Option<&str>,
    ) -> Result<ChatReply, ApiError> {
        let url = self.endpoint("chat")?;
        let body = ChatRequest { message, user_id };
        self.send_json(Method::POST, url, Some(&body)).await
    }

    /// # Errors
    ///
    /// Any failure to reach the API or decode `{"status": ...}`.
    pub async fn health(&self) -> Result<HealthStatus, ApiError> {
        let url = self.endpoint("health")?;
        self.send_json(Method::GET, url, None::<&()>).await
    }
}
