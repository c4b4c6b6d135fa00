//! Typed client for the storefront's remote commerce REST API.

pub mod cart;
pub mod catalog;
pub mod chat;
pub mod client;
pub mod error;
pub mod orders;
pub(crate) mod retry;
pub mod types;

pub use client::CommerceClient;
pub use error::ApiError;
pub use types::{
    Acknowledgement, CartRecord, ChatReply, CreateOrderRequest, HealthStatus, Order, OrderItem,
    OrderItemRequest,
};
