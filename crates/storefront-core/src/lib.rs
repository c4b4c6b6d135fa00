pub mod app_config;
pub mod cart;
pub mod config;
pub mod products;

pub use app_config::{AppConfig, Environment};
pub use cart::{Cart, CartLine, CartView, LocalLine, Mode, RemoteLine};
pub use config::{load_app_config, load_app_config_from_env};
pub use products::{LineId, Product, ProductId, ProductSnapshot, Quantity};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    /// Cart quantities start at one; removal is a separate operation.
    #[error("invalid quantity: {0} (must be at least 1)")]
    InvalidQuantity(u32),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
