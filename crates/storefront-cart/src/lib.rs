//! Cart synchronization engine.
//!
//! [`CartEngine`] keeps the local cart consistent with a [`RemoteCartStore`],
//! degrades to a process-local cart when the store is unreachable, and
//! recovers through [`CartEngine::refresh`] or [`CartEngine::reconcile`].
//! [`checkout::place_order`] turns the cart into an order and clears it.

pub mod checkout;
pub mod engine;
pub mod error;
pub mod local;
pub mod store;

pub use checkout::{place_order, OrderPlacer, ShippingAddress};
pub use engine::{CartEngine, EngineConfig, ReconcileReport, SyncOutcome};
pub use error::{CartError, CheckoutError, StoreError};
pub use store::RemoteCartStore;
