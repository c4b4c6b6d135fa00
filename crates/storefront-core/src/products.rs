use std::collections::BTreeMap;
use std::fmt;
use std::num::NonZeroU32;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::CoreError;

/// Catalog identifier of a product, as assigned by the commerce API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub i64);

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a cart line, unique within one cart instance.
///
/// Remote lines carry the id the cart service assigned; local lines carry a
/// timestamp-derived id generated by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LineId(pub i64);

impl fmt::Display for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A cart quantity. Always at least one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Quantity(NonZeroU32);

impl Quantity {
    pub const ONE: Quantity = Quantity(NonZeroU32::MIN);

    /// # Errors
    ///
    /// Returns [`CoreError::InvalidQuantity`] when `value` is zero.
    pub fn new(value: u32) -> Result<Self, CoreError> {
        NonZeroU32::new(value)
            .map(Self)
            .ok_or(CoreError::InvalidQuantity(value))
    }

    #[must_use]
    pub fn get(self) -> u32 {
        self.0.get()
    }

    /// Adds two quantities, saturating at `u32::MAX`.
    #[must_use]
    pub fn saturating_add(self, other: Quantity) -> Quantity {
        Quantity(self.0.saturating_add(other.get()))
    }
}

impl TryFrom<u32> for Quantity {
    type Error = CoreError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Quantity> for u32 {
    fn from(q: Quantity) -> Self {
        q.get()
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Denormalized product display fields captured when a cart line is created
/// or last fetched, so the cart can render without querying the catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductSnapshot {
    pub name: Option<String>,
    pub price: Option<Decimal>,
    pub image_url: Option<String>,
}

impl ProductSnapshot {
    /// Unit price used for totals; a snapshot without a price counts as zero.
    #[must_use]
    pub fn unit_price(&self) -> Decimal {
        self.price.unwrap_or(Decimal::ZERO)
    }

    /// Returns `true` if no display field is populated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.price.is_none() && self.image_url.is_none()
    }
}

/// A catalog product as served by `GET /products/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: Decimal,
    #[serde(default)]
    pub stock: i64,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    /// Free-form spec sheet, e.g. `"display" => "6.1in OLED"`.
    #[serde(default)]
    pub specs: Option<BTreeMap<String, String>>,
}

impl Product {
    /// Captures the display fields a cart line keeps for this product.
    #[must_use]
    pub fn snapshot(&self) -> ProductSnapshot {
        ProductSnapshot {
            name: Some(self.name.clone()),
            price: Some(self.price),
            image_url: self.image_url.clone(),
        }
    }

    #[must_use]
    pub fn in_stock(&self) -> bool {
        self.stock > 0
    }
}
