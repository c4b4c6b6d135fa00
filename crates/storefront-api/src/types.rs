//! Wire types for the commerce API.
//!
//! Request bodies are strict; response types are lenient where the reference
//! backend is loose (string ids, missing quantities, flat product fields).

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use storefront_core::{LineId, ProductId, ProductSnapshot, Quantity, RemoteLine};

/// A JSON value that the backend sends either as a number or a numeric string.
#[derive(Deserialize)]
#[serde(untagged)]
enum NumOrStr {
    Num(i64),
    Str(String),
}

fn lenient_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<NumOrStr>::deserialize(deserializer)?;
    Ok(match raw {
        Some(NumOrStr::Num(n)) => Some(n),
        Some(NumOrStr::Str(s)) => s.trim().parse().ok(),
        None => None,
    })
}

fn default_quantity() -> u32 {
    1
}

/// One record of `GET /cart/`.
#[derive(Debug, Clone, Deserialize)]
pub struct CartRecord {
    #[serde(default, deserialize_with = "lenient_i64")]
    pub id: Option<i64>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub product_id: Option<i64>,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    /// Embedded product detail, when the backend joins it in.
    #[serde(default)]
    pub product: Option<ProductSnapshot>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub price: Option<Decimal>,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl CartRecord {
    /// Converts the record into a [`RemoteLine`].
    ///
    /// Returns `None` when the record has no product id or a zero quantity.
    /// A missing line id falls back to the product id, matching backends that
    /// key cart lines by product.
    #[must_use]
    pub fn into_remote_line(self) -> Option<RemoteLine> {
        let product_id = self.product_id?;
        let quantity = Quantity::new(self.quantity).ok()?;
        let id = self.id.unwrap_or(product_id);

        let flat = ProductSnapshot {
            name: self.name,
            price: self.price,
            image_url: self.image_url,
        };
        let product = match self.product {
            Some(embedded) => Some(ProductSnapshot {
                name: embedded.name.or(flat.name),
                price: embedded.price.or(flat.price),
                image_url: embedded.image_url.or(flat.image_url),
            }),
            None if flat.is_empty() => None,
            None => Some(flat),
        };

        Some(RemoteLine {
            id: LineId(id),
            product_id: ProductId(product_id),
            quantity,
            product,
        })
    }
}

/// Body of `POST /cart/`.
#[derive(Debug, Clone, Serialize)]
pub struct AddCartItemRequest {
    pub product_id: ProductId,
    pub quantity: Quantity,
}

/// Body of `PUT /cart/{line_id}`.
#[derive(Debug, Clone, Serialize)]
pub struct UpdateCartItemRequest {
    pub quantity: Quantity,
}

/// Generic `{"message": ...}` acknowledgment. Empty bodies (204) map to the default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Acknowledgement {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub cart_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderItemRequest {
    pub product_id: ProductId,
    pub quantity: Quantity,
}

/// Body of `POST /orders/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateOrderRequest {
    pub items: Vec<OrderItemRequest>,
    pub shipping_address: String,
    pub payment_method: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OrderItem {
    pub product_id: ProductId,
    pub quantity: u32,
    #[serde(default)]
    pub price: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Order {
    pub id: i64,
    #[serde(default)]
    pub items: Vec<OrderItem>,
    #[serde(default, alias = "total_price")]
    pub total: Decimal,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct ChatRequest<'a> {
    pub message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<&'a str>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ChatReply {
    pub response: String,
    #[serde(default = "default_true")]
    pub success: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HealthStatus {
    pub status: String,
}
