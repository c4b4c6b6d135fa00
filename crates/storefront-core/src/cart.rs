//! Cart domain model: lines, the cart collection, and the read-only view
//! handed to presentation code.
//!
//! A line is either [`RemoteLine`] (confirmed by the cart service) or
//! [`LocalLine`] (created while the service was unreachable). Both are read
//! through the same projection on [`CartLine`], so totals and rendering never
//! need to know which store produced a line.

use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::products::{LineId, ProductId, ProductSnapshot, Quantity};

/// Which store mutations currently target.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// The remote cart service is the system of record.
    #[default]
    Remote,
    /// The remote service failed; the cart lives only in this process.
    Local,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Remote => write!(f, "remote"),
            Mode::Local => write!(f, "local"),
        }
    }
}

/// A line as returned by the remote cart service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteLine {
    pub id: LineId,
    pub product_id: ProductId,
    pub quantity: Quantity,
    /// Product detail embedded in the cart response, if the service sent any.
    pub product: Option<ProductSnapshot>,
}

/// A line created locally while the remote service was unavailable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalLine {
    pub id: LineId,
    pub product_id: ProductId,
    pub quantity: Quantity,
    pub snapshot: Option<ProductSnapshot>,
    pub added_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "origin", rename_all = "snake_case")]
pub enum CartLine {
    Remote(RemoteLine),
    Local(LocalLine),
}

impl CartLine {
    #[must_use]
    pub fn id(&self) -> LineId {
        match self {
            CartLine::Remote(l) => l.id,
            CartLine::Local(l) => l.id,
        }
    }

    #[must_use]
    pub fn product_id(&self) -> ProductId {
        match self {
            CartLine::Remote(l) => l.product_id,
            CartLine::Local(l) => l.product_id,
        }
    }

    #[must_use]
    pub fn quantity(&self) -> Quantity {
        match self {
            CartLine::Remote(l) => l.quantity,
            CartLine::Local(l) => l.quantity,
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> Option<&ProductSnapshot> {
        match self {
            CartLine::Remote(l) => l.product.as_ref(),
            CartLine::Local(l) => l.snapshot.as_ref(),
        }
    }

    #[must_use]
    pub fn is_local(&self) -> bool {
        matches!(self, CartLine::Local(_))
    }

    /// Display name from the snapshot, if one was captured.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.snapshot().and_then(|s| s.name.as_deref())
    }

    /// Snapshot unit price, or zero when no price is known.
    #[must_use]
    pub fn unit_price(&self) -> Decimal {
        self.snapshot().map_or(Decimal::ZERO, ProductSnapshot::unit_price)
    }

    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.unit_price() * Decimal::from(self.quantity().get())
    }

    pub fn set_quantity(&mut self, quantity: Quantity) {
        match self {
            CartLine::Remote(l) => l.quantity = quantity,
            CartLine::Local(l) => l.quantity = quantity,
        }
    }
}

/// Ordered collection of cart lines.
///
/// Totals are computed from the lines on every call and never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn from_lines(lines: Vec<CartLine>) -> Self {
        Self { lines }
    }

    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Sum of quantities over all lines.
    #[must_use]
    pub fn total_items(&self) -> u64 {
        self.lines.iter().map(|l| u64::from(l.quantity().get())).sum()
    }

    /// Sum of `unit_price * quantity` over all lines.
    #[must_use]
    pub fn total_price(&self) -> Decimal {
        self.lines.iter().map(CartLine::subtotal).sum()
    }

    #[must_use]
    pub fn find_line(&self, id: LineId) -> Option<&CartLine> {
        self.lines.iter().find(|l| l.id() == id)
    }

    #[must_use]
    pub fn find_by_product(&self, product_id: ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|l| l.product_id() == product_id)
    }

    pub fn find_by_product_mut(&mut self, product_id: ProductId) -> Option<&mut CartLine> {
        self.lines.iter_mut().find(|l| l.product_id() == product_id)
    }

    /// Lines that exist only locally and were never confirmed remotely.
    pub fn local_lines(&self) -> impl Iterator<Item = &LocalLine> {
        self.lines.iter().filter_map(|l| match l {
            CartLine::Local(local) => Some(local),
            CartLine::Remote(_) => None,
        })
    }

    /// Highest line id currently in the cart.
    #[must_use]
    pub fn max_line_id(&self) -> Option<LineId> {
        self.lines.iter().map(CartLine::id).max()
    }

    pub fn push(&mut self, line: CartLine) {
        self.lines.push(line);
    }

    /// Removes the line with `id`, returning it. Absent ids are a no-op.
    pub fn remove_line(&mut self, id: LineId) -> Option<CartLine> {
        let idx = self.lines.iter().position(|l| l.id() == id)?;
        Some(self.lines.remove(idx))
    }

    /// Sets the quantity of line `id`. Returns `false` if no such line exists.
    pub fn set_quantity(&mut self, id: LineId, quantity: Quantity) -> bool {
        match self.lines.iter_mut().find(|l| l.id() == id) {
            Some(line) => {
                line.set_quantity(quantity);
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }
}

/// Immutable snapshot of engine state for presentation consumers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CartView {
    pub cart: Cart,
    pub mode: Mode,
    pub is_loading: bool,
    pub last_error: Option<String>,
}

impl CartView {
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        self.cart.lines()
    }

    #[must_use]
    pub fn total_items(&self) -> u64 {
        self.cart.total_items()
    }

    #[must_use]
    pub fn total_price(&self) -> Decimal {
        self.cart.total_price()
    }
}

#[cfg(test)]
#[path = "cart_test.rs"]
mod tests;
