//! Pure local cart mutations.
//!
//! These are the operations the engine applies in local mode and on every
//! remote fallback, so a failed remote call leaves the cart exactly as the
//! local path would have.

use chrono::Utc;
use storefront_core::{Cart, CartLine, LineId, LocalLine, ProductId, ProductSnapshot, Quantity};

/// Generates ids for locally created lines.
///
/// Ids are derived from the wall clock in milliseconds but forced to be
/// strictly increasing and above every id already in the cart.
#[derive(Debug, Default)]
pub struct LocalIdGenerator {
    last: i64,
}

impl LocalIdGenerator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&mut self, cart: &Cart) -> LineId {
        let floor = cart.max_line_id().map_or(self.last, |id| id.0.max(self.last));
        let id = Utc::now().timestamp_millis().max(floor.saturating_add(1));
        self.last = id;
        LineId(id)
    }
}

/// Adds `quantity` of `product_id` under the merge rule: an existing line for
/// the product has its quantity increased, otherwise a new local line is
/// appended. Returns the id of the affected line.
pub fn merge_add(
    cart: &mut Cart,
    ids: &mut LocalIdGenerator,
    product_id: ProductId,
    quantity: Quantity,
    snapshot: Option<ProductSnapshot>,
) -> LineId {
    if let Some(line) = cart.find_by_product_mut(product_id) {
        line.set_quantity(line.quantity().saturating_add(quantity));
        return line.id();
    }

    let id = ids.next_id(cart);
    cart.push(CartLine::Local(LocalLine {
        id,
        product_id,
        quantity,
        snapshot,
        added_at: Utc::now(),
    }));
    id
}

/// Re-inserts a local line that could not be replayed remotely, merging it
/// into an existing line for the same product if there is one. The line keeps
/// its id unless that id is now taken. Returns the id of the affected line.
pub fn restore_line(cart: &mut Cart, ids: &mut LocalIdGenerator, mut line: LocalLine) -> LineId {
    if let Some(existing) = cart.find_by_product_mut(line.product_id) {
        existing.set_quantity(existing.quantity().saturating_add(line.quantity));
        return existing.id();
    }
    if cart.find_line(line.id).is_some() {
        line.id = ids.next_id(cart);
    }
    let id = line.id;
    cart.push(CartLine::Local(line));
    id
}
