//! Cart and cart entry types.

use crate::catalog::Product;
use crate::ids::ProductId;
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// Maximum quantity allowed per cart entry.
pub const MAX_QUANTITY: u32 = 99;

/// Bound a requested quantity to `1..=MAX_QUANTITY`, `None` below 1.
fn clamp_quantity(quantity: i64) -> Option<u32> {
    (quantity >= 1).then(|| quantity.min(i64::from(MAX_QUANTITY)) as u32)
}

/// One product in the cart: a snapshot taken when it was added, plus a
/// quantity in `1..=MAX_QUANTITY`.
///
/// Serialized flat, as the product's own fields plus `quantity`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartEntry {
    #[serde(flatten)]
    pub product: Product,
    pub quantity: u32,
}

impl CartEntry {
    pub fn id(&self) -> &ProductId {
        &self.product.id
    }

    /// Snapshot price times quantity.
    pub fn line_total(&self) -> Money {
        self.product.price * self.quantity
    }
}

/// A shopping cart.
///
/// Entries keep insertion order and there is at most one per product id.
/// Invalid quantities never fail: they are clamped or turn the call into a
/// no-op. Count and total are computed from the entries on every call, so
/// they always reflect the latest mutation.
///
/// Not `Deserialize`: stored carts are rebuilt entry by entry through
/// [`Cart::add_item`] by [`CartDocument`](crate::cart::CartDocument).
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(transparent)]
pub struct Cart {
    entries: Vec<CartEntry>,
}

impl Cart {
    /// Create an empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `quantity` units of `product`.
    ///
    /// An existing entry grows to at most [`MAX_QUANTITY`] (its snapshot is
    /// left alone); otherwise a new entry is appended. Quantities below 1 do
    /// nothing. Stock is not checked here.
    pub fn add_item(&mut self, product: &Product, quantity: i64) {
        let Some(quantity) = clamp_quantity(quantity) else {
            return;
        };

        if let Some(existing) = self.entry_mut(&product.id) {
            existing.quantity = existing.quantity.saturating_add(quantity).min(MAX_QUANTITY);
            return;
        }

        self.entries.push(CartEntry {
            product: product.clone(),
            quantity,
        });
    }

    /// Remove an entry. Returns whether anything was removed.
    pub fn remove_item(&mut self, product_id: &ProductId) -> bool {
        let len_before = self.entries.len();
        self.entries.retain(|e| e.id() != product_id);
        self.entries.len() < len_before
    }

    /// Set an entry's quantity.
    ///
    /// Below 1 removes the entry, above [`MAX_QUANTITY`] is clamped. Unknown
    /// ids are ignored. Returns whether the cart changed.
    pub fn update_quantity(&mut self, product_id: &ProductId, quantity: i64) -> bool {
        match clamp_quantity(quantity) {
            None => self.remove_item(product_id),
            Some(quantity) => match self.entry_mut(product_id) {
                Some(entry) if entry.quantity != quantity => {
                    entry.quantity = quantity;
                    true
                }
                _ => false,
            },
        }
    }

    /// Clear all items from the cart.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Quantity held for `product_id`, 0 when absent.
    pub fn quantity_of(&self, product_id: &ProductId) -> u32 {
        self.get(product_id).map_or(0, |e| e.quantity)
    }

    /// Sum of quantities.
    pub fn count(&self) -> u32 {
        self.entries.iter().map(|e| e.quantity).sum()
    }

    /// Sum of snapshot price times quantity.
    pub fn total(&self) -> Money {
        self.entries.iter().map(CartEntry::line_total).sum()
    }

    pub fn entries(&self) -> &[CartEntry] {
        &self.entries
    }

    pub(crate) fn entries_mut(&mut self) -> &mut Vec<CartEntry> {
        &mut self.entries
    }

    pub fn get(&self, product_id: &ProductId) -> Option<&CartEntry> {
        self.entries.iter().find(|e| e.id() == product_id)
    }

    fn entry_mut(&mut self, product_id: &ProductId) -> Option<&mut CartEntry> {
        self.entries.iter_mut().find(|e| e.id() == product_id)
    }

    /// Number of distinct products.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
