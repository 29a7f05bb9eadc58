//! Shopping cart module.
//!
//! Contains the cart aggregate, its persisted form, catalog reconciliation
//! and the caller-side stock check.

mod cart;
mod persistent;
mod reconcile;
mod stock;

pub use cart::{Cart, CartEntry, MAX_QUANTITY};
pub use persistent::{CartDocument, PersistentCart, CART_KEY};
pub use reconcile::{CartChange, ReconcileReport, RemovalReason};
pub use stock::ensure_available;
