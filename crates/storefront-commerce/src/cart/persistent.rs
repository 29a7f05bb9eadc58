//! A cart that saves itself after every change.

use crate::cart::{Cart, CartEntry, ReconcileReport};
use crate::catalog::{normalize_record, Product};
use crate::error::CommerceError;
use crate::ids::ProductId;
use crate::money::Money;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use storefront_cache::{KvStore, Versioned, VersionedStore};
use tracing::{debug, warn};

/// Storage key for the cart.
pub const CART_KEY: &str = "cart";

/// What is stored under [`CART_KEY`]: `{"version": n, "items": [...]}`.
///
/// A bare item list (the format used before version stamps) is accepted on
/// load. Individual items that cannot be read are dropped; a document that is
/// neither shape fails to deserialize and the cart starts empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CartDocument {
    pub version: u64,
    pub cart: Cart,
}

impl Versioned for CartDocument {
    fn version(&self) -> u64 {
        self.version
    }

    fn set_version(&mut self, version: u64) {
        self.version = version;
    }
}

#[derive(Serialize)]
struct Envelope<'a> {
    version: u64,
    items: &'a Cart,
}

impl Serialize for CartDocument {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        Envelope {
            version: self.version,
            items: &self.cart,
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for CartDocument {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let (version, items) = match Value::deserialize(deserializer)? {
            Value::Array(items) => (0, items),
            Value::Object(mut obj) => {
                let version = obj.get("version").and_then(Value::as_u64).unwrap_or(0);
                match obj.remove("items") {
                    Some(Value::Array(items)) => (version, items),
                    _ => return Err(D::Error::custom("cart envelope has no item list")),
                }
            }
            _ => return Err(D::Error::custom("cart is neither a list nor an envelope")),
        };

        let mut cart = Cart::new();
        for raw in &items {
            match read_entry(raw) {
                Some((product, quantity)) => cart.add_item(&product, quantity),
                None => warn!("dropping unreadable cart item"),
            }
        }
        Ok(CartDocument { version, cart })
    }
}

/// An item is a product snapshot plus `quantity`. Snapshots written by other
/// front ends may use a looser product shape, so fall back to normalization.
fn read_entry(raw: &Value) -> Option<(Product, i64)> {
    let quantity = match raw.get("quantity") {
        Some(Value::Number(n)) => n.as_i64()?,
        Some(Value::String(s)) => s.trim().parse().ok()?,
        None => 1,
        Some(_) => return None,
    };
    let product = match serde_json::from_value::<CartEntry>(raw.clone()) {
        Ok(entry) => entry.product,
        Err(_) => normalize_record(raw).ok()?,
    };
    if product.price.is_negative() {
        return None;
    }
    Some((product, quantity))
}

/// A [`Cart`] bound to a key-value store.
///
/// The cart is loaded eagerly and written back after every mutation. Writes
/// are version-stamped compare-and-swaps: if another writer got there
/// first, the mutation is replayed on the latest stored cart (a bounded
/// number of times) instead of overwriting it.
pub struct PersistentCart<S> {
    store: VersionedStore<S, CartDocument>,
    doc: CartDocument,
}

impl<S: KvStore> PersistentCart<S> {
    /// Load the cart stored in `store`. Unreadable data gives an empty cart.
    pub fn load(store: S) -> Result<Self, CommerceError> {
        let store = VersionedStore::new(store, CART_KEY);
        let doc: CartDocument = store.load()?;
        debug!(version = doc.version, items = doc.cart.len(), "cart loaded");
        Ok(Self { store, doc })
    }

    /// Re-read the stored cart, picking up changes from other writers.
    pub fn reload(&mut self) -> Result<(), CommerceError> {
        self.doc = self.store.load()?;
        Ok(())
    }

    pub fn cart(&self) -> &Cart {
        &self.doc.cart
    }

    /// Version of the last state read or written.
    pub fn version(&self) -> u64 {
        self.doc.version
    }

    pub fn add_item(&mut self, product: &Product, quantity: i64) -> Result<(), CommerceError> {
        self.mutate(|cart| cart.add_item(product, quantity))
    }

    pub fn remove_item(&mut self, product_id: &ProductId) -> Result<bool, CommerceError> {
        self.mutate(|cart| cart.remove_item(product_id))
    }

    pub fn update_quantity(
        &mut self,
        product_id: &ProductId,
        quantity: i64,
    ) -> Result<bool, CommerceError> {
        self.mutate(|cart| cart.update_quantity(product_id, quantity))
    }

    /// Empty the cart. The key stays, holding an empty list.
    pub fn clear(&mut self) -> Result<(), CommerceError> {
        self.mutate(Cart::clear)
    }

    /// See [`Cart::reconcile_with_catalog`]; the result is persisted.
    pub fn reconcile_with_catalog(
        &mut self,
        catalog: &[Product],
    ) -> Result<ReconcileReport, CommerceError> {
        self.mutate(|cart| cart.reconcile_with_catalog(catalog))
    }

    pub fn quantity_of(&self, product_id: &ProductId) -> u32 {
        self.doc.cart.quantity_of(product_id)
    }

    pub fn count(&self) -> u32 {
        self.doc.cart.count()
    }

    pub fn total(&self) -> Money {
        self.doc.cart.total()
    }

    fn mutate<R: Default>(&mut self, mut op: impl FnMut(&mut Cart) -> R) -> Result<R, CommerceError> {
        let mut outcome = None;
        let doc = self
            .store
            .update(|doc: &mut CartDocument| outcome = Some(op(&mut doc.cart)))?;
        debug!(version = doc.version, items = doc.cart.len(), "cart saved");
        self.doc = doc;
        Ok(outcome.unwrap_or_default())
    }
}
