//! Refreshing cart snapshots against the live catalog.
//!
//! Entries capture a product when it is added and never look at the catalog
//! again on their own. Reconciliation is the explicit step that brings them
//! up to date and says what changed.

use crate::cart::Cart;
use crate::catalog::Product;
use crate::ids::ProductId;
use crate::money::Money;
use serde::Serialize;
use std::collections::HashMap;

/// Why an entry left the cart during reconciliation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RemovalReason {
    /// The product is no longer in the catalog.
    Discontinued,
    /// The product has no stock left.
    OutOfStock,
}

/// One adjustment made to the cart.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CartChange {
    Removed {
        product_id: ProductId,
        name: String,
        reason: RemovalReason,
    },
    PriceChanged {
        product_id: ProductId,
        old: Money,
        new: Money,
    },
    QuantityReduced {
        product_id: ProductId,
        from: u32,
        to: u32,
    },
}

/// Everything reconciliation changed, in cart order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReconcileReport {
    pub changes: Vec<CartChange>,
}

impl ReconcileReport {
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn has_price_changes(&self) -> bool {
        self.changes
            .iter()
            .any(|c| matches!(c, CartChange::PriceChanged { .. }))
    }
}

impl Cart {
    /// Refresh every entry from `catalog`.
    ///
    /// Snapshots are replaced with the current product, entries whose
    /// product vanished or sold out are dropped, and quantities above the
    /// available stock are reduced to it.
    pub fn reconcile_with_catalog(&mut self, catalog: &[Product]) -> ReconcileReport {
        let live: HashMap<&ProductId, &Product> = catalog.iter().map(|p| (&p.id, p)).collect();
        let mut report = ReconcileReport::default();

        self.entries_mut().retain_mut(|entry| {
            let Some(current) = live.get(entry.id()) else {
                report.changes.push(CartChange::Removed {
                    product_id: entry.id().clone(),
                    name: entry.product.name.clone(),
                    reason: RemovalReason::Discontinued,
                });
                return false;
            };

            if !current.is_in_stock() {
                report.changes.push(CartChange::Removed {
                    product_id: entry.id().clone(),
                    name: current.name.clone(),
                    reason: RemovalReason::OutOfStock,
                });
                return false;
            }

            if current.price != entry.product.price {
                report.changes.push(CartChange::PriceChanged {
                    product_id: entry.id().clone(),
                    old: entry.product.price,
                    new: current.price,
                });
            }

            if entry.quantity > current.stock {
                report.changes.push(CartChange::QuantityReduced {
                    product_id: entry.id().clone(),
                    from: entry.quantity,
                    to: current.stock,
                });
                entry.quantity = current.stock;
            }

            entry.product = (*current).clone();
            true
        });

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: &str, cents: i64, stock: u32) -> Product {
        Product::new(id, format!("Item {}", id), Money::new(cents)).with_stock(stock)
    }

    #[test]
    fn test_reconcile_reports_each_kind_of_change() {
        let mut cart = Cart::new();
        cart.add_item(&product("same", 100, 5), 1);
        cart.add_item(&product("gone", 100, 5), 1);
        cart.add_item(&product("sold-out", 100, 5), 1);
        cart.add_item(&product("repriced", 100, 5), 2);
        cart.add_item(&product("scarce", 100, 50), 10);

        let catalog = vec![
            product("same", 100, 5),
            product("sold-out", 100, 0),
            product("repriced", 150, 5),
            product("scarce", 100, 4),
        ];
        let report = cart.reconcile_with_catalog(&catalog);

        assert_eq!(report.changes.len(), 4);
        assert!(report.has_price_changes());
        assert!(report.changes.contains(&CartChange::Removed {
            product_id: ProductId::new("gone"),
            name: "Item gone".into(),
            reason: RemovalReason::Discontinued,
        }));
        assert!(report.changes.contains(&CartChange::QuantityReduced {
            product_id: ProductId::new("scarce"),
            from: 10,
            to: 4,
        }));

        let ids: Vec<_> = cart.entries().iter().map(|e| e.id().as_str()).collect();
        assert_eq!(ids, vec!["same", "repriced", "scarce"]);
        assert_eq!(cart.total(), Money::new(100 + 300 + 400));
    }

    #[test]
    fn test_reconcile_noop_when_current() {
        let mut cart = Cart::new();
        cart.add_item(&product("a", 100, 5), 2);
        let report = cart.reconcile_with_catalog(&[product("a", 100, 5)]);
        assert!(report.is_empty());
        assert_eq!(cart.quantity_of(&ProductId::new("a")), 2);
    }
}
