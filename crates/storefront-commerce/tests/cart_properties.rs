//! Property-based tests for the cart aggregate.
//!
//! After any sequence of operations:
//! 1. Each product id appears at most once
//! 2. Every quantity is within 1..=MAX_QUANTITY
//! 3. count and total equal sums recomputed independently
//! 4. A persisted cart reloads to the same state

use proptest::prelude::*;
use storefront_cache::MemoryStore;
use storefront_commerce::cart::{Cart, PersistentCart, MAX_QUANTITY};
use storefront_commerce::catalog::Product;
use storefront_commerce::{Money, ProductId};
use std::collections::HashSet;

#[derive(Debug, Clone)]
enum Op {
    Add(usize, i64),
    Remove(usize),
    Update(usize, i64),
    Clear,
}

fn products() -> Vec<Product> {
    (0..5)
        .map(|i| Product::new(format!("p{}", i), format!("Product {}", i), Money::new(150 * (i + 1))).with_stock(20))
        .collect()
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        6 => (0..5usize, -3..150i64).prop_map(|(i, q)| Op::Add(i, q)),
        2 => (0..5usize).prop_map(Op::Remove),
        3 => (0..5usize, -3..150i64).prop_map(|(i, q)| Op::Update(i, q)),
        1 => Just(Op::Clear),
    ]
}

fn apply(cart: &mut Cart, catalog: &[Product], op: &Op) {
    match *op {
        Op::Add(i, q) => cart.add_item(&catalog[i], q),
        Op::Remove(i) => {
            cart.remove_item(&catalog[i].id);
        }
        Op::Update(i, q) => {
            cart.update_quantity(&catalog[i].id, q);
        }
        Op::Clear => cart.clear(),
    }
}

proptest! {
    #[test]
    fn prop_cart_invariants_hold(ops in prop::collection::vec(op_strategy(), 0..40)) {
        let catalog = products();
        let mut cart = Cart::new();
        for op in &ops {
            apply(&mut cart, &catalog, op);

            let mut seen = HashSet::new();
            for entry in cart.entries() {
                prop_assert!(seen.insert(entry.id().clone()));
                prop_assert!((1..=MAX_QUANTITY).contains(&entry.quantity));
            }

            let count: u32 = cart.entries().iter().map(|e| e.quantity).sum();
            let total: i64 = cart
                .entries()
                .iter()
                .map(|e| e.product.price.amount_cents * i64::from(e.quantity))
                .sum();
            prop_assert_eq!(cart.count(), count);
            prop_assert_eq!(cart.total(), Money::new(total));
        }
    }

    #[test]
    fn prop_removal_subtracts_exactly_the_entry(
        ops in prop::collection::vec(op_strategy(), 0..20),
        victim in 0..5usize,
    ) {
        let catalog = products();
        let mut cart = Cart::new();
        for op in &ops {
            apply(&mut cart, &catalog, op);
        }

        let id: &ProductId = &catalog[victim].id;
        let (q, line) = cart
            .get(id)
            .map(|e| (e.quantity, e.line_total()))
            .unwrap_or((0, Money::zero()));
        let (count, total) = (cart.count(), cart.total());

        cart.remove_item(id);
        prop_assert_eq!(cart.quantity_of(id), 0);
        prop_assert_eq!(cart.count(), count - q);
        prop_assert_eq!(cart.total().amount_cents, total.amount_cents - line.amount_cents);
    }

    #[test]
    fn prop_persisted_cart_matches_in_memory(ops in prop::collection::vec(op_strategy(), 0..15)) {
        let catalog = products();
        let store = MemoryStore::new();
        let mut persistent = PersistentCart::load(store.clone()).unwrap();
        let mut expected = Cart::new();

        for op in &ops {
            apply(&mut expected, &catalog, op);
            match *op {
                Op::Add(i, q) => persistent.add_item(&catalog[i], q).unwrap(),
                Op::Remove(i) => {
                    persistent.remove_item(&catalog[i].id).unwrap();
                }
                Op::Update(i, q) => {
                    persistent.update_quantity(&catalog[i].id, q).unwrap();
                }
                Op::Clear => persistent.clear().unwrap(),
            }
        }

        let reloaded = PersistentCart::load(store).unwrap();
        prop_assert_eq!(reloaded.cart(), &expected);
        prop_assert_eq!(persistent.cart(), &expected);
    }
}
