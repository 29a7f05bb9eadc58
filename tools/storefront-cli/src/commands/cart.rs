//! Cart management.

use anyhow::{bail, Context as _, Result};
use dialoguer::Confirm;
use serde_json::json;
use storefront_cache::FileStore;
use storefront_commerce::cart::{ensure_available, CartChange, PersistentCart, RemovalReason};
use storefront_commerce::search::FilterSpec;
use storefront_commerce::ProductId;

use super::{CartArgs, CartCommand};
use crate::context::Context;

/// Run the cart command.
pub async fn run(args: CartArgs, ctx: &Context) -> Result<()> {
    let mut cart = ctx.cart()?;

    match args.command.unwrap_or(CartCommand::Show) {
        CartCommand::Show => show(&cart, ctx),
        CartCommand::Add { id, quantity } => add(&mut cart, &id, quantity, ctx).await,
        CartCommand::Set { id, quantity } => {
            let product_id = ProductId::new(id);
            if cart.quantity_of(&product_id) == 0 {
                bail!("{} is not in the cart", product_id);
            }
            cart.update_quantity(&product_id, i64::from(quantity))?;
            if quantity == 0 {
                ctx.output.success(&format!("Removed {}", product_id));
            } else {
                ctx.output
                    .success(&format!("{} now x{}", product_id, cart.quantity_of(&product_id)));
            }
            show(&cart, ctx)
        }
        CartCommand::Remove { id } => {
            let product_id = ProductId::new(id);
            if !cart.remove_item(&product_id)? {
                bail!("{} is not in the cart", product_id);
            }
            ctx.output.success(&format!("Removed {}", product_id));
            show(&cart, ctx)
        }
        CartCommand::Clear { yes } => {
            if cart.cart().is_empty() {
                ctx.output.info("Cart is already empty.");
                return Ok(());
            }
            if !yes && !ctx.output.is_json() {
                let confirmed = Confirm::new()
                    .with_prompt(format!("Remove all {} items from the cart?", cart.count()))
                    .default(false)
                    .interact()?;
                if !confirmed {
                    ctx.output.warn("Cart left unchanged");
                    return Ok(());
                }
            }
            cart.clear()?;
            ctx.output.success("Cart cleared");
            Ok(())
        }
        CartCommand::Reconcile => reconcile(&mut cart, ctx).await,
    }
}

fn show(cart: &PersistentCart<FileStore>, ctx: &Context) -> Result<()> {
    let entries = cart.cart().entries();

    if ctx.output.is_json() {
        ctx.output.json(&json!({
            "items": entries,
            "count": cart.count(),
            "total": cart.total(),
        }));
        return Ok(());
    }

    ctx.output.header("Cart");
    if entries.is_empty() {
        ctx.output.info("Your cart is empty.");
        return Ok(());
    }

    let widths = [10, 32, 10, 4, 10];
    ctx.output.table_row(&["ID", "NAME", "PRICE", "QTY", "SUBTOTAL"], &widths);
    for entry in entries {
        ctx.output.table_row(
            &[
                entry.id().as_str(),
                &entry.product.name,
                &entry.product.price.display(),
                &entry.quantity.to_string(),
                &entry.line_total().display(),
            ],
            &widths,
        );
    }
    ctx.output.info("");
    ctx.output.kv("Items", &cart.count().to_string());
    ctx.output.kv("Total", &cart.total().display());
    Ok(())
}

async fn add(cart: &mut PersistentCart<FileStore>, id: &str, quantity: u32, ctx: &Context) -> Result<()> {
    let session = ctx.session()?;
    if !session.is_authenticated() {
        bail!("Please sign in to add items to the cart (storefront login <email>)");
    }

    let load = ctx.load_catalog(&FilterSpec::new()).await?;
    let product_id = ProductId::new(id);
    let product = load
        .products
        .iter()
        .find(|p| p.id == product_id)
        .with_context(|| format!("Product not found: {}", product_id))?;

    ensure_available(cart.cart(), product, quantity)?;
    cart.add_item(product, i64::from(quantity))?;

    ctx.output.success(&format!(
        "Added {} x{} (now {} in cart)",
        product.name,
        quantity,
        cart.quantity_of(&product.id)
    ));
    show(cart, ctx)
}

async fn reconcile(cart: &mut PersistentCart<FileStore>, ctx: &Context) -> Result<()> {
    if cart.cart().is_empty() {
        ctx.output.info("Cart is empty, nothing to refresh.");
        return Ok(());
    }

    let load = ctx.load_catalog(&FilterSpec::new()).await?;
    if load.is_demo() {
        ctx.output.warn("Live catalog unavailable; cart left unchanged");
        return Ok(());
    }

    let report = cart.reconcile_with_catalog(&load.products)?;
    if ctx.output.is_json() {
        ctx.output.json(&report);
        return Ok(());
    }

    if report.is_empty() {
        ctx.output.success("Cart is up to date");
        return Ok(());
    }
    ctx.output.header("Cart updated");
    for change in &report.changes {
        ctx.output.list_item(&describe(change));
    }
    if report.has_price_changes() {
        ctx.output.warn("Some prices changed since the items were added");
    }
    show(cart, ctx)
}

fn describe(change: &CartChange) -> String {
    match change {
        CartChange::Removed {
            name,
            reason: RemovalReason::Discontinued,
            ..
        } => format!("{name} was removed: no longer sold"),
        CartChange::Removed {
            name,
            reason: RemovalReason::OutOfStock,
            ..
        } => format!("{name} was removed: out of stock"),
        CartChange::PriceChanged { product_id, old, new } => {
            format!("{product_id}: price {} -> {}", old.display(), new.display())
        }
        CartChange::QuantityReduced { product_id, from, to } => {
            format!("{product_id}: quantity reduced from {from} to {to} (stock)")
        }
    }
}
