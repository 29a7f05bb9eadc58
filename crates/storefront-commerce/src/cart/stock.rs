//! Caller-side stock checks.
//!
//! The cart itself never looks at stock. Front ends that want to refuse an
//! add beyond what is available call [`ensure_available`] first.

use crate::cart::Cart;
use crate::catalog::Product;
use crate::error::CommerceError;

/// Fail if the cart's quantity of `product` plus `quantity` exceeds its stock.
pub fn ensure_available(cart: &Cart, product: &Product, quantity: u32) -> Result<(), CommerceError> {
    let requested = cart.quantity_of(&product.id).saturating_add(quantity);
    if requested > product.stock {
        return Err(CommerceError::InsufficientStock {
            product_id: product.id.to_string(),
            requested,
            available: product.stock,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;

    #[test]
    fn test_counts_what_is_already_in_cart() {
        let product = Product::new("p", "P", Money::new(100)).with_stock(3);
        let mut cart = Cart::new();
        assert!(ensure_available(&cart, &product, 3).is_ok());

        cart.add_item(&product, 2);
        let err = ensure_available(&cart, &product, 2).unwrap_err();
        assert!(matches!(
            err,
            CommerceError::InsufficientStock { requested: 4, available: 3, .. }
        ));
    }

    #[test]
    fn test_out_of_stock() {
        let product = Product::new("p", "P", Money::new(100));
        assert!(ensure_available(&Cart::new(), &product, 1).is_err());
    }
}
