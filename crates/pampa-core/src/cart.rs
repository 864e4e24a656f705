//! # Cart
//!
//! The in-memory cart a sale is assembled in before checkout.
//!
//! ## Snapshot Pattern
//! Adding a product copies its title and price into the cart line. The sale
//! keeps the numbers the buyer saw even if the catalog changes a second
//! later. Checkout later freezes the same snapshots into movement lines.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Cart Flow                                      │
//! │                                                                         │
//! │  Product (catalog) ──add()──▶ CartItem (frozen title + price)           │
//! │                                   │                                     │
//! │                 same product?  merge quantities                         │
//! │                                   │                                     │
//! │                                   ▼                                     │
//! │                          Cart::total() ──▶ FinalizeSale                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::Product;
use crate::{MAX_CART_ITEMS, MAX_ITEM_QUANTITY};

// =============================================================================
// Cart Item
// =============================================================================

/// One line of a cart: a product snapshot plus a quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub product_id: String,
    /// Product title at the moment it was added (frozen).
    pub title: String,
    /// Unit price in cents at the moment it was added (frozen).
    pub unit_price_cents: i64,
    pub quantity: i64,
}

impl CartItem {
    /// Returns the unit price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    /// Line total: unit price × quantity.
    #[inline]
    pub fn subtotal(&self) -> Money {
        self.unit_price() * self.quantity
    }
}

// =============================================================================
// Cart
// =============================================================================

/// An in-progress sale: ordered lines, one per distinct product.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    /// Creates an empty cart.
    pub fn new() -> Self {
        Cart::default()
    }

    /// Adds a product to the cart, merging into an existing line when the
    /// product is already present.
    ///
    /// ## Errors
    /// - Quantity must be positive and the merged line must stay at or
    ///   below the per-line cap.
    /// - A new line must not push the cart past its size cap.
    pub fn add(&mut self, product: &Product, quantity: i64) -> CoreResult<()> {
        Self::check_quantity(quantity)?;

        if let Some(line) = self.items.iter_mut().find(|l| l.product_id == product.id) {
            let merged = line.quantity + quantity;
            if merged > MAX_ITEM_QUANTITY {
                return Err(CoreError::QuantityTooLarge {
                    requested: merged,
                    max: MAX_ITEM_QUANTITY,
                });
            }
            line.quantity = merged;
            return Ok(());
        }

        if self.items.len() >= MAX_CART_ITEMS {
            return Err(CoreError::CartTooLarge {
                max: MAX_CART_ITEMS,
            });
        }

        self.items.push(CartItem {
            product_id: product.id.clone(),
            title: product.title.clone(),
            unit_price_cents: product.price_cents,
            quantity,
        });
        Ok(())
    }

    /// Sets the quantity of an existing line. A quantity of zero removes
    /// the line, matching how cashiers clear a mistyped row.
    pub fn update_quantity(&mut self, product_id: &str, quantity: i64) -> CoreResult<()> {
        if quantity == 0 {
            self.remove(product_id);
            return Ok(());
        }
        Self::check_quantity(quantity)?;

        let line = self
            .items
            .iter_mut()
            .find(|l| l.product_id == product_id)
            .ok_or_else(|| CoreError::ItemNotInCart(product_id.to_string()))?;
        line.quantity = quantity;
        Ok(())
    }

    /// Removes a line. Removing an absent product is a no-op.
    pub fn remove(&mut self, product_id: &str) {
        self.items.retain(|l| l.product_id != product_id);
    }

    /// Empties the cart.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// The lines in insertion order.
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of distinct lines.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Total units across all lines, for the ticket footer.
    pub fn total_units(&self) -> i64 {
        self.items.iter().map(|l| l.quantity).sum()
    }

    /// Sum of all line subtotals.
    pub fn total(&self) -> Money {
        self.items.iter().map(CartItem::subtotal).sum()
    }

    fn check_quantity(quantity: i64) -> CoreResult<()> {
        if quantity <= 0 {
            return Err(ValidationError::MustBePositive {
                field: "quantity".to_string(),
            }
            .into());
        }
        if quantity > MAX_ITEM_QUANTITY {
            return Err(CoreError::QuantityTooLarge {
                requested: quantity,
                max: MAX_ITEM_QUANTITY,
            });
        }
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn product(id: &str, price_cents: i64) -> Product {
        Product {
            id: id.to_string(),
            title: format!("Producto {id}"),
            description: None,
            cost_cents: price_cents / 2,
            margin_bps: 10_000,
            price_cents,
            stock: 100,
            category: None,
            supplier: None,
            image_url: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_add_merges_same_product() {
        let mut cart = Cart::new();
        let p = product("p-1", 1500);

        cart.add(&p, 2).unwrap();
        cart.add(&p, 3).unwrap();

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.items()[0].quantity, 5);
        assert_eq!(cart.total(), Money::from_cents(7500));
    }

    #[test]
    fn test_add_rejects_non_positive_quantity() {
        let mut cart = Cart::new();
        let p = product("p-1", 1000);

        assert!(cart.add(&p, 0).is_err());
        assert!(cart.add(&p, -1).is_err());
        assert!(cart.is_empty());
    }

    #[test]
    fn test_quantity_cap_applies_to_merged_line() {
        let mut cart = Cart::new();
        let p = product("p-1", 1000);

        cart.add(&p, MAX_ITEM_QUANTITY).unwrap();
        let err = cart.add(&p, 1).unwrap_err();
        assert!(matches!(err, CoreError::QuantityTooLarge { .. }));
        assert_eq!(cart.items()[0].quantity, MAX_ITEM_QUANTITY);
    }

    #[test]
    fn test_cart_size_cap() {
        let mut cart = Cart::new();
        for i in 0..MAX_CART_ITEMS {
            cart.add(&product(&format!("p-{i}"), 100), 1).unwrap();
        }

        let err = cart.add(&product("p-overflow", 100), 1).unwrap_err();
        assert!(matches!(err, CoreError::CartTooLarge { .. }));
    }

    #[test]
    fn test_update_quantity() {
        let mut cart = Cart::new();
        let p = product("p-1", 1000);
        cart.add(&p, 2).unwrap();

        cart.update_quantity("p-1", 7).unwrap();
        assert_eq!(cart.items()[0].quantity, 7);

        // Zero removes the line.
        cart.update_quantity("p-1", 0).unwrap();
        assert!(cart.is_empty());

        let err = cart.update_quantity("p-ghost", 1).unwrap_err();
        assert!(matches!(err, CoreError::ItemNotInCart(_)));
    }

    #[test]
    fn test_snapshot_survives_catalog_change() {
        let mut cart = Cart::new();
        let mut p = product("p-1", 1000);
        cart.add(&p, 1).unwrap();

        // Catalog price changes after the item is in the cart.
        p.price_cents = 9999;

        assert_eq!(cart.items()[0].unit_price_cents, 1000);
        assert_eq!(cart.total(), Money::from_cents(1000));
    }

    #[test]
    fn test_totals() {
        let mut cart = Cart::new();
        cart.add(&product("p-1", 1500), 2).unwrap();
        cart.add(&product("p-2", 300), 4).unwrap();

        assert_eq!(cart.total(), Money::from_cents(4200));
        assert_eq!(cart.total_units(), 6);
        assert_eq!(cart.len(), 2);
    }
}
