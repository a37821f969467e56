//! The client-side shopping cart.
//!
//! A cart is an insertion-ordered list of lines, one per product id, each
//! carrying a quantity and a frozen snapshot of the product taken when it was
//! first added. Server-side price changes never reach an open cart.
//!
//! The serialized form is a plain JSON array of lines. Deserialization
//! re-checks the structural invariants (unique product ids, positive
//! quantities) and rejects payloads that violate them, so callers restoring a
//! cart from storage can fall back to an empty one instead of trusting a
//! corrupt slot.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::id::ProductId;
use crate::types::price::Price;

/// Immutable copy of the product fields a cart line displays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductSnapshot {
    pub name: String,
    pub unit_price: Price,
    pub image: Option<String>,
}

/// One product entry in the cart.
///
/// `quantity` is always at least 1; a line that would drop to 0 is removed
/// from the cart instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub product_id: ProductId,
    #[serde(flatten)]
    pub snapshot: ProductSnapshot,
    pub quantity: u32,
}

impl CartLine {
    /// The line total: unit price times quantity, unrounded.
    #[must_use]
    pub fn line_price(&self) -> Price {
        self.snapshot.unit_price.times(self.quantity)
    }
}

/// Derived cart totals, recomputed on every call and never cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartTotals {
    pub total_items: u64,
    pub total_price: Price,
}

/// Invalid persisted cart payload.
#[derive(Debug, Error)]
pub enum CartError {
    #[error("duplicate cart line for product {0}")]
    DuplicateLine(ProductId),
    #[error("cart line for product {0} has zero quantity")]
    ZeroQuantity(ProductId),
}

/// The shopping cart: insertion-ordered lines keyed by product id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<CartLine>", into = "Vec<CartLine>")]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// The lines in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Add one unit of a product.
    ///
    /// An existing line for the same product id is incremented; otherwise a
    /// new line with quantity 1 is appended, freezing the given snapshot.
    pub fn add_item(&mut self, product_id: ProductId, snapshot: ProductSnapshot) {
        if let Some(line) = self.lines.iter_mut().find(|l| l.product_id == product_id) {
            line.quantity = line.quantity.saturating_add(1);
        } else {
            self.lines.push(CartLine {
                product_id,
                snapshot,
                quantity: 1,
            });
        }
    }

    /// Apply a signed quantity delta to a line.
    ///
    /// A resulting quantity of 0 or less removes the line. Unknown product
    /// ids are a no-op, not an error.
    pub fn update_quantity(&mut self, product_id: &ProductId, delta: i64) {
        let Some(index) = self.lines.iter().position(|l| &l.product_id == product_id) else {
            return;
        };
        let Some(line) = self.lines.get_mut(index) else {
            return;
        };

        let updated = i64::from(line.quantity).saturating_add(delta);
        if updated <= 0 {
            self.lines.remove(index);
        } else {
            line.quantity = u32::try_from(updated).unwrap_or(u32::MAX);
        }
    }

    /// Remove a line unconditionally; no-op if absent.
    pub fn remove_item(&mut self, product_id: &ProductId) {
        self.lines.retain(|l| &l.product_id != product_id);
    }

    /// Empty the cart. Confirmation is the caller's concern.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Compute totals fresh from the current lines.
    #[must_use]
    pub fn totals(&self) -> CartTotals {
        let mut total_items: u64 = 0;
        let mut total_price = Price::default();
        for line in &self.lines {
            total_items += u64::from(line.quantity);
            total_price += line.line_price();
        }
        CartTotals {
            total_items,
            total_price,
        }
    }
}

impl TryFrom<Vec<CartLine>> for Cart {
    type Error = CartError;

    fn try_from(lines: Vec<CartLine>) -> Result<Self, Self::Error> {
        for (index, line) in lines.iter().enumerate() {
            if line.quantity == 0 {
                return Err(CartError::ZeroQuantity(line.product_id.clone()));
            }
            if lines
                .iter()
                .take(index)
                .any(|earlier| earlier.product_id == line.product_id)
            {
                return Err(CartError::DuplicateLine(line.product_id.clone()));
            }
        }
        Ok(Self { lines })
    }
}

impl From<Cart> for Vec<CartLine> {
    fn from(cart: Cart) -> Self {
        cart.lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eur(s: &str) -> Price {
        Price::new(s.parse().expect("decimal literal"))
    }

    fn snapshot(name: &str, price: &str) -> ProductSnapshot {
        ProductSnapshot {
            name: name.to_owned(),
            unit_price: eur(price),
            image: None,
        }
    }

    #[test]
    fn test_repeated_add_folds_into_one_line() {
        let mut cart = Cart::new();
        for _ in 0..5 {
            cart.add_item(ProductId::new("A"), snapshot("Pain de Campagne", "4.50"));
        }

        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.lines()[0].quantity, 5);
    }

    #[test]
    fn test_add_keeps_first_snapshot() {
        let mut cart = Cart::new();
        cart.add_item(ProductId::new("A"), snapshot("Pain", "4.50"));
        // A later add with a changed price must not touch the frozen snapshot.
        cart.add_item(ProductId::new("A"), snapshot("Pain", "9.99"));

        assert_eq!(cart.lines()[0].snapshot.unit_price, eur("4.50"));
        assert_eq!(cart.totals().total_price, eur("9.00"));
    }

    #[test]
    fn test_insertion_order_preserved() {
        let mut cart = Cart::new();
        cart.add_item(ProductId::new("B"), snapshot("Baguette", "1.10"));
        cart.add_item(ProductId::new("A"), snapshot("Pain", "4.50"));
        cart.add_item(ProductId::new("B"), snapshot("Baguette", "1.10"));

        let ids: Vec<&str> = cart.lines().iter().map(|l| l.product_id.as_str()).collect();
        assert_eq!(ids, vec!["B", "A"]);
    }

    #[test]
    fn test_totals_recomputed_from_lines() {
        let mut cart = Cart::new();
        cart.add_item(ProductId::new("A"), snapshot("Pain", "4.50"));
        cart.add_item(ProductId::new("B"), snapshot("Croissant", "1.20"));
        cart.update_quantity(&ProductId::new("B"), 2);

        let totals = cart.totals();
        assert_eq!(totals.total_items, 4);
        assert_eq!(totals.total_price, eur("8.10"));
    }

    #[test]
    fn test_update_quantity_to_zero_removes_line() {
        let mut cart = Cart::new();
        cart.add_item(ProductId::new("A"), snapshot("Pain", "4.50"));
        cart.add_item(ProductId::new("A"), snapshot("Pain", "4.50"));

        cart.update_quantity(&ProductId::new("A"), -2);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_update_quantity_below_zero_removes_line() {
        let mut cart = Cart::new();
        cart.add_item(ProductId::new("A"), snapshot("Pain", "4.50"));

        cart.update_quantity(&ProductId::new("A"), -10);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_update_quantity_unknown_id_is_noop() {
        let mut cart = Cart::new();
        cart.add_item(ProductId::new("A"), snapshot("Pain", "4.50"));

        cart.update_quantity(&ProductId::new("missing"), 3);
        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.lines()[0].quantity, 1);
    }

    #[test]
    fn test_remove_item() {
        let mut cart = Cart::new();
        cart.add_item(ProductId::new("A"), snapshot("Pain", "4.50"));
        cart.add_item(ProductId::new("B"), snapshot("Croissant", "1.20"));

        cart.remove_item(&ProductId::new("A"));
        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.lines()[0].product_id, ProductId::new("B"));

        // Removing again is a no-op.
        cart.remove_item(&ProductId::new("A"));
        assert_eq!(cart.lines().len(), 1);
    }

    #[test]
    fn test_clear() {
        let mut cart = Cart::new();
        cart.add_item(ProductId::new("A"), snapshot("Pain", "4.50"));
        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(cart.totals().total_items, 0);
    }

    #[test]
    fn test_checkout_scenario() {
        // Concrete scenario: empty → add A (4.50) → (1, 4.50) → add A again
        // → (2, 9.00) → -1 → (1, 4.50) → -1 → empty.
        let mut cart = Cart::new();
        let id = ProductId::new("A");

        cart.add_item(id.clone(), snapshot("Pain", "4.5"));
        assert_eq!(cart.totals().total_items, 1);
        assert_eq!(cart.totals().total_price.display(), "4.50 €");

        cart.add_item(id.clone(), snapshot("Pain", "4.5"));
        assert_eq!(cart.totals().total_items, 2);
        assert_eq!(cart.totals().total_price.display(), "9.00 €");

        cart.update_quantity(&id, -1);
        assert_eq!(cart.totals().total_items, 1);
        assert_eq!(cart.totals().total_price.display(), "4.50 €");

        cart.update_quantity(&id, -1);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_serde_round_trip_preserves_order() {
        let mut cart = Cart::new();
        cart.add_item(ProductId::new("B"), snapshot("Baguette", "1.10"));
        cart.add_item(ProductId::new("A"), snapshot("Pain", "4.50"));
        cart.update_quantity(&ProductId::new("A"), 2);

        let json = serde_json::to_string(&cart).expect("serialize");
        let restored: Cart = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(restored, cart);
    }

    #[test]
    fn test_serialized_form_is_a_line_array() {
        let mut cart = Cart::new();
        cart.add_item(ProductId::new("A"), snapshot("Pain", "4.50"));

        let value = serde_json::to_value(&cart).expect("serialize");
        assert!(value.is_array());
        assert_eq!(value.as_array().map(Vec::len), Some(1));
    }

    #[test]
    fn test_corrupt_payload_duplicate_ids_rejected() {
        let json = r#"[
            {"product_id":"A","name":"Pain","unit_price":"4.50","image":null,"quantity":1},
            {"product_id":"A","name":"Pain","unit_price":"4.50","image":null,"quantity":2}
        ]"#;
        assert!(serde_json::from_str::<Cart>(json).is_err());
    }

    #[test]
    fn test_corrupt_payload_zero_quantity_rejected() {
        let json = r#"[
            {"product_id":"A","name":"Pain","unit_price":"4.50","image":null,"quantity":0}
        ]"#;
        assert!(serde_json::from_str::<Cart>(json).is_err());
    }
}
