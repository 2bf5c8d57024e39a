//! Shopping cart.
//!
//! Quantities are always clamped to `1..=99`; out-of-range input is
//! corrected, never rejected.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use qorikusi_core::ProductId;

use crate::checkout::{OrderTotals, ShippingPolicy};
use crate::models::Product;

pub const MIN_QUANTITY: u32 = 1;
pub const MAX_QUANTITY: u32 = 99;

/// Clamp a requested quantity into `MIN_QUANTITY..=MAX_QUANTITY`.
#[must_use]
pub fn clamp_quantity(quantity: i64) -> u32 {
    let clamped = quantity.clamp(i64::from(MIN_QUANTITY), i64::from(MAX_QUANTITY));
    u32::try_from(clamped).unwrap_or(MIN_QUANTITY)
}

/// One product line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub product: Product,
    quantity: u32,
}

impl CartItem {
    #[must_use]
    pub fn new(product: Product, quantity: i64) -> Self {
        Self {
            product,
            quantity: clamp_quantity(quantity),
        }
    }

    #[must_use]
    pub const fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn set_quantity(&mut self, quantity: i64) {
        self.quantity = clamp_quantity(quantity);
    }

    /// `price × quantity`.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.product.price * Decimal::from(self.quantity)
    }
}

/// The shopper's cart, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `quantity` of `product`, merging with an existing line.
    pub fn add(&mut self, product: Product, quantity: i64) {
        let quantity = i64::from(clamp_quantity(quantity));
        match self.find_mut(product.id) {
            Some(item) => item.set_quantity(i64::from(item.quantity) + quantity),
            None => self.items.push(CartItem::new(product, quantity)),
        }
    }

    /// Returns `false` if the product is not in the cart.
    pub fn increment(&mut self, id: ProductId) -> bool {
        self.update(id, |q| q + 1)
    }

    /// Never drops below one; use [`Cart::remove`] to delete a line.
    pub fn decrement(&mut self, id: ProductId) -> bool {
        self.update(id, |q| q - 1)
    }

    pub fn set_quantity(&mut self, id: ProductId, quantity: i64) -> bool {
        self.update(id, |_| quantity)
    }

    pub fn remove(&mut self, id: ProductId) -> Option<CartItem> {
        let index = self.items.iter().position(|item| item.product.id == id)?;
        Some(self.items.remove(index))
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<&CartItem> {
        self.items.iter().find(|item| item.product.id == id)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of quantities across all lines.
    #[must_use]
    pub fn total_items(&self) -> u32 {
        self.items.iter().map(CartItem::quantity).sum()
    }

    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.items.iter().map(CartItem::line_total).sum()
    }

    #[must_use]
    pub fn totals(&self, policy: &ShippingPolicy) -> OrderTotals {
        policy.totals(self.subtotal())
    }

    fn find_mut(&mut self, id: ProductId) -> Option<&mut CartItem> {
        self.items.iter_mut().find(|item| item.product.id == id)
    }

    fn update(&mut self, id: ProductId, f: impl FnOnce(i64) -> i64) -> bool {
        let Some(item) = self.find_mut(id) else {
            return false;
        };
        item.set_quantity(f(i64::from(item.quantity)));
        true
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    fn product(name: &str, price: Decimal) -> Product {
        Product {
            id: ProductId::random(),
            name: name.to_string(),
            description: String::new(),
            price,
            category: "Collares".to_string(),
            energy: None,
            stock: 10,
            image: String::new(),
        }
    }

    #[test]
    fn test_clamp_quantity() {
        assert_eq!(clamp_quantity(0), 1);
        assert_eq!(clamp_quantity(-5), 1);
        assert_eq!(clamp_quantity(1), 1);
        assert_eq!(clamp_quantity(42), 42);
        assert_eq!(clamp_quantity(99), 99);
        assert_eq!(clamp_quantity(150), 99);
    }

    #[test]
    fn test_add_merges_lines() {
        let mut cart = Cart::new();
        let inti = product("Collar Inti", dec!(180));
        cart.add(inti.clone(), 2);
        cart.add(inti.clone(), 3);

        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.get(inti.id).unwrap().quantity(), 5);
    }

    #[test]
    fn test_merge_is_clamped() {
        let mut cart = Cart::new();
        let inti = product("Collar Inti", dec!(180));
        cart.add(inti.clone(), 90);
        cart.add(inti.clone(), 20);
        assert_eq!(cart.get(inti.id).unwrap().quantity(), 99);
    }

    #[test]
    fn test_increment_decrement_stay_in_range() {
        let mut cart = Cart::new();
        let inti = product("Collar Inti", dec!(180));
        cart.add(inti.clone(), 1);

        assert!(cart.decrement(inti.id));
        assert_eq!(cart.get(inti.id).unwrap().quantity(), 1);

        cart.set_quantity(inti.id, 99);
        assert!(cart.increment(inti.id));
        assert_eq!(cart.get(inti.id).unwrap().quantity(), 99);

        assert!(!cart.increment(ProductId::random()));
    }

    #[test]
    fn test_subtotal_and_totals() {
        let mut cart = Cart::new();
        cart.add(product("Collar Inti", dec!(180)), 2);
        cart.add(product("Anillo Lunar", dec!(200)), 1);

        assert_eq!(cart.total_items(), 3);
        assert_eq!(cart.subtotal(), dec!(560));

        let totals = cart.totals(&ShippingPolicy::default());
        assert_eq!(totals.shipping_fee, Decimal::ZERO);
        assert_eq!(totals.total, dec!(560));
    }

    #[test]
    fn test_remove_and_clear() {
        let mut cart = Cart::new();
        let inti = product("Collar Inti", dec!(180));
        cart.add(inti.clone(), 1);
        cart.add(product("Anillo Lunar", dec!(200)), 1);

        assert_eq!(cart.remove(inti.id).unwrap().product.name, "Collar Inti");
        assert!(cart.remove(inti.id).is_none());
        assert_eq!(cart.items().len(), 1);

        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(cart.subtotal(), Decimal::ZERO);
    }
}
