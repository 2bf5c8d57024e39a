//! Order totals.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use qorikusi_core::{CurrencyCode, Price, round_money};

/// Subtotal at or above which shipping is free.
pub const DEFAULT_FREE_SHIPPING_THRESHOLD: Decimal = dec!(250);
/// Shipping fee below the threshold.
pub const DEFAULT_FLAT_SHIPPING_COST: Decimal = dec!(15);

/// How shipping is charged. Shared by the cart and checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingPolicy {
    pub free_shipping_threshold: Decimal,
    pub flat_shipping_cost: Decimal,
}

impl Default for ShippingPolicy {
    fn default() -> Self {
        Self {
            free_shipping_threshold: DEFAULT_FREE_SHIPPING_THRESHOLD,
            flat_shipping_cost: DEFAULT_FLAT_SHIPPING_COST,
        }
    }
}

impl ShippingPolicy {
    #[must_use]
    pub const fn new(free_shipping_threshold: Decimal, flat_shipping_cost: Decimal) -> Self {
        Self {
            free_shipping_threshold,
            flat_shipping_cost,
        }
    }

    /// Zero when `subtotal` reaches the threshold, the flat cost otherwise.
    #[must_use]
    pub fn shipping_fee(&self, subtotal: Decimal) -> Decimal {
        if subtotal >= self.free_shipping_threshold {
            Decimal::ZERO
        } else {
            self.flat_shipping_cost
        }
    }

    /// How much more the shopper must spend for free shipping.
    #[must_use]
    pub fn remaining_for_free_shipping(&self, subtotal: Decimal) -> Decimal {
        (self.free_shipping_threshold - subtotal).max(Decimal::ZERO)
    }

    #[must_use]
    pub fn totals(&self, subtotal: Decimal) -> OrderTotals {
        let shipping_fee = self.shipping_fee(subtotal);
        OrderTotals {
            subtotal,
            shipping_fee,
            total: subtotal + shipping_fee,
        }
    }
}

/// Subtotal, shipping and total for an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderTotals {
    pub subtotal: Decimal,
    pub shipping_fee: Decimal,
    pub total: Decimal,
}

impl OrderTotals {
    #[must_use]
    pub fn is_free_shipping(&self) -> bool {
        self.shipping_fee.is_zero()
    }

    /// The totals as display prices, rounded to cents.
    #[must_use]
    pub fn display(&self, currency: CurrencyCode) -> [String; 3] {
        [self.subtotal, self.shipping_fee, self.total]
            .map(|amount| Price::new(round_money(amount), currency).display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_below_threshold_pays_flat_fee() {
        let totals = ShippingPolicy::default().totals(dec!(240));
        assert_eq!(totals.shipping_fee, dec!(15));
        assert_eq!(totals.total, dec!(255));
        assert!(!totals.is_free_shipping());
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let totals = ShippingPolicy::default().totals(dec!(250));
        assert_eq!(totals.shipping_fee, Decimal::ZERO);
        assert_eq!(totals.total, dec!(250));

        assert_eq!(ShippingPolicy::default().totals(dec!(260)).total, dec!(260));
    }

    #[test]
    fn test_empty_order_still_pays_shipping() {
        assert_eq!(ShippingPolicy::default().totals(Decimal::ZERO).total, dec!(15));
    }

    #[test]
    fn test_custom_policy() {
        let policy = ShippingPolicy::new(dec!(100), dec!(9.90));
        assert_eq!(policy.totals(dec!(99.99)).total, dec!(109.89));
        assert_eq!(policy.remaining_for_free_shipping(dec!(60)), dec!(40));
        assert_eq!(policy.remaining_for_free_shipping(dec!(160)), Decimal::ZERO);
    }

    #[test]
    fn test_display() {
        let totals = ShippingPolicy::default().totals(dec!(240));
        assert_eq!(
            totals.display(CurrencyCode::PEN),
            ["S/ 240.00", "S/ 15.00", "S/ 255.00"]
        );
    }
}
