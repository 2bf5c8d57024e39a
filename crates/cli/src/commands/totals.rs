//! Order totals calculator.
//!
//! Runs line items through the same cart and shipping rules the checkout
//! uses, without touching any backend.

use rust_decimal::Decimal;

use qorikusi_core::{CurrencyCode, Price, ProductId};
use qorikusi_storefront::cart::Cart;
use qorikusi_storefront::checkout::{OrderTotals, ShippingPolicy};
use qorikusi_storefront::models::Product;

use super::CliError;

/// Parse a `<PRICE>x<QTY>` line item. A bare price means quantity one.
fn parse_line_item(raw: &str) -> Result<(Decimal, i64), CliError> {
    let invalid = || CliError::InvalidLineItem(raw.to_string());
    let (price, quantity) = raw
        .trim()
        .rsplit_once(['x', 'X', '*'])
        .unwrap_or((raw.trim(), "1"));

    let price: Decimal = price.trim().parse().map_err(|_| invalid())?;
    let quantity: i64 = quantity.trim().parse().map_err(|_| invalid())?;
    if price.is_sign_negative() {
        return Err(invalid());
    }
    Ok((price, quantity))
}

fn build_cart(items: &[String]) -> Result<Cart, CliError> {
    let mut cart = Cart::new();
    for (index, raw) in items.iter().enumerate() {
        let (price, quantity) = parse_line_item(raw)?;
        let product = Product {
            id: ProductId::random(),
            name: format!("Item {}", index + 1),
            description: String::new(),
            price,
            category: String::new(),
            energy: None,
            stock: u32::MAX,
            image: String::new(),
        };
        cart.add(product, quantity);
    }
    Ok(cart)
}

/// Compute the totals for `items` under the given shipping rules.
///
/// # Errors
///
/// Returns `CliError::InvalidLineItem` for a malformed item.
pub fn compute(items: &[String], policy: &ShippingPolicy) -> Result<(Cart, OrderTotals), CliError> {
    let cart = build_cart(items)?;
    let totals = cart.totals(policy);
    Ok((cart, totals))
}

/// Print the subtotal, shipping and total for `items`.
///
/// # Errors
///
/// Returns `CliError::InvalidLineItem` for a malformed item.
pub fn run(
    items: &[String],
    free_shipping_threshold: Decimal,
    flat_shipping_cost: Decimal,
    currency: CurrencyCode,
) -> Result<(), CliError> {
    let policy = ShippingPolicy::new(free_shipping_threshold, flat_shipping_cost);
    let (cart, totals) = compute(items, &policy)?;

    for item in cart.items() {
        tracing::info!(
            "{}: {} x {}",
            item.product.name,
            item.quantity(),
            Price::new(item.product.price, currency)
        );
    }

    let [subtotal, shipping, total] = totals.display(currency);
    tracing::info!("Subtotal: {subtotal}");
    tracing::info!("Shipping: {shipping}");
    tracing::info!("Total:    {total}");

    if !totals.is_free_shipping() {
        let remaining = policy.remaining_for_free_shipping(totals.subtotal);
        tracing::info!(
            "Add {} more for free shipping",
            Price::new(remaining, currency)
        );
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn items(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn test_parse_line_item() {
        assert_eq!(parse_line_item("180x2").unwrap(), (dec!(180), 2));
        assert_eq!(parse_line_item(" 59.90 X 3 ").unwrap(), (dec!(59.90), 3));
        assert_eq!(parse_line_item("45").unwrap(), (dec!(45), 1));
    }

    #[test]
    fn test_parse_line_item_rejects_garbage() {
        assert!(matches!(
            parse_line_item("abcx2"),
            Err(CliError::InvalidLineItem(raw)) if raw == "abcx2"
        ));
        assert!(parse_line_item("10xtwo").is_err());
        assert!(parse_line_item("-5x1").is_err());
    }

    #[test]
    fn test_below_threshold_pays_shipping() {
        let (_, totals) = compute(&items(&["120x2"]), &ShippingPolicy::default()).unwrap();
        assert_eq!(totals.subtotal, dec!(240));
        assert_eq!(totals.shipping_fee, dec!(15));
        assert_eq!(totals.total, dec!(255));
    }

    #[test]
    fn test_threshold_is_free() {
        let (_, totals) =
            compute(&items(&["180x1", "70x1"]), &ShippingPolicy::default()).unwrap();
        assert_eq!(totals.total, dec!(250));
        assert!(totals.is_free_shipping());
    }

    #[test]
    fn test_quantities_are_clamped() {
        let (cart, totals) = compute(&items(&["10x500"]), &ShippingPolicy::default()).unwrap();
        assert_eq!(cart.total_items(), 99);
        assert_eq!(totals.subtotal, dec!(990));
    }
}
