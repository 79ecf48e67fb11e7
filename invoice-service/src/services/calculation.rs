//! Invoice arithmetic and numbering.

use crate::models::ItemInput;
use rust_decimal::Decimal;
use service_core::models::Item;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Totals {
    pub subtotal: Decimal,
    pub tax_amount: Decimal,
    pub total: Decimal,
}

/// Stored items with each line's `total` set to quantity × unit price.
pub fn price_items(inputs: &[ItemInput]) -> Vec<Item> {
    inputs
        .iter()
        .map(|input| Item {
            description: input.description.clone(),
            quantity: input.quantity,
            unit_price: input.unit_price,
            total: Decimal::from(input.quantity) * input.unit_price,
        })
        .collect()
}

/// `total = subtotal + subtotal × tax / 100 − discount`. A discount larger
/// than the taxed subtotal yields a negative total.
pub fn compute_totals(items: &[Item], tax_percent: Decimal, discount: Decimal) -> Totals {
    let subtotal: Decimal = items.iter().map(Item::line_total).sum();
    let tax_amount = subtotal * tax_percent / Decimal::ONE_HUNDRED;
    Totals {
        subtotal,
        tax_amount,
        total: subtotal + tax_amount - discount,
    }
}

/// `LIKE` pattern matching every number issued in `year`.
pub fn invoice_number_pattern(year: i32) -> String {
    format!("INV-{}-%", year)
}

/// `existing` is how many numbers already exist for the year.
pub fn format_invoice_number(year: i32, existing: usize) -> String {
    format!("INV-{}-{:04}", year, existing + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn input(quantity: u32, unit_price: Decimal) -> ItemInput {
        ItemInput {
            description: "Work".to_string(),
            quantity,
            unit_price,
        }
    }

    #[test]
    fn totals_apply_tax_then_discount() {
        let items = price_items(&[input(2, dec!(50)), input(1, dec!(100))]);
        assert_eq!(items[0].total, dec!(100));

        let totals = compute_totals(&items, dec!(10), dec!(20));
        assert_eq!(totals.subtotal, dec!(200));
        assert_eq!(totals.tax_amount, dec!(20));
        assert_eq!(totals.total, dec!(200));
    }

    #[test]
    fn fractional_tax_keeps_precision() {
        let items = price_items(&[input(3, dec!(33.33))]);
        let totals = compute_totals(&items, dec!(11), Decimal::ZERO);
        assert_eq!(totals.subtotal, dec!(99.99));
        assert_eq!(totals.tax_amount, dec!(10.9989));
        assert_eq!(totals.total, dec!(110.9889));
    }

    #[test]
    fn large_discount_goes_negative() {
        let items = price_items(&[input(1, dec!(10))]);
        let totals = compute_totals(&items, Decimal::ZERO, dec!(25));
        assert_eq!(totals.total, dec!(-15));
    }

    #[test]
    fn zero_quantity_contributes_nothing() {
        let items = price_items(&[input(0, dec!(999))]);
        assert_eq!(compute_totals(&items, dec!(10), Decimal::ZERO).total, Decimal::ZERO);
    }

    #[test]
    fn numbers_are_zero_padded_per_year() {
        assert_eq!(format_invoice_number(2026, 0), "INV-2026-0001");
        assert_eq!(format_invoice_number(2026, 41), "INV-2026-0042");
        assert_eq!(format_invoice_number(2026, 12345), "INV-2026-12346");
        assert_eq!(invoice_number_pattern(2026), "INV-2026-%");
    }
}
