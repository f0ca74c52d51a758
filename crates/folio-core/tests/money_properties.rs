//! Property tests for money rounding, invoice totals and trends.

use folio_core::money::{money_add, money_multiply, money_subtract, round_money, Money};
use folio_core::stats::trend_percentage;
use folio_core::totals::InvoiceTotals;
use folio_core::types::{Discount, Percentage};
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Decimal with up to four fractional digits in ±1,000,000.
fn amount() -> impl Strategy<Value = Decimal> {
    (-10_000_000_000i64..10_000_000_000i64).prop_map(|raw| Decimal::new(raw, 4))
}

fn cents() -> impl Strategy<Value = Money> {
    (0i64..1_000_000_000i64).prop_map(Money::from_cents)
}

proptest! {
    /// Rounding is idempotent and stays within half a cent.
    #[test]
    fn test_round_money_idempotent(value in amount()) {
        let once = round_money(value);
        prop_assert_eq!(round_money(once.as_decimal()), once);
        prop_assert!((once.as_decimal() - value).abs() <= dec!(0.005));
    }

    /// Rounding is symmetric around zero.
    #[test]
    fn test_round_money_symmetric(value in amount()) {
        prop_assert_eq!(round_money(-value), -round_money(value));
    }

    /// Add then subtract gets back to the start.
    #[test]
    fn test_add_subtract_inverse(a in cents(), b in cents()) {
        prop_assert_eq!(money_subtract(money_add(a, b), b), a);
        prop_assert_eq!(money_add(a, b), money_add(b, a));
    }

    /// Multiplication by one is rounding.
    #[test]
    fn test_multiply_by_one(value in amount()) {
        prop_assert_eq!(money_multiply(value, Decimal::ONE), round_money(value));
    }

    /// total == after_discount + tax, and a percentage discount never exceeds the subtotal.
    #[test]
    fn test_totals_are_consistent(
        lines in prop::collection::vec(cents(), 0..20),
        discount_pct in 0u32..=100u32,
        tax_pct in 0u32..=10000u32,
    ) {
        let discount = Discount::Percentage { value: Decimal::from(discount_pct) };
        let tax_rate = Percentage::new(Decimal::new(i64::from(tax_pct), 2));

        let totals = InvoiceTotals::from_amounts(lines.iter().copied(), &discount, tax_rate);

        prop_assert_eq!(totals.subtotal, lines.iter().sum::<Money>());
        prop_assert!(totals.discount_amount <= totals.subtotal);
        prop_assert!(!totals.tax_amount.is_negative());
        prop_assert_eq!(totals.total, money_add(totals.after_discount(), totals.tax_amount));
    }

    /// Trend sign follows the direction of change when the baseline is positive.
    #[test]
    fn test_trend_direction(current in 0u32..1_000_000u32, previous in 1u32..1_000_000u32) {
        let trend = trend_percentage(Decimal::from(current), Decimal::from(previous));
        if current > previous {
            prop_assert!(trend >= 0);
        } else if current < previous {
            prop_assert!(trend <= 0);
        } else {
            prop_assert_eq!(trend, 0);
        }
    }
}

#[test]
fn test_trend_zero_baseline() {
    assert_eq!(trend_percentage(dec!(0.01), Decimal::ZERO), 100);
    assert_eq!(trend_percentage(dec!(-5), Decimal::ZERO), 0);
}
