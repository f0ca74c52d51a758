//! # Invoice Totals
//!
//! Derives the canonical four-number summary of an invoice from its line
//! items, discount and tax rate.
//!
//! ## Calculation Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Invoice Totals Pipeline                            │
//! │                                                                         │
//! │  line amounts ──► subtotal = Σ money_add                               │
//! │                        │                                                │
//! │                        ▼                                                │
//! │  discount ──────► discount_amount                                      │
//! │    none        →  0                                                     │
//! │    percentage  →  money_multiply(subtotal, value / 100)                │
//! │    fixed       →  round_money(value)                                   │
//! │                        │                                                │
//! │                        ▼                                                │
//! │  after_discount = money_subtract(subtotal, discount_amount)   (≥0 NOT  │
//! │                        │                                       forced) │
//! │                        ▼                                                │
//! │  tax_amount = money_multiply(after_discount, tax_rate / 100)           │
//! │                        │                                                │
//! │                        ▼                                                │
//! │  total = money_add(after_discount, tax_amount)                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The live preview endpoint and the persistence path both call
//! [`InvoiceTotals::calculate`], so identical inputs always give identical
//! stored values.
//!
//! ## Example
//! ```rust
//! use folio_core::totals::InvoiceTotals;
//! use folio_core::types::{Discount, LineItem, Percentage};
//! use rust_decimal::Decimal;
//!
//! let items = vec![
//!     LineItem::new("Design", Decimal::from(2), Decimal::new(5000, 2), 0),
//!     LineItem::new("Hosting", Decimal::ONE, Decimal::new(2550, 2), 1),
//! ];
//! let discount = Discount::Percentage { value: Decimal::TEN };
//! let totals = InvoiceTotals::calculate(&items, &discount, Percentage::new(Decimal::from(8)));
//!
//! assert_eq!(totals.subtotal.cents(), 12550);
//! assert_eq!(totals.discount_amount.cents(), 1255);
//! assert_eq!(totals.tax_amount.cents(), 904);
//! assert_eq!(totals.total.cents(), 12199);
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::{money_add, money_subtract, round_money, Money};
use crate::types::{Discount, LineItem, Percentage};

/// Subtotal, discount, tax and grand total of an invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct InvoiceTotals {
    pub subtotal: Money,
    pub discount_amount: Money,
    pub tax_amount: Money,
    pub total: Money,
}

impl InvoiceTotals {
    /// Computes totals for a set of line items.
    ///
    /// Only `item.amount` is read; callers that accept client input rebuild
    /// items with [`LineItem::new`] first.
    pub fn calculate(items: &[LineItem], discount: &Discount, tax_rate: Percentage) -> Self {
        Self::from_amounts(items.iter().map(|item| item.amount), discount, tax_rate)
    }

    /// Computes totals from bare line amounts.
    ///
    /// An empty iterator yields all-zero totals.
    pub fn from_amounts<I>(amounts: I, discount: &Discount, tax_rate: Percentage) -> Self
    where
        I: IntoIterator<Item = Money>,
    {
        let subtotal = amounts.into_iter().fold(Money::zero(), money_add);
        let discount_amount = resolve_discount(subtotal, discount);
        let after_discount = money_subtract(subtotal, discount_amount);
        let tax_amount = after_discount.multiply(tax_rate.fraction());
        let total = money_add(after_discount, tax_amount);

        InvoiceTotals {
            subtotal,
            discount_amount,
            tax_amount,
            total,
        }
    }

    /// The base tax is computed on: `subtotal - discount_amount`.
    #[inline]
    pub fn after_discount(&self) -> Money {
        money_subtract(self.subtotal, self.discount_amount)
    }
}

/// Resolves a discount configuration to a concrete amount.
///
/// Percentage values are not capped here; validation keeps them in 0..=100.
pub fn resolve_discount(subtotal: Money, discount: &Discount) -> Money {
    match discount {
        Discount::None => Money::zero(),
        Discount::Percentage { value } => subtotal.multiply(Percentage::new(*value).fraction()),
        Discount::Fixed { value } => round_money(*value),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn items(specs: &[(Decimal, Decimal)]) -> Vec<LineItem> {
        specs
            .iter()
            .enumerate()
            .map(|(i, (qty, rate))| LineItem::new(format!("Item {}", i), *qty, *rate, i as u32))
            .collect()
    }

    fn pct(value: Decimal) -> Percentage {
        Percentage::new(value)
    }

    #[test]
    fn test_end_to_end_scenario() {
        let items = items(&[(dec!(2), dec!(50.00)), (dec!(1), dec!(25.50))]);
        let totals = InvoiceTotals::calculate(
            &items,
            &Discount::Percentage { value: dec!(10) },
            pct(dec!(8)),
        );

        assert_eq!(totals.subtotal.as_decimal(), dec!(125.50));
        assert_eq!(totals.discount_amount.as_decimal(), dec!(12.55));
        assert_eq!(totals.after_discount().as_decimal(), dec!(112.95));
        assert_eq!(totals.tax_amount.as_decimal(), dec!(9.04));
        assert_eq!(totals.total.as_decimal(), dec!(121.99));
    }

    #[test]
    fn test_three_dimes_sum_exactly() {
        let items = items(&[(dec!(1), dec!(0.1)), (dec!(1), dec!(0.1)), (dec!(1), dec!(0.1))]);
        let totals = InvoiceTotals::calculate(&items, &Discount::None, Percentage::zero());

        assert_eq!(totals.subtotal.as_decimal(), dec!(0.30));
        assert_eq!(totals.total.as_decimal(), dec!(0.30));
    }

    #[test]
    fn test_no_discount_is_always_zero() {
        let items = items(&[(dec!(3), dec!(19.99))]);
        let totals = InvoiceTotals::calculate(&items, &Discount::None, pct(dec!(20)));

        assert_eq!(totals.discount_amount, Money::zero());
        assert_eq!(totals.after_discount(), totals.subtotal);
    }

    #[test]
    fn test_full_percentage_discount_equals_subtotal() {
        let items = items(&[(dec!(7), dec!(13.37))]);
        let totals = InvoiceTotals::calculate(
            &items,
            &Discount::Percentage { value: dec!(100) },
            pct(dec!(10)),
        );

        assert_eq!(totals.discount_amount, totals.subtotal);
        assert_eq!(totals.tax_amount, Money::zero());
        assert_eq!(totals.total, Money::zero());
    }

    #[test]
    fn test_tax_is_applied_after_discount() {
        let items = items(&[(dec!(1), dec!(100))]);
        let totals = InvoiceTotals::calculate(
            &items,
            &Discount::Fixed { value: dec!(10) },
            pct(dec!(10)),
        );

        assert_eq!(totals.subtotal.as_decimal(), dec!(100));
        assert_eq!(totals.discount_amount.as_decimal(), dec!(10));
        assert_eq!(totals.after_discount().as_decimal(), dec!(90));
        assert_eq!(totals.tax_amount.as_decimal(), dec!(9));
        assert_eq!(totals.total.as_decimal(), dec!(99));
        assert_ne!(totals.total.as_decimal(), dec!(100));
    }

    #[test]
    fn test_fixed_discount_above_subtotal_goes_negative() {
        // Not clamped: negative base, negative tax, negative total.
        let items = items(&[(dec!(1), dec!(50))]);
        let totals = InvoiceTotals::calculate(
            &items,
            &Discount::Fixed { value: dec!(80) },
            pct(dec!(10)),
        );

        assert_eq!(totals.after_discount().as_decimal(), dec!(-30));
        assert_eq!(totals.tax_amount.as_decimal(), dec!(-3));
        assert_eq!(totals.total.as_decimal(), dec!(-33));
    }

    #[test]
    fn test_fixed_discount_is_rounded() {
        let items = items(&[(dec!(1), dec!(10))]);
        let totals = InvoiceTotals::calculate(
            &items,
            &Discount::Fixed { value: dec!(1.005) },
            Percentage::zero(),
        );
        assert_eq!(totals.discount_amount.cents(), 101);
        assert_eq!(totals.total.cents(), 899);
    }

    #[test]
    fn test_empty_items_yield_zero() {
        let totals = InvoiceTotals::calculate(
            &[],
            &Discount::Percentage { value: dec!(50) },
            pct(dec!(25)),
        );
        assert_eq!(totals, InvoiceTotals::default());
    }

    #[test]
    fn test_recalculation_is_identical() {
        let items = items(&[(dec!(0.333), dec!(17.77)), (dec!(12), dec!(0.99))]);
        let discount = Discount::Percentage { value: dec!(12.5) };

        let preview = InvoiceTotals::calculate(&items, &discount, pct(dec!(7.25)));
        let submit = InvoiceTotals::calculate(&items, &discount, pct(dec!(7.25)));
        assert_eq!(preview, submit);
    }

    #[test]
    fn test_from_amounts_matches_calculate() {
        let items = items(&[(dec!(2), dec!(50.00)), (dec!(1), dec!(25.50))]);
        let discount = Discount::Fixed { value: dec!(5) };

        assert_eq!(
            InvoiceTotals::calculate(&items, &discount, pct(dec!(8))),
            InvoiceTotals::from_amounts(items.iter().map(|i| i.amount), &discount, pct(dec!(8)))
        );
    }
}
