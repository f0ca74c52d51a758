//! # Money Module
//!
//! Provides the `Money` type and the MoneyMath primitives: the only sanctioned
//! arithmetic for monetary values in Folio.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In JavaScript/floating point:                                          │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  Summing three line items of $0.10 must print $0.30, every time.        │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents + Round After Every Step                   │
//! │    money_add(10¢, 10¢) = 20¢, money_add(20¢, 10¢) = 30¢                 │
//! │    Multiplications go through Decimal and are re-rounded immediately    │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Primitives
//! | Function           | Meaning                                  |
//! |--------------------|------------------------------------------|
//! | [`round_money`]    | Decimal → cents, half away from zero     |
//! | [`money_add`]      | `round(a + b)`                           |
//! | [`money_subtract`] | `round(a - b)`                           |
//! | [`money_multiply`] | `round(a × b)` (rate × qty, percentages) |
//!
//! ## Usage
//! ```rust
//! use folio_core::money::{money_add, round_money, Money};
//! use rust_decimal::Decimal;
//!
//! let rate = Money::from_cents(2550); // $25.50
//! let amount = rate.multiply(Decimal::from(2));
//! assert_eq!(amount.cents(), 5100);
//!
//! let total = money_add(amount, Money::from_cents(99));
//! assert_eq!(total, round_money(Decimal::new(5199, 2)));
//! ```

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};
use ts_rs::TS;

/// Number of fractional digits kept for every monetary value.
pub const MONEY_DECIMAL_PLACES: u32 = 2;

const CENTS_PER_UNIT: i64 = 100;

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in the smallest currency unit (cents).
///
/// ## Design Decisions
/// - **i64 (signed)**: Negative values are legal. A fixed discount larger than
///   the subtotal produces a negative after-discount base and negative tax.
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **Serialized as cents**: The UI converts to major units for display
///
/// ## User Workflow Context
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                    Where Money is Used                                  │
/// │                                                                         │
/// │  LineItem.quantity × LineItem.rate ──► LineItem.amount                  │
/// │                                            │                            │
/// │  Σ amounts ──► subtotal ──► discount ──► tax ──► total                  │
/// │                                                     │                   │
/// │  Invoice.total - Invoice.amount_paid ──► outstanding (dashboard)        │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize, TS,
)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use folio_core::money::Money;
    ///
    /// let price = Money::from_cents(1099); // Represents $10.99
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from major and minor units.
    ///
    /// For negative amounts only the major unit carries the sign:
    /// `from_major_minor(-5, 50)` is -$5.50.
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        if major < 0 {
            Money(major * CENTS_PER_UNIT - minor)
        } else {
            Money(major * CENTS_PER_UNIT + minor)
        }
    }

    /// Rounds an arbitrary decimal amount to the nearest cent.
    ///
    /// Same as [`round_money`].
    #[inline]
    pub fn from_decimal(value: Decimal) -> Self {
        round_money(value)
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit portion (truncated toward zero).
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / CENTS_PER_UNIT
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % CENTS_PER_UNIT).abs()
    }

    /// Returns the exact decimal value in major units (`1099` → `10.99`).
    #[inline]
    pub fn as_decimal(&self) -> Decimal {
        Decimal::new(self.0, MONEY_DECIMAL_PLACES)
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Returns the absolute value.
    #[inline]
    pub const fn abs(&self) -> Self {
        Money(self.0.saturating_abs())
    }

    /// Multiplies by a decimal factor and rounds back to cents.
    ///
    /// Used for both `rate × quantity` and `subtotal × percent / 100`.
    ///
    /// ## Example
    /// ```rust
    /// use folio_core::money::Money;
    /// use rust_decimal::Decimal;
    ///
    /// let after_discount = Money::from_cents(11295); // $112.95
    /// let tax = after_discount.multiply(Decimal::new(8, 2)); // × 0.08
    /// // 9.036 → 9.04
    /// assert_eq!(tax.cents(), 904);
    /// ```
    #[inline]
    pub fn multiply(&self, factor: Decimal) -> Money {
        money_multiply(self.as_decimal(), factor)
    }
}

// =============================================================================
// MoneyMath Primitives
// =============================================================================

/// Rounds a decimal amount (in major units) to whole cents.
///
/// ## Rounding Rule
/// Half away from zero, so negatives mirror positives:
/// ```text
///    1.005 →  1.01        -1.005 → -1.01
///    1.004 →  1.00        -1.004 → -1.00
/// ```
///
/// Values beyond the `i64` cent range saturate instead of panicking.
///
/// ## Example
/// ```rust
/// use folio_core::money::round_money;
/// use rust_decimal::Decimal;
///
/// assert_eq!(round_money(Decimal::new(9036, 3)).cents(), 904);
/// assert_eq!(round_money(Decimal::new(-1005, 3)).cents(), -101);
/// ```
pub fn round_money(value: Decimal) -> Money {
    let rounded =
        value.round_dp_with_strategy(MONEY_DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero);

    let cents = rounded
        .checked_mul(Decimal::from(CENTS_PER_UNIT))
        .and_then(|c| c.to_i64());

    match cents {
        Some(cents) => Money(cents),
        None if value.is_sign_negative() => Money(i64::MIN),
        None => Money(i64::MAX),
    }
}

/// Adds two amounts: `round(a + b)`.
///
/// Both operands are already whole cents, so the sum is exact; it saturates
/// at the `i64` bounds.
#[inline]
pub fn money_add(a: Money, b: Money) -> Money {
    Money(a.0.saturating_add(b.0))
}

/// Subtracts two amounts: `round(a - b)`. May go negative.
#[inline]
pub fn money_subtract(a: Money, b: Money) -> Money {
    Money(a.0.saturating_sub(b.0))
}

/// Multiplies two decimals and rounds the product to cents: `round(a × b)`.
///
/// ## Example
/// ```rust
/// use folio_core::money::money_multiply;
/// use rust_decimal::Decimal;
///
/// // quantity 3 × rate 0.10
/// let amount = money_multiply(Decimal::from(3), Decimal::new(10, 2));
/// assert_eq!(amount.cents(), 30);
/// ```
pub fn money_multiply(a: Decimal, b: Decimal) -> Money {
    match a.checked_mul(b) {
        Some(product) => round_money(product),
        None if a.is_sign_negative() != b.is_sign_negative() => Money(i64::MIN),
        None => Money(i64::MAX),
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Debug-friendly rendering such as `-$5.50`.
///
/// ## Note
/// Use frontend formatting for actual UI display to handle localization.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(
            f,
            "{}${}.{:02}",
            sign,
            self.major().abs(),
            self.cents_part()
        )
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        money_add(self, other)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        *self = money_add(*self, other);
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        money_subtract(self, other)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        *self = money_subtract(*self, other);
    }
}

impl Neg for Money {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Money(self.0.saturating_neg())
    }
}

/// Summation folds through [`money_add`], re-rounding at every step.
impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), money_add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(1099);
        assert_eq!(money.cents(), 1099);
        assert_eq!(money.major(), 10);
        assert_eq!(money.cents_part(), 99);
    }

    #[test]
    fn test_from_major_minor() {
        assert_eq!(Money::from_major_minor(10, 99).cents(), 1099);
        assert_eq!(Money::from_major_minor(-5, 50).cents(), -550);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_cents(1099)), "$10.99");
        assert_eq!(format!("{}", Money::from_cents(500)), "$5.00");
        assert_eq!(format!("{}", Money::from_cents(-550)), "-$5.50");
        assert_eq!(format!("{}", Money::from_cents(-5)), "-$0.05");
        assert_eq!(format!("{}", Money::zero()), "$0.00");
    }

    #[test]
    fn test_as_decimal() {
        assert_eq!(Money::from_cents(12550).as_decimal(), dec!(125.50));
        assert_eq!(Money::from_cents(-1).as_decimal(), dec!(-0.01));
    }

    #[test]
    fn test_round_money_half_away_from_zero() {
        assert_eq!(round_money(dec!(1.005)).cents(), 101);
        assert_eq!(round_money(dec!(1.004)).cents(), 100);
        assert_eq!(round_money(dec!(-1.005)).cents(), -101);
        assert_eq!(round_money(dec!(-1.004)).cents(), -100);
        assert_eq!(round_money(dec!(9.036)).cents(), 904);
        assert_eq!(round_money(dec!(0.125)).cents(), 13);
    }

    #[test]
    fn test_round_money_is_idempotent() {
        for value in [dec!(0.125), dec!(-7.555), dec!(12345.678), dec!(0)] {
            let once = round_money(value);
            let twice = round_money(once.as_decimal());
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn test_round_money_saturates() {
        assert_eq!(round_money(Decimal::MAX).cents(), i64::MAX);
        assert_eq!(round_money(Decimal::MIN).cents(), i64::MIN);
    }

    #[test]
    fn test_chained_addition_has_no_drift() {
        let dime = money_multiply(dec!(1), dec!(0.1));
        let total = money_add(money_add(dime, dime), dime);
        assert_eq!(total.cents(), 30);
        assert_eq!(total.as_decimal(), dec!(0.30));
    }

    #[test]
    fn test_subtract_can_go_negative() {
        let result = money_subtract(Money::from_cents(1000), Money::from_cents(2500));
        assert_eq!(result.cents(), -1500);
        assert!(result.is_negative());
    }

    #[test]
    fn test_multiply_rounds_immediately() {
        assert_eq!(money_multiply(dec!(2), dec!(50.00)).cents(), 10000);
        assert_eq!(money_multiply(dec!(1), dec!(25.50)).cents(), 2550);
        assert_eq!(money_multiply(dec!(0.333), dec!(10)).cents(), 333);
        assert_eq!(Money::from_cents(12550).multiply(dec!(0.1)).cents(), 1255);
    }

    #[test]
    fn test_operators_delegate_to_money_math() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a - b).cents(), 500);
        assert_eq!((-a).cents(), -1000);

        let mut c = a;
        c += b;
        c -= Money::from_cents(1);
        assert_eq!(c.cents(), 1499);
    }

    #[test]
    fn test_sum() {
        let amounts = vec![
            Money::from_cents(10),
            Money::from_cents(10),
            Money::from_cents(10),
        ];
        let total: Money = amounts.iter().sum();
        assert_eq!(total.cents(), 30);

        let empty: Vec<Money> = Vec::new();
        assert_eq!(empty.into_iter().sum::<Money>(), Money::zero());
    }

    #[test]
    fn test_zero_and_checks() {
        assert!(Money::zero().is_zero());
        assert!(Money::from_cents(100).is_positive());
        assert!(Money::from_cents(-100).is_negative());
        assert_eq!(Money::from_cents(-550).abs().cents(), 550);
    }

    #[test]
    fn test_serializes_as_cents() {
        let json = serde_json::to_string(&Money::from_cents(12199)).unwrap();
        assert_eq!(json, "12199");
        let back: Money = serde_json::from_str("-42").unwrap();
        assert_eq!(back.cents(), -42);
    }
}
