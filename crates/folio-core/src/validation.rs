//! # Validation Module
//!
//! Input validation for clients, invoices and payments.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: HTTP handler (folio-api)                                     │
//! │  ├── Type validation (serde deserialization)                           │
//! │  └── Non-finite numbers never parse into Decimal                       │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE: Business rule validation                        │
//! │  ├── Lengths, ranges, date order                                       │
//! │  └── Runs before totals are computed                                   │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL / UNIQUE constraints                                     │
//! │  └── Foreign key constraints                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use folio_core::validation::{validate_client_name, validate_quantity};
//! use rust_decimal::Decimal;
//!
//! validate_client_name("Acme Corp").unwrap();
//! validate_quantity(Decimal::from(5)).unwrap();
//! ```

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{Discount, Percentage};
use crate::{
    MAX_CLIENT_NAME_LEN, MAX_DESCRIPTION_LEN, MAX_FIXED_DISCOUNT, MAX_LINE_ITEMS, MAX_QUANTITY,
    MAX_RATE,
};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a client name.
///
/// ## Rules
/// - Must not be empty (after trimming)
/// - At most 200 characters
pub fn validate_client_name(name: &str) -> ValidationResult<()> {
    validate_text("name", name, MAX_CLIENT_NAME_LEN)
}

/// Validates a line item description (1..=500 characters).
pub fn validate_description(description: &str) -> ValidationResult<()> {
    validate_text("description", description, MAX_DESCRIPTION_LEN)
}

/// Validates the basic shape of an email address.
///
/// Only `local@domain.tld` shape is checked; deliverability is not.
///
/// ## Example
/// ```rust
/// use folio_core::validation::validate_email;
///
/// assert!(validate_email("billing@acme.io").is_ok());
/// assert!(validate_email("acme.io").is_err());
/// assert!(validate_email("a@b").is_err());
/// ```
pub fn validate_email(email: &str) -> ValidationResult<()> {
    let email = email.trim();
    let invalid = || ValidationError::InvalidFormat {
        field: "email".to_string(),
        reason: "must look like name@example.com".to_string(),
    };

    if email.is_empty() {
        return Err(ValidationError::Required {
            field: "email".to_string(),
        });
    }

    if email.chars().any(char::is_whitespace) {
        return Err(invalid());
    }

    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
    if local.is_empty() || domain.contains('@') {
        return Err(invalid());
    }

    match domain.rsplit_once('.') {
        Some((host, tld)) if !host.is_empty() && !tld.is_empty() => Ok(()),
        _ => Err(invalid()),
    }
}

fn validate_text(field: &str, value: &str, max: usize) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a line item quantity.
///
/// ## Rules
/// - Must be positive (> 0); fractional quantities (hours) are allowed
/// - Must not exceed 1,000,000
pub fn validate_quantity(quantity: Decimal) -> ValidationResult<()> {
    if quantity <= Decimal::ZERO {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    check_range("quantity", quantity, Decimal::ZERO, Decimal::from(MAX_QUANTITY))
}

/// Validates a unit rate in major currency units.
///
/// Zero is allowed (complimentary line items).
pub fn validate_rate(rate: Decimal) -> ValidationResult<()> {
    check_range("rate", rate, Decimal::ZERO, Decimal::from(MAX_RATE))
}

/// Validates a tax rate (0% to 100%).
///
/// ## Example
/// ```rust
/// use folio_core::types::Percentage;
/// use folio_core::validation::validate_tax_rate;
/// use rust_decimal::Decimal;
///
/// assert!(validate_tax_rate(Percentage::new(Decimal::new(825, 2))).is_ok());
/// assert!(validate_tax_rate(Percentage::new(Decimal::from(101))).is_err());
/// ```
pub fn validate_tax_rate(rate: Percentage) -> ValidationResult<()> {
    check_range("taxRate", rate.value(), Decimal::ZERO, Decimal::ONE_HUNDRED)
}

/// Validates a discount configuration.
///
/// ## Rules
/// | Type       | Range                  |
/// |------------|------------------------|
/// | none       | always valid           |
/// | percentage | 0 ..= 100              |
/// | fixed      | 0 ..= 100,000,000      |
///
/// A fixed discount larger than the subtotal is valid; the totals go negative.
pub fn validate_discount(discount: &Discount) -> ValidationResult<()> {
    match discount {
        Discount::None => Ok(()),
        Discount::Percentage { value } => {
            check_range("discountValue", *value, Decimal::ZERO, Decimal::ONE_HUNDRED)
        }
        Discount::Fixed { value } => check_range(
            "discountValue",
            *value,
            Decimal::ZERO,
            Decimal::from(MAX_FIXED_DISCOUNT),
        ),
    }
}

/// Validates a payment amount. Must be strictly positive.
pub fn validate_payment_amount(amount: Money) -> ValidationResult<()> {
    if !amount.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: "amount".to_string(),
        });
    }

    Ok(())
}

fn check_range(field: &str, value: Decimal, min: Decimal, max: Decimal) -> ValidationResult<()> {
    if value < min || value > max {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min,
            max,
        });
    }

    Ok(())
}

// =============================================================================
// Collection & Date Validators
// =============================================================================

/// Validates the number of line items on an invoice (1..=100).
pub fn validate_line_item_count(count: usize) -> ValidationResult<()> {
    if count == 0 || count > MAX_LINE_ITEMS {
        return Err(ValidationError::InvalidCount {
            field: "items".to_string(),
            min: 1,
            max: MAX_LINE_ITEMS,
        });
    }

    Ok(())
}

/// Validates that the due date is not before the issue date.
pub fn validate_due_date(issue_date: NaiveDate, due_date: NaiveDate) -> ValidationResult<()> {
    if due_date < issue_date {
        return Err(ValidationError::DateOrder {
            field: "dueDate".to_string(),
            other: "issueDate".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// UUID Validators
// =============================================================================

/// Validates a UUID string format.
///
/// ## Example
/// ```rust
/// use folio_core::validation::validate_uuid;
///
/// assert!(validate_uuid("550e8400-e29b-41d4-a716-446655440000").is_ok());
/// assert!(validate_uuid("not-a-uuid").is_err());
/// ```
pub fn validate_uuid(id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "id".to_string(),
        });
    }

    uuid::Uuid::parse_str(id).map_err(|_| ValidationError::InvalidFormat {
        field: "id".to_string(),
        reason: "must be a valid UUID".to_string(),
    })?;

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_validate_client_name() {
        assert!(validate_client_name("Acme Corp").is_ok());
        assert!(validate_client_name("").is_err());
        assert!(validate_client_name("   ").is_err());
        assert!(validate_client_name(&"A".repeat(200)).is_ok());
        assert!(validate_client_name(&"A".repeat(201)).is_err());
    }

    #[test]
    fn test_length_counts_characters_not_bytes() {
        // 200 two-byte characters is still 200 characters
        assert!(validate_client_name(&"é".repeat(200)).is_ok());
    }

    #[test]
    fn test_validate_description() {
        assert!(validate_description("Consulting").is_ok());
        assert!(validate_description("").is_err());
        assert!(validate_description(&"x".repeat(501)).is_err());
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("billing@acme.io").is_ok());
        assert!(validate_email("first.last@mail.example.com").is_ok());

        assert!(validate_email("").is_err());
        assert!(validate_email("no-at-sign.com").is_err());
        assert!(validate_email("@acme.io").is_err());
        assert!(validate_email("a@@acme.io").is_err());
        assert!(validate_email("a@acme").is_err());
        assert!(validate_email("a @acme.io").is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(dec!(1)).is_ok());
        assert!(validate_quantity(dec!(0.25)).is_ok());
        assert!(validate_quantity(dec!(1000000)).is_ok());

        assert!(validate_quantity(Decimal::ZERO).is_err());
        assert!(validate_quantity(dec!(-1)).is_err());
        assert!(validate_quantity(dec!(1000000.01)).is_err());
    }

    #[test]
    fn test_validate_rate() {
        assert!(validate_rate(Decimal::ZERO).is_ok());
        assert!(validate_rate(dec!(99.999)).is_ok());
        assert!(validate_rate(dec!(-0.01)).is_err());
        assert!(validate_rate(dec!(100000001)).is_err());
    }

    #[test]
    fn test_validate_tax_rate() {
        assert!(validate_tax_rate(Percentage::zero()).is_ok());
        assert!(validate_tax_rate(Percentage::new(dec!(100))).is_ok());
        assert!(validate_tax_rate(Percentage::new(dec!(100.01))).is_err());
        assert!(validate_tax_rate(Percentage::new(dec!(-1))).is_err());
    }

    #[test]
    fn test_validate_discount() {
        assert!(validate_discount(&Discount::None).is_ok());
        assert!(validate_discount(&Discount::Percentage { value: dec!(100) }).is_ok());
        assert!(validate_discount(&Discount::Percentage { value: dec!(101) }).is_err());
        assert!(validate_discount(&Discount::Fixed { value: dec!(500) }).is_ok());
        assert!(validate_discount(&Discount::Fixed { value: dec!(-5) }).is_err());
    }

    #[test]
    fn test_validate_payment_amount() {
        assert!(validate_payment_amount(Money::from_cents(1)).is_ok());
        assert!(validate_payment_amount(Money::zero()).is_err());
        assert!(validate_payment_amount(Money::from_cents(-100)).is_err());
    }

    #[test]
    fn test_validate_line_item_count() {
        assert!(validate_line_item_count(1).is_ok());
        assert!(validate_line_item_count(100).is_ok());
        assert!(validate_line_item_count(0).is_err());
        assert!(validate_line_item_count(101).is_err());
    }

    #[test]
    fn test_validate_due_date() {
        let issue = NaiveDate::from_ymd_opt(2026, 10, 1).unwrap();
        assert!(validate_due_date(issue, issue).is_ok());
        assert!(validate_due_date(issue, issue.succ_opt().unwrap()).is_ok());
        assert!(validate_due_date(issue, issue.pred_opt().unwrap()).is_err());
    }

    #[test]
    fn test_validate_uuid() {
        assert!(validate_uuid("550e8400-e29b-41d4-a716-446655440000").is_ok());
        assert!(validate_uuid("").is_err());
        assert!(validate_uuid("not-a-uuid").is_err());
    }
}
