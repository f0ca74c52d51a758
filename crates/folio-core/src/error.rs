//! # Error Types
//!
//! Domain-specific error types for folio-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  folio-core errors (this file)                                         │
//! │  ├── CoreError        - Invoice lifecycle rule violations              │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  folio-db errors (separate crate)                                      │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  HTTP API errors (folio-api)                                           │
//! │  └── ApiError         - What clients see ({ code, message })           │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DbError → ApiError → Client       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Arithmetic never fails: money math saturates instead of erroring, so none
//! of these variants describe a calculation failure.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::money::Money;
use crate::types::InvoiceStatus;

// =============================================================================
// Core Error
// =============================================================================

/// Business rule violations in the invoice lifecycle.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Invoice not found: {0}")]
    InvoiceNotFound(String),

    #[error("Client not found: {0}")]
    ClientNotFound(String),

    /// The invoice is not in a state that allows the requested operation.
    ///
    /// ## When This Occurs
    /// - Editing a paid, overdue or cancelled invoice
    /// - Sending an invoice that is not a draft
    /// - Recording a payment against a cancelled or paid invoice
    /// - Cancelling a paid invoice
    #[error("Invoice {invoice_id} is {current_status}, cannot {operation}")]
    InvalidInvoiceStatus {
        invoice_id: String,
        current_status: InvoiceStatus,
        operation: &'static str,
    },

    /// A payment would take the paid amount above the invoice total.
    ///
    /// ```text
    /// total 121.99, paid 100.00 → balance 21.99
    /// record_payment(50.00)
    ///      │
    ///      ▼
    /// PaymentExceedsBalance { balance: $21.99, requested: $50.00 }
    /// ```
    #[error("Payment of {requested} exceeds outstanding balance of {balance}")]
    PaymentExceedsBalance { balance: Money, requested: Money },

    #[error("Invalid payment amount: {reason}")]
    InvalidPaymentAmount { reason: String },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised before any calculation or persistence runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange {
        field: String,
        min: Decimal,
        max: Decimal,
    },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Collection has too few or too many entries.
    #[error("{field} must contain between {min} and {max} entries")]
    InvalidCount { field: String, min: usize, max: usize },

    /// Invalid format (e.g., invalid UUID, invalid email).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// A date falls before the date it must follow.
    #[error("{field} must not be before {other}")]
    DateOrder { field: String, other: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::PaymentExceedsBalance {
            balance: Money::from_cents(2199),
            requested: Money::from_cents(5000),
        };
        assert_eq!(
            err.to_string(),
            "Payment of $50.00 exceeds outstanding balance of $21.99"
        );

        let err = CoreError::InvalidInvoiceStatus {
            invoice_id: "inv-1".to_string(),
            current_status: InvoiceStatus::Cancelled,
            operation: "record payment",
        };
        assert_eq!(err.to_string(), "Invoice inv-1 is cancelled, cannot record payment");
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "name".to_string(),
        };
        assert_eq!(err.to_string(), "name is required");

        let err = ValidationError::OutOfRange {
            field: "taxRate".to_string(),
            min: Decimal::ZERO,
            max: Decimal::ONE_HUNDRED,
        };
        assert_eq!(err.to_string(), "taxRate must be between 0 and 100");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "items".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
