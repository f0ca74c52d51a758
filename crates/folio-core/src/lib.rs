//! # folio-core: Pure Business Logic for Folio
//!
//! This crate holds every invoicing rule as pure functions with zero I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Folio Architecture                              │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Web Frontend                                 │   │
//! │  │    Invoice editor ──► Live totals ──► Dashboard cards          │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ HTTP / JSON                            │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    folio-api (axum)                             │   │
//! │  │    /api/invoices, /api/clients, /api/dashboard                  │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ folio-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌──────────┐ │   │
//! │  │   │  money  │ │ totals  │ │ invoice │ │  stats  │ │validation│ │   │
//! │  │   │  Money  │ │ Invoice │ │ Invoice │ │Dashboard│ │  rules   │ │   │
//! │  │   │ round   │ │ Totals  │ │ Draft   │ │ Stats   │ │  checks  │ │   │
//! │  │   └─────────┘ └─────────┘ └─────────┘ └─────────┘ └──────────┘ │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO CLOCK • PURE FUNCTIONS             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    folio-db (Database Layer)                    │   │
//! │  │              SQLite queries, migrations, repositories           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`] - Money type and the rounding primitives every total goes through
//! - [`types`] - Domain types (Client, LineItem, Discount, InvoiceStatus, etc.)
//! - [`totals`] - Subtotal → discount → tax → total pipeline
//! - [`invoice`] - Invoice aggregate and lifecycle transitions
//! - [`period`] - Month-to-date reporting windows
//! - [`stats`] - Dashboard aggregation and trends
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: same input, same output; callers pass `today`/`now`
//! 2. **Integer Money**: stored amounts are cents (i64), rounded half away from zero
//! 3. **Decimal Inputs**: quantities, rates and percentages are `rust_decimal::Decimal`
//! 4. **Explicit Errors**: all errors are typed, never strings or panics
//!
//! ## Example Usage
//!
//! ```rust
//! use folio_core::money::{money_add, round_money};
//! use rust_decimal::Decimal;
//!
//! let a = round_money(Decimal::new(1, 1)); // 0.10
//! let total = money_add(money_add(a, a), a);
//! assert_eq!(total.as_decimal(), Decimal::new(30, 2));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod invoice;
pub mod money;
pub mod period;
pub mod stats;
pub mod totals;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use invoice::{Invoice, InvoiceDraft, LineItemInput, PaymentInput};
pub use money::{money_add, money_multiply, money_subtract, round_money, Money};
pub use stats::{DashboardStats, PeriodStats};
pub use totals::InvoiceTotals;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Prefix for generated invoice numbers when none is configured.
pub const DEFAULT_INVOICE_PREFIX: &str = "INV";

/// Days between issue and due date when a draft leaves the due date empty.
pub const DEFAULT_PAYMENT_TERMS_DAYS: u32 = 30;

/// Maximum line items on a single invoice.
pub const MAX_LINE_ITEMS: usize = 100;

/// Maximum quantity on a single line item.
pub const MAX_QUANTITY: i64 = 1_000_000;

/// Maximum unit rate, in major currency units.
pub const MAX_RATE: i64 = 100_000_000;

/// Maximum fixed discount, in major currency units.
pub const MAX_FIXED_DISCOUNT: i64 = 100_000_000;

pub const MAX_CLIENT_NAME_LEN: usize = 200;

pub const MAX_DESCRIPTION_LEN: usize = 500;

/// Months shown on the dashboard revenue chart by default.
pub const DEFAULT_REVENUE_MONTHS: u32 = 6;
