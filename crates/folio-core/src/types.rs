//! # Domain Types
//!
//! Core domain types used throughout Folio.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Client       │   │    LineItem     │   │    Payment      │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  description    │   │  id (UUID)      │       │
//! │  │  name           │   │  quantity (dec) │   │  invoice_id     │       │
//! │  │  email          │   │  rate (dec)     │   │  amount (Money) │       │
//! │  └─────────────────┘   │  amount (Money) │   │  method         │       │
//! │                        └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │   Percentage    │   │    Discount     │   │ InvoiceStatus   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  8.25 = 8.25%   │   │  None           │   │  Draft          │       │
//! │  │  (Decimal)      │   │  Percentage(v)  │   │  Sent / Paid    │       │
//! │  └─────────────────┘   │  Fixed(v)       │   │  Overdue        │       │
//! │                        └─────────────────┘   │  Cancelled      │       │
//! │                                              └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use uuid::Uuid;

use crate::money::{money_multiply, money_subtract, Money};
use crate::validation::{validate_client_name, validate_email, ValidationResult};

// =============================================================================
// Percentage
// =============================================================================

/// A percentage expressed in "human" units: `8.25` means 8.25 %.
///
/// Used for tax rates and percentage discounts. Range checks (0..=100) live in
/// [`crate::validation`]; arithmetic trusts its inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Percentage(#[ts(type = "string")] Decimal);

impl Percentage {
    #[inline]
    pub const fn new(value: Decimal) -> Self {
        Percentage(value)
    }

    #[inline]
    pub const fn zero() -> Self {
        Percentage(Decimal::ZERO)
    }

    /// Returns the raw percentage value (`8.25`).
    #[inline]
    pub const fn value(&self) -> Decimal {
        self.0
    }

    /// Returns the multiplier form (`8.25` → `0.0825`).
    #[inline]
    pub fn fraction(&self) -> Decimal {
        self.0 / Decimal::ONE_HUNDRED
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl From<Decimal> for Percentage {
    fn from(value: Decimal) -> Self {
        Percentage(value)
    }
}

impl fmt::Display for Percentage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0.normalize())
    }
}

// =============================================================================
// Discount
// =============================================================================

/// Invoice-level discount configuration.
///
/// ## Wire Format
/// ```json
/// { "type": "none" }
/// { "type": "percentage", "value": "10" }
/// { "type": "fixed", "value": "25.00" }
/// ```
///
/// A fixed value is in major currency units and is rounded to cents when
/// resolved. A fixed discount larger than the subtotal is NOT clamped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(tag = "type", rename_all = "lowercase")]
#[ts(export)]
pub enum Discount {
    #[default]
    None,
    Percentage {
        #[ts(type = "string")]
        value: Decimal,
    },
    Fixed {
        #[ts(type = "string")]
        value: Decimal,
    },
}

impl Discount {
    /// Database/wire discriminator (`none`, `percentage`, `fixed`).
    pub fn kind(&self) -> &'static str {
        match self {
            Discount::None => "none",
            Discount::Percentage { .. } => "percentage",
            Discount::Fixed { .. } => "fixed",
        }
    }

    /// The configured value; zero for [`Discount::None`].
    pub fn value(&self) -> Decimal {
        match self {
            Discount::None => Decimal::ZERO,
            Discount::Percentage { value } | Discount::Fixed { value } => *value,
        }
    }

    /// Rebuilds a discount from its stored discriminator and value.
    ///
    /// Returns `None` for an unknown discriminator.
    pub fn from_parts(kind: &str, value: Decimal) -> Option<Self> {
        match kind {
            "none" => Some(Discount::None),
            "percentage" => Some(Discount::Percentage { value }),
            "fixed" => Some(Discount::Fixed { value }),
            _ => None,
        }
    }
}

// =============================================================================
// Line Item
// =============================================================================

/// A line on an invoice.
///
/// `amount` is derived: `round(quantity × rate)`. The persistence path always
/// re-derives it, so a stale client-side amount never reaches storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct LineItem {
    pub description: String,
    #[ts(type = "string")]
    pub quantity: Decimal,
    /// Unit rate in major currency units.
    #[ts(type = "string")]
    pub rate: Decimal,
    pub amount: Money,
    /// Display position, starting at 0.
    pub order: u32,
}

impl LineItem {
    /// Creates a line item, deriving its amount.
    pub fn new(description: impl Into<String>, quantity: Decimal, rate: Decimal, order: u32) -> Self {
        LineItem {
            description: description.into(),
            quantity,
            rate,
            amount: Self::compute_amount(quantity, rate),
            order,
        }
    }

    /// `round(quantity × rate)`.
    ///
    /// ## Example
    /// ```rust
    /// use folio_core::types::LineItem;
    /// use rust_decimal::Decimal;
    ///
    /// let amount = LineItem::compute_amount(Decimal::from(2), Decimal::new(5000, 2));
    /// assert_eq!(amount.cents(), 10000);
    /// ```
    #[inline]
    pub fn compute_amount(quantity: Decimal, rate: Decimal) -> Money {
        money_multiply(quantity, rate)
    }

    /// Whether the stored amount matches `round(quantity × rate)`.
    pub fn has_consistent_amount(&self) -> bool {
        self.amount == Self::compute_amount(self.quantity, self.rate)
    }
}

// =============================================================================
// Invoice Status
// =============================================================================

/// Lifecycle status of an invoice.
///
/// ```text
///   Draft ──send──► Sent ──past due──► Overdue
///     │              │                    │
///     │              └──paid in full──────┴──► Paid
///     └──────────────┴────────cancel──────────► Cancelled
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    Draft,
    Sent,
    Paid,
    Overdue,
    Cancelled,
}

impl InvoiceStatus {
    /// Every status, in lifecycle order.
    pub const ALL: [InvoiceStatus; 5] = [
        InvoiceStatus::Draft,
        InvoiceStatus::Sent,
        InvoiceStatus::Paid,
        InvoiceStatus::Overdue,
        InvoiceStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceStatus::Draft => "draft",
            InvoiceStatus::Sent => "sent",
            InvoiceStatus::Paid => "paid",
            InvoiceStatus::Overdue => "overdue",
            InvoiceStatus::Cancelled => "cancelled",
        }
    }

    /// Still expecting money: neither paid nor cancelled.
    #[inline]
    pub fn is_open(&self) -> bool {
        !matches!(self, InvoiceStatus::Paid | InvoiceStatus::Cancelled)
    }

    /// Line items and discount may still be edited.
    #[inline]
    pub fn is_editable(&self) -> bool {
        matches!(self, InvoiceStatus::Draft | InvoiceStatus::Sent)
    }
}

impl Default for InvoiceStatus {
    fn default() -> Self {
        InvoiceStatus::Draft
    }
}

impl fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InvoiceStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        InvoiceStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown invoice status: {}", s))
    }
}

// =============================================================================
// Payment Method
// =============================================================================

#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    BankTransfer,
    Card,
    Cash,
    Check,
    Other,
}

impl Default for PaymentMethod {
    fn default() -> Self {
        PaymentMethod::BankTransfer
    }
}

// =============================================================================
// Client
// =============================================================================

/// A customer that invoices are addressed to.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Client {
    pub id: String,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct NewClient {
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

impl Client {
    /// Validates the input and builds a client with a fresh ID.
    ///
    /// Blank optional fields are stored as `None`.
    pub fn create(input: NewClient, now: DateTime<Utc>) -> ValidationResult<Client> {
        validate_client_name(&input.name)?;

        let email = non_blank(input.email);
        if let Some(email) = &email {
            validate_email(email)?;
        }

        Ok(Client {
            id: Uuid::new_v4().to_string(),
            name: input.name.trim().to_string(),
            email,
            phone: non_blank(input.phone),
            address: non_blank(input.address),
            created_at: now,
            updated_at: now,
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

// =============================================================================
// Payment
// =============================================================================

/// A payment received against an invoice.
/// An invoice can collect several partial payments.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Payment {
    pub id: String,
    pub invoice_id: String,
    pub amount: Money,
    pub method: PaymentMethod,
    #[ts(as = "String")]
    pub paid_on: NaiveDate,
    /// Bank reference, check number, etc.
    pub reference: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Invoice Record (dashboard snapshot)
// =============================================================================

/// The slice of an invoice the dashboard aggregation reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct InvoiceRecord {
    pub total: Money,
    pub amount_paid: Money,
    pub status: InvoiceStatus,
    #[ts(as = "String")]
    pub issue_date: NaiveDate,
}

impl InvoiceRecord {
    /// `total - amount_paid`.
    #[inline]
    pub fn balance(&self) -> Money {
        money_subtract(self.total, self.amount_paid)
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
    fn test_percentage_fraction() {
        let rate = Percentage::new(dec!(8.25));
        assert_eq!(rate.fraction(), dec!(0.0825));
        assert_eq!(rate.to_string(), "8.25%");
        assert!(Percentage::zero().is_zero());
    }

    #[test]
    fn test_discount_wire_format() {
        let discount: Discount =
            serde_json::from_str(r#"{"type":"percentage","value":"10"}"#).unwrap();
        assert_eq!(discount, Discount::Percentage { value: dec!(10) });

        let none: Discount = serde_json::from_str(r#"{"type":"none"}"#).unwrap();
        assert_eq!(none, Discount::None);

        let json = serde_json::to_value(Discount::Fixed { value: dec!(25.5) }).unwrap();
        assert_eq!(json["type"], "fixed");
    }

    #[test]
    fn test_discount_parts() {
        let discount = Discount::Fixed { value: dec!(12) };
        assert_eq!(
            Discount::from_parts(discount.kind(), discount.value()),
            Some(discount)
        );
        assert_eq!(Discount::None.value(), Decimal::ZERO);
        assert_eq!(Discount::from_parts("bogus", dec!(1)), None);
    }

    #[test]
    fn test_line_item_amount() {
        let item = LineItem::new("Consulting", dec!(2), dec!(50.00), 0);
        assert_eq!(item.amount.cents(), 10000);
        assert!(item.has_consistent_amount());

        let stale = LineItem {
            amount: Money::from_cents(1),
            ..item
        };
        assert!(!stale.has_consistent_amount());
    }

    #[test]
    fn test_line_item_fractional_quantity() {
        let item = LineItem::new("Hours", dec!(1.5), dec!(33.33), 1);
        // 49.995 → 50.00
        assert_eq!(item.amount.cents(), 5000);
    }

    #[test]
    fn test_status_round_trip_and_flags() {
        assert_eq!("Overdue".parse::<InvoiceStatus>(), Ok(InvoiceStatus::Overdue));
        assert!("unknown".parse::<InvoiceStatus>().is_err());
        assert!(InvoiceStatus::Sent.is_open());
        assert!(InvoiceStatus::Draft.is_open());
        assert!(!InvoiceStatus::Paid.is_open());
        assert!(!InvoiceStatus::Cancelled.is_open());
        assert!(!InvoiceStatus::Overdue.is_editable());
        assert_eq!(InvoiceStatus::default(), InvoiceStatus::Draft);
    }

    #[test]
    fn test_client_create() {
        let client = Client::create(
            NewClient {
                name: "  Acme Corp ".to_string(),
                email: Some("billing@acme.io".to_string()),
                phone: Some("   ".to_string()),
                address: None,
            },
            Utc::now(),
        )
        .unwrap();

        assert_eq!(client.name, "Acme Corp");
        assert_eq!(client.phone, None);
        assert!(uuid::Uuid::parse_str(&client.id).is_ok());
    }

    #[test]
    fn test_client_create_rejects_bad_email() {
        let input = NewClient {
            name: "Acme".to_string(),
            email: Some("not-an-email".to_string()),
            phone: None,
            address: None,
        };
        assert!(Client::create(input, Utc::now()).is_err());
    }

    #[test]
    fn test_record_balance() {
        let record = InvoiceRecord {
            total: Money::from_cents(20000),
            amount_paid: Money::from_cents(5000),
            status: InvoiceStatus::Overdue,
            issue_date: NaiveDate::from_ymd_opt(2026, 10, 3).unwrap(),
        };
        assert_eq!(record.balance().cents(), 15000);
    }
}
