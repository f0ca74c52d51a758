//! # Invoice Lifecycle
//!
//! The invoice aggregate: creation from a draft, edits, payments and status
//! transitions. Totals are always recomputed here from line items, so the
//! values that reach storage never come from the caller.
//!
//! ## State Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Invoice State Machine                             │
//! │                                                                         │
//! │   from_draft()                                                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │   ┌───────┐  mark_sent()  ┌──────┐  past due date   ┌─────────┐        │
//! │   │ Draft │──────────────►│ Sent │─────────────────►│ Overdue │        │
//! │   └───┬───┘               └──┬───┘                  └────┬────┘        │
//! │       │                      │   record_payment()        │             │
//! │       │                      │   (balance reaches 0)     │             │
//! │       │                      ▼                           ▼             │
//! │       │                  ┌──────┐◄──────────────────────────           │
//! │       │                  │ Paid │                                       │
//! │       │                  └──────┘                                       │
//! │       │ cancel()                                                        │
//! │       └──────────────► Cancelled ◄── cancel() from Sent / Overdue      │
//! │                                                                         │
//! │   apply_draft() (edit): Draft or Sent only                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Days, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};
use crate::money::{money_add, money_subtract, Money};
use crate::totals::InvoiceTotals;
use crate::types::{Discount, InvoiceRecord, InvoiceStatus, LineItem, Payment, PaymentMethod, Percentage};
use crate::validation::{
    validate_description, validate_discount, validate_due_date, validate_line_item_count,
    validate_payment_amount, validate_quantity, validate_rate, validate_tax_rate, validate_uuid,
    ValidationResult,
};

// =============================================================================
// Inputs
// =============================================================================

/// A line item as submitted by a client. The amount is always derived.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct LineItemInput {
    pub description: String,
    #[ts(type = "string")]
    pub quantity: Decimal,
    #[ts(type = "string")]
    pub rate: Decimal,
}

/// Everything needed to create or edit an invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct InvoiceDraft {
    pub client_id: String,
    #[ts(as = "String")]
    pub issue_date: NaiveDate,
    /// When absent, [`InvoiceDraft::with_payment_terms`] fills it from the
    /// configured terms; a draft built without terms is due on the issue date.
    #[ts(as = "Option<String>")]
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    pub items: Vec<LineItemInput>,
    #[serde(default)]
    pub discount: Discount,
    #[serde(default)]
    pub tax_rate: Percentage,
    #[serde(default)]
    pub notes: Option<String>,
}

impl InvoiceDraft {
    /// Fills a missing due date with `issue_date + terms_days`.
    pub fn with_payment_terms(mut self, terms_days: u32) -> Self {
        if self.due_date.is_none() {
            self.due_date = self
                .issue_date
                .checked_add_days(Days::new(u64::from(terms_days)));
        }
        self
    }

    fn resolved_due_date(&self) -> NaiveDate {
        self.due_date.unwrap_or(self.issue_date)
    }

    /// Runs every input rule. Totals are not touched.
    pub fn validate(&self) -> ValidationResult<()> {
        validate_uuid(&self.client_id)?;
        validate_due_date(self.issue_date, self.resolved_due_date())?;
        validate_line_item_count(self.items.len())?;

        for item in &self.items {
            validate_description(&item.description)?;
            validate_quantity(item.quantity)?;
            validate_rate(item.rate)?;
        }

        validate_discount(&self.discount)?;
        validate_tax_rate(self.tax_rate)?;

        Ok(())
    }

    /// Builds line items with derived amounts, in submission order.
    pub fn line_items(&self) -> Vec<LineItem> {
        self.items
            .iter()
            .enumerate()
            .map(|(order, item)| {
                LineItem::new(item.description.trim(), item.quantity, item.rate, order as u32)
            })
            .collect()
    }

    /// The totals this draft would produce.
    pub fn totals(&self) -> InvoiceTotals {
        InvoiceTotals::calculate(&self.line_items(), &self.discount, self.tax_rate)
    }
}

/// A payment as submitted by a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct PaymentInput {
    pub amount: Money,
    #[serde(default)]
    pub method: PaymentMethod,
    /// Defaults to the day the payment is recorded.
    #[ts(as = "Option<String>")]
    #[serde(default)]
    pub paid_on: Option<NaiveDate>,
    #[serde(default)]
    pub reference: Option<String>,
}

// =============================================================================
// Invoice
// =============================================================================

/// An invoice with its line items and stored totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Invoice {
    pub id: String,
    /// Human-facing number, e.g. `INV-0042`.
    pub number: String,
    pub client_id: String,
    pub status: InvoiceStatus,
    #[ts(as = "String")]
    pub issue_date: NaiveDate,
    #[ts(as = "String")]
    pub due_date: NaiveDate,
    pub items: Vec<LineItem>,
    pub discount: Discount,
    pub tax_rate: Percentage,
    #[serde(flatten)]
    pub totals: InvoiceTotals,
    pub amount_paid: Money,
    pub notes: Option<String>,
    #[ts(as = "Option<String>")]
    pub sent_at: Option<DateTime<Utc>>,
    #[ts(as = "Option<String>")]
    pub paid_at: Option<DateTime<Utc>>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Invoice {
    /// Creates a new draft invoice.
    ///
    /// ## Example
    /// ```rust
    /// use chrono::{NaiveDate, Utc};
    /// use folio_core::invoice::{Invoice, InvoiceDraft, LineItemInput};
    /// use folio_core::types::{Discount, InvoiceStatus, Percentage};
    /// use rust_decimal::Decimal;
    ///
    /// let draft = InvoiceDraft {
    ///     client_id: "550e8400-e29b-41d4-a716-446655440000".to_string(),
    ///     issue_date: NaiveDate::from_ymd_opt(2026, 10, 1).unwrap(),
    ///     due_date: None,
    ///     items: vec![LineItemInput {
    ///         description: "Consulting".to_string(),
    ///         quantity: Decimal::from(2),
    ///         rate: Decimal::from(50),
    ///     }],
    ///     discount: Discount::None,
    ///     tax_rate: Percentage::zero(),
    ///     notes: None,
    /// };
    ///
    /// let invoice = Invoice::from_draft(draft, "INV-0001".to_string(), Utc::now()).unwrap();
    /// assert_eq!(invoice.status, InvoiceStatus::Draft);
    /// assert_eq!(invoice.totals.total.cents(), 10000);
    /// ```
    pub fn from_draft(draft: InvoiceDraft, number: String, now: DateTime<Utc>) -> CoreResult<Self> {
        draft.validate()?;

        let items = draft.line_items();
        let totals = InvoiceTotals::calculate(&items, &draft.discount, draft.tax_rate);
        let due_date = draft.resolved_due_date();

        Ok(Invoice {
            id: Uuid::new_v4().to_string(),
            number,
            client_id: draft.client_id,
            status: InvoiceStatus::Draft,
            issue_date: draft.issue_date,
            due_date,
            items,
            discount: draft.discount,
            tax_rate: draft.tax_rate,
            totals,
            amount_paid: Money::zero(),
            notes: normalize_notes(draft.notes),
            sent_at: None,
            paid_at: None,
            created_at: now,
            updated_at: now,
        })
    }

    /// Replaces the editable content of the invoice and recomputes totals.
    ///
    /// Only drafts and sent invoices can be edited, and the new total may not
    /// drop below what has already been paid.
    pub fn apply_draft(&mut self, draft: InvoiceDraft, now: DateTime<Utc>) -> CoreResult<()> {
        self.ensure_status(self.status.is_editable(), "edit")?;
        draft.validate()?;

        let items = draft.line_items();
        let totals = InvoiceTotals::calculate(&items, &draft.discount, draft.tax_rate);

        if totals.total < self.amount_paid {
            return Err(CoreError::InvalidPaymentAmount {
                reason: format!(
                    "new total {} is below the {} already paid",
                    totals.total, self.amount_paid
                ),
            });
        }

        self.due_date = draft.resolved_due_date();
        self.client_id = draft.client_id;
        self.issue_date = draft.issue_date;
        self.items = items;
        self.discount = draft.discount;
        self.tax_rate = draft.tax_rate;
        self.totals = totals;
        self.notes = normalize_notes(draft.notes);
        self.updated_at = now;

        if self.status != InvoiceStatus::Draft || self.amount_paid.is_positive() {
            self.settle_if_cleared(now);
        }

        Ok(())
    }

    /// Draft → Sent.
    pub fn mark_sent(&mut self, now: DateTime<Utc>) -> CoreResult<()> {
        self.ensure_status(self.status == InvoiceStatus::Draft, "send")?;

        self.status = InvoiceStatus::Sent;
        self.sent_at = Some(now);
        self.updated_at = now;
        self.settle_if_cleared(now);
        Ok(())
    }

    /// Cancels any invoice that is not already paid or cancelled.
    pub fn cancel(&mut self, now: DateTime<Utc>) -> CoreResult<()> {
        self.ensure_status(self.status.is_open(), "cancel")?;

        self.status = InvoiceStatus::Cancelled;
        self.updated_at = now;
        Ok(())
    }

    /// Records a (possibly partial) payment.
    ///
    /// ## Rules
    /// - Amount must be positive
    /// - Invoice must be open (not paid, not cancelled)
    /// - Amount may not exceed the outstanding balance
    /// - A payment that clears the balance moves the invoice to Paid
    pub fn record_payment(&mut self, input: PaymentInput, now: DateTime<Utc>) -> CoreResult<Payment> {
        validate_payment_amount(input.amount)?;
        self.ensure_status(self.status.is_open(), "record payment")?;

        let balance = self.balance();
        if input.amount > balance {
            return Err(CoreError::PaymentExceedsBalance {
                balance,
                requested: input.amount,
            });
        }

        self.amount_paid = money_add(self.amount_paid, input.amount);
        if self.balance().is_zero() {
            self.status = InvoiceStatus::Paid;
            self.paid_at = Some(now);
        }
        self.updated_at = now;

        Ok(Payment {
            id: Uuid::new_v4().to_string(),
            invoice_id: self.id.clone(),
            amount: input.amount,
            method: input.method,
            paid_on: input.paid_on.unwrap_or_else(|| now.date_naive()),
            reference: normalize_notes(input.reference),
            created_at: now,
        })
    }

    /// Whether a sent invoice has passed its due date.
    pub fn is_past_due(&self, today: NaiveDate) -> bool {
        self.status == InvoiceStatus::Sent && self.due_date < today
    }

    /// Sent → Overdue when past due. Returns whether the status changed.
    pub fn mark_overdue_if_due(&mut self, today: NaiveDate, now: DateTime<Utc>) -> bool {
        if !self.is_past_due(today) {
            return false;
        }
        self.status = InvoiceStatus::Overdue;
        self.updated_at = now;
        true
    }

    /// `total - amount_paid`.
    #[inline]
    pub fn balance(&self) -> Money {
        money_subtract(self.totals.total, self.amount_paid)
    }

    /// The snapshot the dashboard aggregates over.
    pub fn as_record(&self) -> InvoiceRecord {
        InvoiceRecord {
            total: self.totals.total,
            amount_paid: self.amount_paid,
            status: self.status,
            issue_date: self.issue_date,
        }
    }

    /// Open invoices with nothing left to pay become Paid; no payment could
    /// ever move them otherwise.
    fn settle_if_cleared(&mut self, now: DateTime<Utc>) {
        if self.status.is_open() && !self.balance().is_positive() {
            self.status = InvoiceStatus::Paid;
            self.paid_at = Some(now);
        }
    }

    fn ensure_status(&self, allowed: bool, operation: &'static str) -> CoreResult<()> {
        if allowed {
            Ok(())
        } else {
            Err(CoreError::InvalidInvoiceStatus {
                invoice_id: self.id.clone(),
                current_status: self.status,
                operation,
            })
        }
    }
}

/// Formats an invoice number: `INV` + 42 → `INV-0042`.
pub fn format_invoice_number(prefix: &str, sequence: i64) -> String {
    format!("{}-{:04}", prefix, sequence)
}

fn normalize_notes(notes: Option<String>) -> Option<String> {
    notes
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
}

// =============================================================================
// Unit Tests
// =============================================================================
