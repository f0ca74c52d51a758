//! # Invoice Repository
//!
//! Database operations for invoices, their line items and the dashboard
//! snapshot.
//!
//! ## Write Paths
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Invoice Writes                                    │
//! │                                                                         │
//! │  insert(invoice)          ┐                                             │
//! │  update(invoice, from)    ├─ one transaction: invoices row + all items │
//! │                           ┘  (items are replaced, never patched)        │
//! │                                                                         │
//! │  update_status(inv, from) ── status / sent_at / paid_at only           │
//! │                                                                         │
//! │  record_payment(inv, p)   ── one transaction: payments row +           │
//! │                              amount_paid += p (in SQL)                 │
//! │                                                                         │
//! │  update / update_status / record_payment are guarded on the state the  │
//! │  change was computed from; a mismatch is DbError::Conflict.            │
//! │                                                                         │
//! │  mark_overdue(today)      ── bulk: sent AND due_date < today → overdue │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Totals are written exactly as computed by `folio_core`; nothing here does
//! arithmetic on money.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::{SqliteConnection, SqlitePool};
use std::str::FromStr;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::payment::insert_payment;
use crate::error::{DbError, DbResult};
use folio_core::invoice::format_invoice_number;
use folio_core::{
    Discount, Invoice, InvoiceRecord, InvoiceStatus, InvoiceTotals, LineItem, Money, Payment,
    Percentage,
};

// =============================================================================
// Rows
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct InvoiceRow {
    id: String,
    number: String,
    client_id: String,
    status: InvoiceStatus,
    issue_date: NaiveDate,
    due_date: NaiveDate,
    discount_type: String,
    discount_value: String,
    tax_rate: String,
    subtotal_cents: i64,
    discount_cents: i64,
    tax_cents: i64,
    total_cents: i64,
    amount_paid_cents: i64,
    notes: Option<String>,
    sent_at: Option<DateTime<Utc>>,
    paid_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl InvoiceRow {
    fn into_invoice(self, items: Vec<LineItem>) -> DbResult<Invoice> {
        let discount_value = parse_decimal("discount_value", &self.discount_value)?;
        let discount = Discount::from_parts(&self.discount_type, discount_value)
            .ok_or_else(|| DbError::invalid_data("discount_type", &self.discount_type))?;
        let tax_rate = Percentage::new(parse_decimal("tax_rate", &self.tax_rate)?);

        Ok(Invoice {
            id: self.id,
            number: self.number,
            client_id: self.client_id,
            status: self.status,
            issue_date: self.issue_date,
            due_date: self.due_date,
            items,
            discount,
            tax_rate,
            totals: InvoiceTotals {
                subtotal: Money::from_cents(self.subtotal_cents),
                discount_amount: Money::from_cents(self.discount_cents),
                tax_amount: Money::from_cents(self.tax_cents),
                total: Money::from_cents(self.total_cents),
            },
            amount_paid: Money::from_cents(self.amount_paid_cents),
            notes: self.notes,
            sent_at: self.sent_at,
            paid_at: self.paid_at,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ItemRow {
    position: i64,
    description: String,
    quantity: String,
    rate: String,
    amount_cents: i64,
}

impl ItemRow {
    fn into_line_item(self) -> DbResult<LineItem> {
        Ok(LineItem {
            description: self.description,
            quantity: parse_decimal("quantity", &self.quantity)?,
            rate: parse_decimal("rate", &self.rate)?,
            amount: Money::from_cents(self.amount_cents),
            order: u32::try_from(self.position)
                .map_err(|_| DbError::invalid_data("position", self.position.to_string()))?,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct RecordRow {
    total_cents: i64,
    amount_paid_cents: i64,
    status: InvoiceStatus,
    issue_date: NaiveDate,
}

impl From<RecordRow> for InvoiceRecord {
    fn from(row: RecordRow) -> Self {
        InvoiceRecord {
            total: Money::from_cents(row.total_cents),
            amount_paid: Money::from_cents(row.amount_paid_cents),
            status: row.status,
            issue_date: row.issue_date,
        }
    }
}

fn parse_decimal(column: &str, value: &str) -> DbResult<Decimal> {
    Decimal::from_str(value).map_err(|_| DbError::invalid_data(column, value))
}

const SELECT_INVOICE: &str = r#"
    SELECT
        id, number, client_id, status, issue_date, due_date,
        discount_type, discount_value, tax_rate,
        subtotal_cents, discount_cents, tax_cents, total_cents, amount_paid_cents,
        notes, sent_at, paid_at, created_at, updated_at
    FROM invoices
"#;

// =============================================================================
// Filter
// =============================================================================

/// Filter for [`InvoiceRepository::list`].
#[derive(Debug, Clone, Default)]
pub struct InvoiceFilter {
    pub status: Option<InvoiceStatus>,
    pub client_id: Option<String>,
    pub limit: i64,
}

impl InvoiceFilter {
    pub fn new(limit: i64) -> Self {
        InvoiceFilter {
            limit,
            ..Default::default()
        }
    }

    pub fn status(mut self, status: InvoiceStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn client(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for invoice database operations.
#[derive(Debug, Clone)]
pub struct InvoiceRepository {
    pool: SqlitePool,
}

impl InvoiceRepository {
    pub fn new(pool: SqlitePool) -> Self {
        InvoiceRepository { pool }
    }

    /// Next sequential invoice number, e.g. `INV-0007`.
    ///
    /// Invoices are never deleted (only cancelled), so the row count is a
    /// stable sequence. The UNIQUE constraint on `number` rejects a
    /// concurrent duplicate.
    pub async fn next_number(&self, prefix: &str) -> DbResult<String> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM invoices")
            .fetch_one(&self.pool)
            .await?;

        Ok(format_invoice_number(prefix, count + 1))
    }

    /// Inserts an invoice and its line items in one transaction.
    pub async fn insert(&self, invoice: &Invoice) -> DbResult<()> {
        debug!(id = %invoice.id, number = %invoice.number, "Inserting invoice");

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO invoices (
                id, number, client_id, status, issue_date, due_date,
                discount_type, discount_value, tax_rate,
                subtotal_cents, discount_cents, tax_cents, total_cents, amount_paid_cents,
                notes, sent_at, paid_at, created_at, updated_at
            ) VALUES (
                ?1, ?2, ?3, ?4, ?5, ?6,
                ?7, ?8, ?9,
                ?10, ?11, ?12, ?13, ?14,
                ?15, ?16, ?17, ?18, ?19
            )
            "#,
        )
        .bind(&invoice.id)
        .bind(&invoice.number)
        .bind(&invoice.client_id)
        .bind(invoice.status)
        .bind(invoice.issue_date)
        .bind(invoice.due_date)
        .bind(invoice.discount.kind())
        .bind(invoice.discount.value().to_string())
        .bind(invoice.tax_rate.value().to_string())
        .bind(invoice.totals.subtotal.cents())
        .bind(invoice.totals.discount_amount.cents())
        .bind(invoice.totals.tax_amount.cents())
        .bind(invoice.totals.total.cents())
        .bind(invoice.amount_paid.cents())
        .bind(&invoice.notes)
        .bind(invoice.sent_at)
        .bind(invoice.paid_at)
        .bind(invoice.created_at)
        .bind(invoice.updated_at)
        .execute(&mut *tx)
        .await?;

        insert_items(&mut tx, &invoice.id, &invoice.items).await?;

        tx.commit().await?;
        Ok(())
    }

    /// Rewrites an invoice's content and replaces its line items.
    ///
    /// `expected_status` is the status the edit was computed from. The write
    /// only lands if the row still has that status and the same amount paid;
    /// otherwise [`DbError::Conflict`].
    pub async fn update(&self, invoice: &Invoice, expected_status: InvoiceStatus) -> DbResult<()> {
        debug!(id = %invoice.id, "Updating invoice");

        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            UPDATE invoices SET
                client_id = ?2,
                status = ?3,
                issue_date = ?4,
                due_date = ?5,
                discount_type = ?6,
                discount_value = ?7,
                tax_rate = ?8,
                subtotal_cents = ?9,
                discount_cents = ?10,
                tax_cents = ?11,
                total_cents = ?12,
                notes = ?13,
                paid_at = ?14,
                updated_at = ?15
            WHERE id = ?1 AND status = ?16 AND amount_paid_cents = ?17
            "#,
        )
        .bind(&invoice.id)
        .bind(&invoice.client_id)
        .bind(invoice.status)
        .bind(invoice.issue_date)
        .bind(invoice.due_date)
        .bind(invoice.discount.kind())
        .bind(invoice.discount.value().to_string())
        .bind(invoice.tax_rate.value().to_string())
        .bind(invoice.totals.subtotal.cents())
        .bind(invoice.totals.discount_amount.cents())
        .bind(invoice.totals.tax_amount.cents())
        .bind(invoice.totals.total.cents())
        .bind(&invoice.notes)
        .bind(invoice.paid_at)
        .bind(invoice.updated_at)
        .bind(expected_status)
        .bind(invoice.amount_paid.cents())
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(stale_or_missing(&mut tx, &invoice.id).await);
        }

        sqlx::query("DELETE FROM invoice_items WHERE invoice_id = ?1")
            .bind(&invoice.id)
            .execute(&mut *tx)
            .await?;
        insert_items(&mut tx, &invoice.id, &invoice.items).await?;

        tx.commit().await?;
        Ok(())
    }

    /// Persists a status transition (send, cancel) computed from
    /// `expected_status`. Fails with [`DbError::Conflict`] if the stored
    /// status moved on in the meantime.
    pub async fn update_status(&self, invoice: &Invoice, expected_status: InvoiceStatus) -> DbResult<()> {
        debug!(id = %invoice.id, from = %expected_status, to = %invoice.status, "Updating invoice status");

        let mut conn = self.pool.acquire().await?;

        let result = sqlx::query(
            r#"
            UPDATE invoices SET
                status = ?2,
                sent_at = ?3,
                paid_at = ?4,
                updated_at = ?5
            WHERE id = ?1 AND status = ?6
            "#,
        )
        .bind(&invoice.id)
        .bind(invoice.status)
        .bind(invoice.sent_at)
        .bind(invoice.paid_at)
        .bind(invoice.updated_at)
        .bind(expected_status)
        .execute(&mut *conn)
        .await?;

        if result.rows_affected() == 0 {
            return Err(stale_or_missing(&mut conn, &invoice.id).await);
        }

        Ok(())
    }

    /// Stores a payment and adds it to the invoice balance, atomically.
    ///
    /// `invoice` is the state after `Invoice::record_payment`. The balance is
    /// incremented in SQL and guarded on the amount paid and total the
    /// payment was checked against, so overlapping payments or edits fail
    /// with [`DbError::Conflict`] instead of overwriting each other. A status
    /// set concurrently (e.g. overdue) is kept unless the payment clears the
    /// balance.
    pub async fn record_payment(&self, invoice: &Invoice, payment: &Payment) -> DbResult<()> {
        let paid_before = invoice.amount_paid - payment.amount;

        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            UPDATE invoices SET
                amount_paid_cents = amount_paid_cents + ?2,
                status = CASE WHEN amount_paid_cents + ?2 >= total_cents THEN 'paid' ELSE status END,
                paid_at = CASE WHEN amount_paid_cents + ?2 >= total_cents THEN ?3 ELSE paid_at END,
                updated_at = ?4
            WHERE id = ?1
              AND amount_paid_cents = ?5
              AND total_cents = ?6
              AND status IN ('draft', 'sent', 'overdue')
            "#,
        )
        .bind(&invoice.id)
        .bind(payment.amount.cents())
        .bind(invoice.paid_at.unwrap_or(payment.created_at))
        .bind(invoice.updated_at)
        .bind(paid_before.cents())
        .bind(invoice.totals.total.cents())
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(stale_or_missing(&mut tx, &invoice.id).await);
        }

        insert_payment(&mut tx, payment).await?;

        tx.commit().await?;
        Ok(())
    }

    /// Moves every sent invoice whose due date is before `today` to overdue.
    ///
    /// Returns the number of invoices changed.
    pub async fn mark_overdue(&self, today: NaiveDate, now: DateTime<Utc>) -> DbResult<u64> {
        let result = sqlx::query(
            r#"
            UPDATE invoices SET status = 'overdue', updated_at = ?2
            WHERE status = 'sent' AND due_date < ?1
            "#,
        )
        .bind(today)
        .bind(now)
        .execute(&self.pool)
        .await?;

        let changed = result.rows_affected();
        if changed > 0 {
            info!(count = changed, %today, "Marked invoices overdue");
        }

        Ok(changed)
    }

    /// Gets an invoice with its line items.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Invoice>> {
        let row = sqlx::query_as::<_, InvoiceRow>(&format!("{} WHERE id = ?1", SELECT_INVOICE))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => {
                let items = self.items_for(&row.id).await?;
                Ok(Some(row.into_invoice(items)?))
            }
            None => Ok(None),
        }
    }

    /// Gets an invoice, failing with [`DbError::NotFound`] when missing.
    pub async fn require(&self, id: &str) -> DbResult<Invoice> {
        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Invoice", id))
    }

    /// Lists invoices, newest issue date first.
    pub async fn list(&self, filter: &InvoiceFilter) -> DbResult<Vec<Invoice>> {
        let rows = sqlx::query_as::<_, InvoiceRow>(&format!(
            "{} WHERE (?1 IS NULL OR status = ?1) AND (?2 IS NULL OR client_id = ?2) \
             ORDER BY issue_date DESC, number DESC LIMIT ?3",
            SELECT_INVOICE
        ))
        .bind(filter.status)
        .bind(&filter.client_id)
        .bind(filter.limit)
        .fetch_all(&self.pool)
        .await?;

        let mut invoices = Vec::with_capacity(rows.len());
        for row in rows {
            let items = self.items_for(&row.id).await?;
            invoices.push(row.into_invoice(items)?);
        }

        Ok(invoices)
    }

    /// Dashboard snapshot: invoices issued in `[start, end]`.
    pub async fn records_between(&self, start: NaiveDate, end: NaiveDate) -> DbResult<Vec<InvoiceRecord>> {
        let rows = sqlx::query_as::<_, RecordRow>(
            r#"
            SELECT total_cents, amount_paid_cents, status, issue_date
            FROM invoices
            WHERE issue_date >= ?1 AND issue_date <= ?2
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(InvoiceRecord::from).collect())
    }

    /// Dashboard snapshot over every invoice.
    pub async fn all_records(&self) -> DbResult<Vec<InvoiceRecord>> {
        let rows = sqlx::query_as::<_, RecordRow>(
            "SELECT total_cents, amount_paid_cents, status, issue_date FROM invoices",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(InvoiceRecord::from).collect())
    }

    async fn items_for(&self, invoice_id: &str) -> DbResult<Vec<LineItem>> {
        let rows = sqlx::query_as::<_, ItemRow>(
            r#"
            SELECT position, description, quantity, rate, amount_cents
            FROM invoice_items
            WHERE invoice_id = ?1
            ORDER BY position
            "#,
        )
        .bind(invoice_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(ItemRow::into_line_item).collect()
    }
}

/// Tells a guarded write that matched no row apart: the invoice is gone, or
/// it changed since it was read.
async fn stale_or_missing(conn: &mut SqliteConnection, id: &str) -> DbError {
    let exists = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM invoices WHERE id = ?1")
        .bind(id)
        .fetch_one(&mut *conn)
        .await;

    match exists {
        Ok(0) => DbError::not_found("Invoice", id),
        Ok(_) => {
            warn!(%id, "Invoice changed since it was read");
            DbError::conflict("Invoice", id)
        }
        Err(e) => e.into(),
    }
}

async fn insert_items(conn: &mut SqliteConnection, invoice_id: &str, items: &[LineItem]) -> DbResult<()> {
    for item in items {
        sqlx::query(
            r#"
            INSERT INTO invoice_items (
                id, invoice_id, position, description, quantity, rate, amount_cents
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(invoice_id)
        .bind(i64::from(item.order))
        .bind(&item.description)
        .bind(item.quantity.to_string())
        .bind(item.rate.to_string())
        .bind(item.amount.cents())
        .execute(&mut *conn)
        .await?;
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
