//! # Payment Repository
//!
//! Payments are written together with the invoice balance they change (see
//! [`InvoiceRepository::record_payment`](super::invoice::InvoiceRepository::record_payment));
//! this repository covers reads and the shared insert statement.

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::DbResult;
use folio_core::{Money, Payment, PaymentMethod};

#[derive(Debug, sqlx::FromRow)]
struct PaymentRow {
    id: String,
    invoice_id: String,
    amount_cents: i64,
    method: PaymentMethod,
    paid_on: NaiveDate,
    reference: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<PaymentRow> for Payment {
    fn from(row: PaymentRow) -> Self {
        Payment {
            id: row.id,
            invoice_id: row.invoice_id,
            amount: Money::from_cents(row.amount_cents),
            method: row.method,
            paid_on: row.paid_on,
            reference: row.reference,
            created_at: row.created_at,
        }
    }
}

/// Repository for payment database operations.
#[derive(Debug, Clone)]
pub struct PaymentRepository {
    pool: SqlitePool,
}

impl PaymentRepository {
    pub fn new(pool: SqlitePool) -> Self {
        PaymentRepository { pool }
    }

    /// Inserts a payment on its own.
    ///
    /// Does not touch the invoice balance; use
    /// `InvoiceRepository::record_payment` for the normal flow.
    pub async fn insert(&self, payment: &Payment) -> DbResult<()> {
        let mut conn = self.pool.acquire().await?;
        insert_payment(&mut conn, payment).await
    }

    /// All payments for an invoice, oldest first.
    pub async fn list_for_invoice(&self, invoice_id: &str) -> DbResult<Vec<Payment>> {
        let rows = sqlx::query_as::<_, PaymentRow>(
            r#"
            SELECT id, invoice_id, amount_cents, method, paid_on, reference, created_at
            FROM payments
            WHERE invoice_id = ?1
            ORDER BY paid_on, created_at
            "#,
        )
        .bind(invoice_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Payment::from).collect())
    }

    /// Sum of all payments for an invoice.
    pub async fn total_for_invoice(&self, invoice_id: &str) -> DbResult<Money> {
        let total: Option<i64> =
            sqlx::query_scalar("SELECT SUM(amount_cents) FROM payments WHERE invoice_id = ?1")
                .bind(invoice_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(Money::from_cents(total.unwrap_or(0)))
    }
}

/// Shared insert used both standalone and inside the payment transaction.
pub(crate) async fn insert_payment(conn: &mut SqliteConnection, payment: &Payment) -> DbResult<()> {
    debug!(invoice_id = %payment.invoice_id, amount = %payment.amount, "Recording payment");

    sqlx::query(
        r#"
        INSERT INTO payments (id, invoice_id, amount_cents, method, paid_on, reference, created_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
        "#,
    )
    .bind(&payment.id)
    .bind(&payment.invoice_id)
    .bind(payment.amount.cents())
    .bind(payment.method)
    .bind(payment.paid_on)
    .bind(&payment.reference)
    .bind(payment.created_at)
    .execute(conn)
    .await?;

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DbError;
    use crate::repository::test_support::{persisted_invoice, test_db};
    use chrono::Utc;
    use uuid::Uuid;

    fn payment(invoice_id: &str, cents: i64, day: u32) -> Payment {
        Payment {
            id: Uuid::new_v4().to_string(),
            invoice_id: invoice_id.to_string(),
            amount: Money::from_cents(cents),
            method: PaymentMethod::Card,
            paid_on: NaiveDate::from_ymd_opt(2026, 10, day).unwrap(),
            reference: Some("ref".to_string()),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_insert_and_list() {
        let db = test_db().await;
        let invoice = persisted_invoice(&db).await;

        db.payments().insert(&payment(&invoice.id, 500, 9)).await.unwrap();
        db.payments().insert(&payment(&invoice.id, 700, 3)).await.unwrap();

        let payments = db.payments().list_for_invoice(&invoice.id).await.unwrap();
        assert_eq!(payments.len(), 2);
        assert_eq!(payments[0].amount.cents(), 700);
        assert_eq!(payments[0].method, PaymentMethod::Card);

        let total = db.payments().total_for_invoice(&invoice.id).await.unwrap();
        assert_eq!(total.cents(), 1200);
    }

    #[tokio::test]
    async fn test_total_without_payments_is_zero() {
        let db = test_db().await;
        assert_eq!(db.payments().total_for_invoice("none").await.unwrap(), Money::zero());
    }

    #[tokio::test]
    async fn test_payment_requires_invoice() {
        let db = test_db().await;
        let err = db.payments().insert(&payment("missing", 100, 1)).await.unwrap_err();
        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));
    }
}
