//! # Repository Module
//!
//! Database repository implementations for Folio.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  HTTP handler                                                          │
//! │       │                                                                 │
//! │       │  db.invoices().require(&id)                                    │
//! │       ▼                                                                 │
//! │  InvoiceRepository                                                     │
//! │  ├── insert / update          (invoice + items, transactional)         │
//! │  ├── get_by_id / list                                                  │
//! │  ├── update_status / record_payment / mark_overdue                     │
//! │  └── records_between / all_records  (dashboard snapshot)               │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`ClientRepository`](client::ClientRepository) - Client CRUD
//! - [`InvoiceRepository`](invoice::InvoiceRepository) - Invoices, line items, snapshots
//! - [`PaymentRepository`](payment::PaymentRepository) - Payment history

pub mod client;
pub mod invoice;
pub mod payment;

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::{NaiveDate, Utc};
    use folio_core::{Client, Discount, Invoice, InvoiceDraft, LineItemInput, Percentage};
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    use crate::{Database, DbConfig};

    pub async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    pub fn sample_client(name: &str) -> Client {
        let now = Utc::now();
        Client {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            email: Some("billing@example.com".to_string()),
            phone: None,
            address: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Two lines, 10% discount, 8% tax: total 121.99.
    pub fn sample_draft(client_id: &str) -> InvoiceDraft {
        InvoiceDraft {
            client_id: client_id.to_string(),
            issue_date: NaiveDate::from_ymd_opt(2026, 10, 1).unwrap(),
            due_date: NaiveDate::from_ymd_opt(2026, 10, 31),
            items: vec![
                LineItemInput {
                    description: "Design".to_string(),
                    quantity: dec!(2),
                    rate: dec!(50.00),
                },
                LineItemInput {
                    description: "Hosting".to_string(),
                    quantity: dec!(1),
                    rate: dec!(25.50),
                },
            ],
            discount: Discount::Percentage { value: dec!(10) },
            tax_rate: Percentage::new(dec!(8)),
            notes: Some("Thanks!".to_string()),
        }
    }

    /// Inserts a fresh client and a draft invoice for it.
    pub async fn persisted_invoice(db: &Database) -> Invoice {
        let client = sample_client("Acme");
        db.clients().insert(&client).await.unwrap();

        let number = db.invoices().next_number("INV").await.unwrap();
        let invoice = Invoice::from_draft(sample_draft(&client.id), number, Utc::now()).unwrap();
        db.invoices().insert(&invoice).await.unwrap();
        invoice
    }
}
