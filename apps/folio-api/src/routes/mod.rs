//! # HTTP Routes
//!
//! ```text
//! GET    /health
//!
//! GET    /api/clients                      list clients
//! POST   /api/clients                      create client
//! GET    /api/clients/{id}                 get client
//!
//! POST   /api/invoices/totals              preview totals for an unsaved draft
//! POST   /api/invoices/mark-overdue        flip past-due sent invoices to overdue
//! GET    /api/invoices                     list (?status=&clientId=&limit=)
//! POST   /api/invoices                     create draft
//! GET    /api/invoices/{id}                invoice with payments
//! PUT    /api/invoices/{id}                replace draft contents
//! POST   /api/invoices/{id}/send           draft -> sent
//! POST   /api/invoices/{id}/cancel         open -> cancelled
//! POST   /api/invoices/{id}/payments       record a payment
//!
//! GET    /api/dashboard/stats              month-to-date stats and trends (?date=)
//! GET    /api/dashboard/revenue            monthly revenue series (?months=&date=)
//! GET    /api/dashboard/status             totals per invoice status
//! ```

pub mod clients;
pub mod dashboard;
pub mod health;
pub mod invoices;

use chrono::{NaiveDate, Utc};

/// Upper bound on list page sizes.
pub const MAX_PAGE_SIZE: i64 = 500;

/// Page size used when a list request does not give one.
pub const DEFAULT_PAGE_SIZE: i64 = 50;

/// Clamps a requested page size into `1..=MAX_PAGE_SIZE`.
pub(crate) fn page_size(limit: Option<i64>) -> i64 {
    limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE)
}

/// The reference day for a request: an explicit `?date=` or today (UTC).
pub(crate) fn reference_date(date: Option<NaiveDate>) -> NaiveDate {
    date.unwrap_or_else(|| Utc::now().date_naive())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_size() {
        assert_eq!(page_size(None), DEFAULT_PAGE_SIZE);
        assert_eq!(page_size(Some(0)), 1);
        assert_eq!(page_size(Some(10_000)), MAX_PAGE_SIZE);
        assert_eq!(page_size(Some(20)), 20);
    }
}
