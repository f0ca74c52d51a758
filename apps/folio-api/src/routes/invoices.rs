//! Invoice endpoints.
//!
//! Every state change goes through the matching `Invoice` method in
//! folio-core first; the repository only persists the result.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use folio_core::validation::{validate_discount, validate_line_item_count, validate_tax_rate, validate_uuid};
use folio_core::{
    CoreError, Discount, Invoice, InvoiceDraft, InvoiceStatus, InvoiceTotals, LineItemInput, Money,
    Payment, PaymentInput, Percentage,
};
use folio_db::InvoiceFilter;

use crate::error::{ApiError, ApiResult};
use crate::routes::{page_size, reference_date};
use crate::state::AppState;

// =============================================================================
// Request / Response Types
// =============================================================================

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListInvoicesParams {
    pub status: Option<String>,
    pub client_id: Option<String>,
    pub limit: Option<i64>,
}

/// Body of the totals preview. Descriptions may still be blank while the
/// user is typing, so only the numeric rules are checked.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TotalsRequest {
    #[serde(default)]
    pub items: Vec<LineItemInput>,
    #[serde(default)]
    pub discount: Discount,
    #[serde(default)]
    pub tax_rate: Percentage,
}

/// An invoice together with its payment history.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceDetail {
    #[serde(flatten)]
    pub invoice: Invoice,
    pub balance: Money,
    pub payments: Vec<Payment>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentReceipt {
    pub payment: Payment,
    pub invoice: Invoice,
}

#[derive(Debug, Default, Deserialize)]
pub struct MarkOverdueParams {
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
pub struct MarkOverdueResponse {
    pub date: NaiveDate,
    pub updated: u64,
}

// =============================================================================
// Handlers
// =============================================================================

/// `POST /api/invoices/totals`
pub async fn preview_totals(Json(request): Json<TotalsRequest>) -> ApiResult<Json<InvoiceTotals>> {
    validate_line_item_count(request.items.len())?;
    validate_discount(&request.discount)?;
    validate_tax_rate(request.tax_rate)?;

    let draft = InvoiceDraft {
        client_id: String::new(),
        issue_date: Utc::now().date_naive(),
        due_date: None,
        items: request.items,
        discount: request.discount,
        tax_rate: request.tax_rate,
        notes: None,
    };
    Ok(Json(draft.totals()))
}

/// `GET /api/invoices`
pub async fn list_invoices(
    State(state): State<AppState>,
    Query(params): Query<ListInvoicesParams>,
) -> ApiResult<Json<Vec<Invoice>>> {
    let mut filter = InvoiceFilter::new(page_size(params.limit));

    if let Some(status) = params.status.as_deref().filter(|s| !s.trim().is_empty()) {
        let status: InvoiceStatus = status.parse().map_err(ApiError::bad_request)?;
        filter = filter.status(status);
    }
    if let Some(client_id) = params.client_id {
        validate_uuid(&client_id)?;
        filter = filter.client(client_id);
    }

    let invoices = state.db.invoices().list(&filter).await?;
    Ok(Json(invoices))
}

/// `POST /api/invoices`
pub async fn create_invoice(
    State(state): State<AppState>,
    Json(draft): Json<InvoiceDraft>,
) -> ApiResult<(StatusCode, Json<Invoice>)> {
    let draft = draft.with_payment_terms(state.config.default_payment_terms_days);
    draft.validate()?;
    ensure_client_exists(&state, &draft.client_id).await?;

    let number = state.db.invoices().next_number(&state.config.invoice_prefix).await?;
    let invoice = Invoice::from_draft(draft, number, Utc::now())?;
    state.db.invoices().insert(&invoice).await?;

    info!(id = %invoice.id, number = %invoice.number, total = %invoice.totals.total, "Invoice created");
    Ok((StatusCode::CREATED, Json(invoice)))
}

/// `GET /api/invoices/{id}`
pub async fn get_invoice(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<InvoiceDetail>> {
    let invoice = load_invoice(&state, &id).await?;
    let payments = state.db.payments().list_for_invoice(&invoice.id).await?;

    Ok(Json(InvoiceDetail {
        balance: invoice.balance(),
        invoice,
        payments,
    }))
}

/// `PUT /api/invoices/{id}`
pub async fn update_invoice(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(draft): Json<InvoiceDraft>,
) -> ApiResult<Json<Invoice>> {
    let draft = draft.with_payment_terms(state.config.default_payment_terms_days);
    draft.validate()?;

    let mut invoice = load_invoice(&state, &id).await?;
    if draft.client_id != invoice.client_id {
        ensure_client_exists(&state, &draft.client_id).await?;
    }

    let previous = invoice.status;
    invoice.apply_draft(draft, Utc::now())?;
    state.db.invoices().update(&invoice, previous).await?;

    info!(id = %invoice.id, total = %invoice.totals.total, "Invoice updated");
    Ok(Json(invoice))
}

/// `POST /api/invoices/{id}/send`
pub async fn send_invoice(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Invoice>> {
    let mut invoice = load_invoice(&state, &id).await?;
    let previous = invoice.status;
    invoice.mark_sent(Utc::now())?;
    state.db.invoices().update_status(&invoice, previous).await?;

    info!(id = %invoice.id, number = %invoice.number, "Invoice sent");
    Ok(Json(invoice))
}

/// `POST /api/invoices/{id}/cancel`
pub async fn cancel_invoice(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Invoice>> {
    let mut invoice = load_invoice(&state, &id).await?;
    let previous = invoice.status;
    invoice.cancel(Utc::now())?;
    state.db.invoices().update_status(&invoice, previous).await?;

    info!(id = %invoice.id, number = %invoice.number, "Invoice cancelled");
    Ok(Json(invoice))
}

/// `POST /api/invoices/{id}/payments`
pub async fn record_payment(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<PaymentInput>,
) -> ApiResult<(StatusCode, Json<PaymentReceipt>)> {
    let mut invoice = load_invoice(&state, &id).await?;
    let payment = invoice.record_payment(input, Utc::now())?;
    state.db.invoices().record_payment(&invoice, &payment).await?;

    // The stored status may differ if the overdue sweep ran in between.
    let invoice = state.db.invoices().require(&invoice.id).await?;

    info!(
        id = %invoice.id,
        amount = %payment.amount,
        balance = %invoice.balance(),
        status = %invoice.status,
        "Payment recorded"
    );
    Ok((StatusCode::CREATED, Json(PaymentReceipt { payment, invoice })))
}

/// `POST /api/invoices/mark-overdue`
pub async fn mark_overdue(
    State(state): State<AppState>,
    Query(params): Query<MarkOverdueParams>,
) -> ApiResult<Json<MarkOverdueResponse>> {
    let date = reference_date(params.date);
    let updated = state.db.invoices().mark_overdue(date, Utc::now()).await?;

    debug!(%date, updated, "Overdue sweep finished");
    Ok(Json(MarkOverdueResponse { date, updated }))
}

// =============================================================================
// Helpers
// =============================================================================

async fn load_invoice(state: &AppState, id: &str) -> ApiResult<Invoice> {
    validate_uuid(id)?;
    Ok(state.db.invoices().require(id).await?)
}

async fn ensure_client_exists(state: &AppState, client_id: &str) -> ApiResult<()> {
    match state.db.clients().get_by_id(client_id).await? {
        Some(_) => Ok(()),
        None => Err(CoreError::ClientNotFound(client_id.to_string()).into()),
    }
}
