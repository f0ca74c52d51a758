//! Dashboard endpoints. All aggregation happens in `folio_core::stats`;
//! these handlers only pick the record snapshot to feed it.

use axum::extract::{Query, State};
use axum::Json;
use chrono::NaiveDate;
use serde::Deserialize;

use folio_core::period::{last_of_month, months_back, ReportingPeriods};
use folio_core::stats::{monthly_revenue, status_breakdown, MonthlyRevenue, StatusSummary};
use folio_core::{DashboardStats, DEFAULT_REVENUE_MONTHS};

use crate::error::ApiResult;
use crate::routes::reference_date;
use crate::state::AppState;

/// Longest revenue series the endpoint will build.
pub const MAX_REVENUE_MONTHS: u32 = 24;

#[derive(Debug, Default, Deserialize)]
pub struct StatsParams {
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RevenueParams {
    pub months: Option<u32>,
    pub date: Option<NaiveDate>,
}

/// `GET /api/dashboard/stats`
pub async fn stats(
    State(state): State<AppState>,
    Query(params): Query<StatsParams>,
) -> ApiResult<Json<DashboardStats>> {
    let today = reference_date(params.date);
    let periods = ReportingPeriods::month_to_date(today);

    let records = state
        .db
        .invoices()
        .records_between(periods.previous.start, periods.current.end)
        .await?;

    Ok(Json(DashboardStats::compute(&records, today)))
}

/// `GET /api/dashboard/revenue`
pub async fn revenue(
    State(state): State<AppState>,
    Query(params): Query<RevenueParams>,
) -> ApiResult<Json<Vec<MonthlyRevenue>>> {
    let today = reference_date(params.date);
    let months = params
        .months
        .unwrap_or(DEFAULT_REVENUE_MONTHS)
        .clamp(1, MAX_REVENUE_MONTHS);

    let records = state
        .db
        .invoices()
        .records_between(months_back(today, months - 1), last_of_month(today))
        .await?;

    Ok(Json(monthly_revenue(&records, today, months)))
}

/// `GET /api/dashboard/status`
pub async fn status(State(state): State<AppState>) -> ApiResult<Json<Vec<StatusSummary>>> {
    let records = state.db.invoices().all_records().await?;
    Ok(Json(status_breakdown(&records)))
}
