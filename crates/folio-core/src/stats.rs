//! # Dashboard Statistics
//!
//! Aggregates invoice snapshots into per-period statistics and derives
//! period-over-period trends.
//!
//! ## Aggregation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Dashboard Aggregation                               │
//! │                                                                         │
//! │  [InvoiceRecord] (total, amount_paid, status, issue_date)              │
//! │         │                                                               │
//! │         ├── issue_date ∈ current window ──► PeriodStats (current)      │
//! │         │                                                               │
//! │         └── issue_date ∈ previous window ─► PeriodStats (previous)     │
//! │                                                  │                      │
//! │                                                  ▼                      │
//! │                        trend(current, previous) per metric             │
//! │                                                  │                      │
//! │                                                  ▼                      │
//! │                                           DashboardStats               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Per-Period Metrics
//! | Metric               | Definition                                          |
//! |----------------------|-----------------------------------------------------|
//! | `total_revenue`      | Σ total where status = paid                         |
//! | `outstanding_amount` | Σ (total − paid) where status ∉ {paid, cancelled}   |
//! | `overdue_amount`     | Σ (total − paid) where status = overdue             |
//! | `payment_rate`       | round(100 × paid / non-cancelled), 0 if none        |
//! | `overdue_percentage` | round(100 × overdue / outstanding), 0 if none       |
//!
//! Nothing here is persisted; every query recomputes from the snapshot.
//! An empty snapshot is a valid state and yields all zeros.

use chrono::{Datelike, NaiveDate};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::{money_add, money_subtract, Money};
use crate::period::{months_back, DateWindow, ReportingPeriods};
use crate::types::{InvoiceRecord, InvoiceStatus};

// =============================================================================
// Period Stats
// =============================================================================

/// Statistics for one reporting window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct PeriodStats {
    pub total_revenue: Money,
    pub outstanding_amount: Money,
    pub overdue_amount: Money,
    pub paid_invoices_count: i64,
    pub overdue_invoices_count: i64,
    /// Every invoice issued in the window, cancelled ones included.
    pub total_invoices_in_period: i64,
    /// Whole percent of non-cancelled invoices that are paid.
    pub payment_rate: i64,
    /// Whole percent of the outstanding amount that is overdue.
    pub overdue_percentage: i64,
}

impl PeriodStats {
    /// Aggregates a set of records already filtered to one window.
    pub fn compute<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a InvoiceRecord>,
    {
        let mut stats = PeriodStats::default();
        let mut billable_count: i64 = 0;

        for record in records {
            stats.total_invoices_in_period += 1;

            match record.status {
                InvoiceStatus::Paid => {
                    stats.total_revenue = money_add(stats.total_revenue, record.total);
                    stats.paid_invoices_count += 1;
                }
                InvoiceStatus::Overdue => {
                    stats.overdue_amount = money_add(stats.overdue_amount, record.balance());
                    stats.overdue_invoices_count += 1;
                }
                _ => {}
            }

            if record.status.is_open() {
                stats.outstanding_amount = money_add(stats.outstanding_amount, record.balance());
            }

            if record.status != InvoiceStatus::Cancelled {
                billable_count += 1;
            }
        }

        stats.payment_rate = rounded_percent(
            Decimal::from(stats.paid_invoices_count),
            Decimal::from(billable_count),
        );
        stats.overdue_percentage = rounded_percent(
            stats.overdue_amount.as_decimal(),
            stats.outstanding_amount.as_decimal(),
        );

        stats
    }

    /// Aggregates only the records issued inside `window`.
    pub fn for_window(records: &[InvoiceRecord], window: DateWindow) -> Self {
        Self::compute(records.iter().filter(|r| window.contains(r.issue_date)))
    }
}

// =============================================================================
// Trends
// =============================================================================

/// Percentage change from `previous` to `current`, rounded to a whole percent.
///
/// ## Zero Baseline
/// ```text
///   previous == 0, current > 0  →  100   (nothing → something)
///   previous == 0, current <= 0 →    0
/// ```
///
/// ## Example
/// ```rust
/// use folio_core::stats::trend_percentage;
/// use rust_decimal::Decimal;
///
/// assert_eq!(trend_percentage(Decimal::from(500), Decimal::from(400)), 25);
/// assert_eq!(trend_percentage(Decimal::from(50), Decimal::ZERO), 100);
/// assert_eq!(trend_percentage(Decimal::ZERO, Decimal::ZERO), 0);
/// ```
pub fn trend_percentage(current: Decimal, previous: Decimal) -> i64 {
    if previous.is_zero() {
        return if current > Decimal::ZERO { 100 } else { 0 };
    }

    let change = (current - previous) * Decimal::ONE_HUNDRED / previous;
    round_to_i64(change)
}

/// Trend of a monetary metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct MoneyTrend {
    pub percentage: i64,
    pub change: Money,
}

impl MoneyTrend {
    pub fn between(current: Money, previous: Money) -> Self {
        MoneyTrend {
            percentage: trend_percentage(current.as_decimal(), previous.as_decimal()),
            change: money_subtract(current, previous),
        }
    }
}

/// Trend of a count (or whole-percent) metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CountTrend {
    pub percentage: i64,
    pub change: i64,
}

impl CountTrend {
    pub fn between(current: i64, previous: i64) -> Self {
        CountTrend {
            percentage: trend_percentage(Decimal::from(current), Decimal::from(previous)),
            change: current.saturating_sub(previous),
        }
    }
}

/// Trends for every dashboard card.
///
/// Polarity (is "up" good?) is a presentation concern and lives in the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct DashboardTrends {
    pub revenue: MoneyTrend,
    pub outstanding: MoneyTrend,
    pub overdue: MoneyTrend,
    pub paid_invoices: CountTrend,
    pub overdue_invoices: CountTrend,
    pub invoices: CountTrend,
    pub payment_rate: CountTrend,
}

impl DashboardTrends {
    pub fn between(current: &PeriodStats, previous: &PeriodStats) -> Self {
        DashboardTrends {
            revenue: MoneyTrend::between(current.total_revenue, previous.total_revenue),
            outstanding: MoneyTrend::between(
                current.outstanding_amount,
                previous.outstanding_amount,
            ),
            overdue: MoneyTrend::between(current.overdue_amount, previous.overdue_amount),
            paid_invoices: CountTrend::between(
                current.paid_invoices_count,
                previous.paid_invoices_count,
            ),
            overdue_invoices: CountTrend::between(
                current.overdue_invoices_count,
                previous.overdue_invoices_count,
            ),
            invoices: CountTrend::between(
                current.total_invoices_in_period,
                previous.total_invoices_in_period,
            ),
            payment_rate: CountTrend::between(current.payment_rate, previous.payment_rate),
        }
    }
}

// =============================================================================
// Dashboard Stats
// =============================================================================

/// Current month-to-date statistics compared against the previous
/// month-to-date window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct DashboardStats {
    pub periods: ReportingPeriods,
    pub current: PeriodStats,
    pub previous: PeriodStats,
    pub trends: DashboardTrends,
}

impl DashboardStats {
    /// Computes dashboard statistics from a snapshot of invoice records.
    ///
    /// Records outside both windows are ignored, so callers may pass the
    /// whole invoice table or a pre-filtered slice.
    ///
    /// ## Example
    /// ```rust
    /// use chrono::NaiveDate;
    /// use folio_core::stats::DashboardStats;
    ///
    /// let today = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();
    /// let stats = DashboardStats::compute(&[], today);
    /// assert_eq!(stats.current.payment_rate, 0);
    /// assert_eq!(stats.trends.revenue.percentage, 0);
    /// ```
    pub fn compute(records: &[InvoiceRecord], today: NaiveDate) -> Self {
        let periods = ReportingPeriods::month_to_date(today);
        let current = PeriodStats::for_window(records, periods.current);
        let previous = PeriodStats::for_window(records, periods.previous);

        DashboardStats {
            periods,
            current,
            previous,
            trends: DashboardTrends::between(&current, &previous),
        }
    }
}

// =============================================================================
// Revenue Series & Status Breakdown
// =============================================================================

/// Revenue for one calendar month, for the dashboard chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct MonthlyRevenue {
    /// `YYYY-MM`
    pub month: String,
    /// Σ total of paid invoices issued in the month.
    pub revenue: Money,
    /// Σ total of non-cancelled invoices issued in the month.
    pub invoiced: Money,
    pub invoice_count: i64,
}

/// Builds a revenue series for the `months` calendar months ending with the
/// month of `today`, oldest first.
pub fn monthly_revenue(records: &[InvoiceRecord], today: NaiveDate, months: u32) -> Vec<MonthlyRevenue> {
    (0..months)
        .rev()
        .map(|offset| {
            let start = months_back(today, offset);
            let in_month = records.iter().filter(|r| {
                r.issue_date.year() == start.year() && r.issue_date.month() == start.month()
            });

            let mut bucket = MonthlyRevenue {
                month: start.format("%Y-%m").to_string(),
                revenue: Money::zero(),
                invoiced: Money::zero(),
                invoice_count: 0,
            };

            for record in in_month {
                if record.status == InvoiceStatus::Cancelled {
                    continue;
                }
                bucket.invoice_count += 1;
                bucket.invoiced = money_add(bucket.invoiced, record.total);
                if record.status == InvoiceStatus::Paid {
                    bucket.revenue = money_add(bucket.revenue, record.total);
                }
            }

            bucket
        })
        .collect()
}

/// Count and total amount of invoices in one status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct StatusSummary {
    pub status: InvoiceStatus,
    pub count: i64,
    pub amount: Money,
}

/// One entry per status (zero entries included), in lifecycle order.
pub fn status_breakdown(records: &[InvoiceRecord]) -> Vec<StatusSummary> {
    InvoiceStatus::ALL
        .into_iter()
        .map(|status| {
            records
                .iter()
                .filter(|r| r.status == status)
                .fold(
                    StatusSummary {
                        status,
                        count: 0,
                        amount: Money::zero(),
                    },
                    |mut acc, r| {
                        acc.count += 1;
                        acc.amount = money_add(acc.amount, r.total);
                        acc
                    },
                )
        })
        .collect()
}

// =============================================================================
// Helpers
// =============================================================================

/// `round(100 × numerator / denominator)`, or 0 for a zero denominator.
fn rounded_percent(numerator: Decimal, denominator: Decimal) -> i64 {
    if denominator.is_zero() {
        return 0;
    }
    round_to_i64(numerator * Decimal::ONE_HUNDRED / denominator)
}

fn round_to_i64(value: Decimal) -> i64 {
    let rounded = value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    match rounded.to_i64() {
        Some(v) => v,
        None if rounded.is_sign_negative() => i64::MIN,
        None => i64::MAX,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn record(total: i64, paid: i64, status: InvoiceStatus, issue_date: NaiveDate) -> InvoiceRecord {
        InvoiceRecord {
            total: Money::from_cents(total),
            amount_paid: Money::from_cents(paid),
            status,
            issue_date,
        }
    }

    #[test]
    fn test_trend_zero_previous() {
        assert_eq!(trend_percentage(dec!(50), Decimal::ZERO), 100);
        assert_eq!(trend_percentage(Decimal::ZERO, Decimal::ZERO), 0);
    }

    #[test]
    fn test_trend_rounding() {
        assert_eq!(trend_percentage(dec!(500), dec!(400)), 25);
        assert_eq!(trend_percentage(dec!(300), dec!(400)), -25);
        // 1/3 → 33.33 → 33; 2/3 → 66.67 → 67
        assert_eq!(trend_percentage(dec!(4), dec!(3)), 33);
        assert_eq!(trend_percentage(dec!(5), dec!(3)), 67);
        // -12.5 rounds away from zero
        assert_eq!(trend_percentage(dec!(7), dec!(8)), -13);
    }

    #[test]
    fn test_payment_rate_with_zero_invoices() {
        let stats = PeriodStats::compute(&[]);
        assert_eq!(stats.total_invoices_in_period, 0);
        assert_eq!(stats.payment_rate, 0);
        assert_eq!(stats.overdue_percentage, 0);
        assert_eq!(stats, PeriodStats::default());
    }

    #[test]
    fn test_cancelled_invoices_excluded_from_payment_rate() {
        let d = date(2026, 10, 2);
        let records = [
            record(10000, 10000, InvoiceStatus::Paid, d),
            record(10000, 0, InvoiceStatus::Sent, d),
            record(10000, 0, InvoiceStatus::Cancelled, d),
        ];
        let stats = PeriodStats::compute(&records);

        assert_eq!(stats.total_invoices_in_period, 3);
        assert_eq!(stats.payment_rate, 50);
        assert_eq!(stats.outstanding_amount.cents(), 10000);
    }

    #[test]
    fn test_only_cancelled_invoices_give_zero_rate() {
        let records = [record(500, 0, InvoiceStatus::Cancelled, date(2026, 10, 2))];
        let stats = PeriodStats::compute(&records);
        assert_eq!(stats.total_invoices_in_period, 1);
        assert_eq!(stats.payment_rate, 0);
        assert_eq!(stats.outstanding_amount, Money::zero());
    }

    #[test]
    fn test_outstanding_includes_partial_payments_and_drafts() {
        let d = date(2026, 10, 2);
        let records = [
            record(20000, 5000, InvoiceStatus::Sent, d),
            record(3000, 0, InvoiceStatus::Draft, d),
            record(10000, 2500, InvoiceStatus::Overdue, d),
        ];
        let stats = PeriodStats::compute(&records);

        assert_eq!(stats.outstanding_amount.cents(), 15000 + 3000 + 7500);
        assert_eq!(stats.overdue_amount.cents(), 7500);
        // 7500 / 25500 = 29.41 %
        assert_eq!(stats.overdue_percentage, 29);
    }

    #[test]
    fn test_dashboard_scenario() {
        let today = date(2026, 10, 17);
        let records = [
            // current window
            record(25000, 25000, InvoiceStatus::Paid, date(2026, 10, 3)),
            record(25000, 25000, InvoiceStatus::Paid, date(2026, 10, 9)),
            record(20000, 5000, InvoiceStatus::Overdue, date(2026, 10, 1)),
            // previous window
            record(40000, 40000, InvoiceStatus::Paid, date(2026, 9, 12)),
            // previous month but after the same day-of-month: ignored
            record(99900, 99900, InvoiceStatus::Paid, date(2026, 9, 25)),
        ];

        let stats = DashboardStats::compute(&records, today);

        assert_eq!(stats.current.total_revenue.as_decimal(), dec!(500));
        assert_eq!(stats.current.outstanding_amount.as_decimal(), dec!(150));
        assert_eq!(stats.current.overdue_amount.as_decimal(), dec!(150));
        assert_eq!(stats.current.overdue_percentage, 100);
        assert_eq!(stats.current.paid_invoices_count, 2);
        assert_eq!(stats.current.payment_rate, 67);

        assert_eq!(stats.previous.total_revenue.as_decimal(), dec!(400));
        assert_eq!(stats.previous.total_invoices_in_period, 1);

        assert_eq!(stats.trends.revenue.percentage, 25);
        assert_eq!(stats.trends.revenue.change.as_decimal(), dec!(100));
        assert_eq!(stats.trends.outstanding.percentage, 100);
        assert_eq!(stats.trends.invoices, CountTrend { percentage: 200, change: 2 });
        assert_eq!(stats.trends.payment_rate, CountTrend { percentage: -33, change: -33 });
    }

    #[test]
    fn test_dashboard_with_empty_snapshot() {
        let stats = DashboardStats::compute(&[], date(2026, 10, 16));
        assert_eq!(stats.current, PeriodStats::default());
        assert_eq!(stats.previous, PeriodStats::default());
        assert_eq!(stats.trends, DashboardTrends::default());
    }

    #[test]
    fn test_dashboard_is_deterministic() {
        let records = [
            record(12345, 0, InvoiceStatus::Sent, date(2026, 10, 5)),
            record(9999, 9999, InvoiceStatus::Paid, date(2026, 9, 5)),
        ];
        let today = date(2026, 10, 16);
        assert_eq!(
            DashboardStats::compute(&records, today),
            DashboardStats::compute(&records, today)
        );
    }

    #[test]
    fn test_monthly_revenue_series() {
        let records = [
            record(10000, 10000, InvoiceStatus::Paid, date(2026, 10, 2)),
            record(5000, 0, InvoiceStatus::Sent, date(2026, 10, 4)),
            record(7000, 7000, InvoiceStatus::Paid, date(2026, 8, 30)),
            record(1000, 0, InvoiceStatus::Cancelled, date(2026, 8, 2)),
            record(4000, 4000, InvoiceStatus::Paid, date(2026, 5, 2)),
        ];
        let series = monthly_revenue(&records, date(2026, 10, 16), 3);

        let months: Vec<&str> = series.iter().map(|m| m.month.as_str()).collect();
        assert_eq!(months, vec!["2026-08", "2026-09", "2026-10"]);

        assert_eq!(series[0].revenue.cents(), 7000);
        assert_eq!(series[0].invoice_count, 1);
        assert_eq!(series[1].invoiced, Money::zero());
        assert_eq!(series[2].revenue.cents(), 10000);
        assert_eq!(series[2].invoiced.cents(), 15000);

        assert!(monthly_revenue(&records, date(2026, 10, 16), 0).is_empty());
    }

    #[test]
    fn test_status_breakdown() {
        let d = date(2026, 10, 2);
        let records = [
            record(100, 0, InvoiceStatus::Sent, d),
            record(250, 0, InvoiceStatus::Sent, d),
            record(900, 900, InvoiceStatus::Paid, d),
        ];
        let breakdown = status_breakdown(&records);

        assert_eq!(breakdown.len(), InvoiceStatus::ALL.len());
        assert_eq!(breakdown[0].status, InvoiceStatus::Draft);
        assert_eq!(breakdown[0].count, 0);
        assert_eq!(breakdown[1].count, 2);
        assert_eq!(breakdown[1].amount.cents(), 350);
        assert_eq!(breakdown[2].amount.cents(), 900);
    }
}
