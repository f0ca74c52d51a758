//! # Reporting Periods
//!
//! Month-to-date windows used by the dashboard.
//!
//! ## Same-Day-Of-Month Windowing
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Query on Oct 17                                                        │
//! │                                                                         │
//! │  current   Oct 01 ─────────────── Oct 17                               │
//! │  previous  Sep 01 ─────────────── Sep 17                               │
//! │                                                                         │
//! │  NOT Sep 01 ── Sep 30: comparing a partial month against a full one    │
//! │  would bias every trend downward early in the month.                   │
//! │                                                                         │
//! │  Query on Mar 31                                                        │
//! │  current   Mar 01 ─── Mar 31                                            │
//! │  previous  Feb 01 ─── Feb 28 (29 in leap years; clamped)                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Windows are inclusive on both ends and operate on calendar dates (the
//! invoice `issue_date`), so "through end of today" is simply `end = today`.

use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// An inclusive range of calendar dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DateWindow {
    #[ts(as = "String")]
    pub start: NaiveDate,
    #[ts(as = "String")]
    pub end: NaiveDate,
}

impl DateWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        DateWindow { start, end }
    }

    /// Whether `date` falls inside the window (both ends included).
    #[inline]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Number of days covered, counting both ends.
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

/// The current month-to-date window and its comparable predecessor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ReportingPeriods {
    pub current: DateWindow,
    pub previous: DateWindow,
}

impl ReportingPeriods {
    /// Builds the month-to-date windows for `today`.
    ///
    /// ## Example
    /// ```rust
    /// use chrono::NaiveDate;
    /// use folio_core::period::ReportingPeriods;
    ///
    /// let today = NaiveDate::from_ymd_opt(2026, 10, 17).unwrap();
    /// let periods = ReportingPeriods::month_to_date(today);
    ///
    /// assert_eq!(periods.current.start, NaiveDate::from_ymd_opt(2026, 10, 1).unwrap());
    /// assert_eq!(periods.previous.end, NaiveDate::from_ymd_opt(2026, 9, 17).unwrap());
    /// ```
    pub fn month_to_date(today: NaiveDate) -> Self {
        let current = DateWindow::new(first_of_month(today), today);

        // chrono clamps to the last valid day (Mar 31 → Feb 28).
        let previous_end = today.checked_sub_months(Months::new(1)).unwrap_or(today);
        let previous = DateWindow::new(first_of_month(previous_end), previous_end);

        ReportingPeriods { current, previous }
    }
}

/// First day of the month containing `date`.
pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// Last day of the month containing `date`.
pub fn last_of_month(date: NaiveDate) -> NaiveDate {
    first_of_month(date)
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .unwrap_or(date)
}

/// First day of the month `months` before the month containing `date`.
pub fn months_back(date: NaiveDate, months: u32) -> NaiveDate {
    first_of_month(date)
        .checked_sub_months(Months::new(months))
        .unwrap_or(NaiveDate::MIN)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_mid_month_windows() {
        let periods = ReportingPeriods::month_to_date(date(2026, 10, 17));

        assert_eq!(periods.current, DateWindow::new(date(2026, 10, 1), date(2026, 10, 17)));
        assert_eq!(periods.previous, DateWindow::new(date(2026, 9, 1), date(2026, 9, 17)));
        assert_eq!(periods.current.days(), periods.previous.days());
    }

    #[test]
    fn test_first_of_month() {
        let periods = ReportingPeriods::month_to_date(date(2026, 10, 1));

        assert_eq!(periods.current, DateWindow::new(date(2026, 10, 1), date(2026, 10, 1)));
        assert_eq!(periods.previous, DateWindow::new(date(2026, 9, 1), date(2026, 9, 1)));
    }

    #[test]
    fn test_end_of_month_clamps_previous() {
        let periods = ReportingPeriods::month_to_date(date(2026, 3, 31));
        assert_eq!(periods.previous, DateWindow::new(date(2026, 2, 1), date(2026, 2, 28)));

        let leap = ReportingPeriods::month_to_date(date(2028, 3, 30));
        assert_eq!(leap.previous.end, date(2028, 2, 29));
    }

    #[test]
    fn test_january_looks_back_into_december() {
        let periods = ReportingPeriods::month_to_date(date(2027, 1, 12));
        assert_eq!(periods.previous, DateWindow::new(date(2026, 12, 1), date(2026, 12, 12)));
    }

    #[test]
    fn test_window_contains_is_inclusive() {
        let window = DateWindow::new(date(2026, 9, 1), date(2026, 9, 17));

        assert!(window.contains(date(2026, 9, 1)));
        assert!(window.contains(date(2026, 9, 17)));
        assert!(!window.contains(date(2026, 9, 18)));
        assert!(!window.contains(date(2026, 8, 31)));
    }

    #[test]
    fn test_last_of_month() {
        assert_eq!(last_of_month(date(2026, 10, 17)), date(2026, 10, 31));
        assert_eq!(last_of_month(date(2026, 2, 1)), date(2026, 2, 28));
        assert_eq!(last_of_month(date(2028, 2, 10)), date(2028, 2, 29));
        assert_eq!(last_of_month(date(2026, 12, 5)), date(2026, 12, 31));
    }

    #[test]
    fn test_months_back() {
        assert_eq!(months_back(date(2026, 10, 17), 0), date(2026, 10, 1));
        assert_eq!(months_back(date(2026, 10, 17), 5), date(2026, 5, 1));
        assert_eq!(months_back(date(2026, 2, 28), 3), date(2025, 11, 1));
    }
}
