//! SELIC correction of refundable amounts

use chrono::{Datelike, Months, NaiveDate};

use super::SelicRateSeries;
use crate::period::PeriodKey;

/// Percentage point added for the month in which the refund is paid
pub const PAYMENT_MONTH_RATE: f64 = 1.0;

/// First month of correction for a period of `fiscal_year`.
///
/// The tax falls due the month after the period closes; correction starts the
/// month after that.
pub fn correction_start(period: PeriodKey, fiscal_year: i32) -> Option<NaiveDate> {
    let (year, month) = match period {
        PeriodKey::Q1 => (fiscal_year, 6),
        PeriodKey::Q2 => (fiscal_year, 9),
        PeriodKey::Q3 => (fiscal_year, 12),
        PeriodKey::Q4 | PeriodKey::Annual => (fiscal_year + 1, 3),
    };
    NaiveDate::from_ymd_opt(year, month, 1)
}

/// Last month of correction: the first day of the month before `as_of`
pub fn correction_end(as_of: NaiveDate) -> Option<NaiveDate> {
    as_of
        .with_day(1)
        .and_then(|first| first.checked_sub_months(Months::new(1)))
}

/// SELIC correction for `amount`, as of the given date.
///
/// Unknown period keys, non-positive amounts, an empty series and a window that
/// has not opened yet all yield zero.
pub fn correct(
    amount: f64,
    period_key: &str,
    fiscal_year: i32,
    series: &SelicRateSeries,
    as_of: NaiveDate,
) -> f64 {
    match PeriodKey::from_token(period_key) {
        Some(period) => correct_period(amount, period, fiscal_year, series, as_of),
        None => 0.0,
    }
}

/// Same as [`correct`] for an already-parsed period key
pub fn correct_period(
    amount: f64,
    period: PeriodKey,
    fiscal_year: i32,
    series: &SelicRateSeries,
    as_of: NaiveDate,
) -> f64 {
    if amount <= 0.0 || series.is_empty() {
        return 0.0;
    }

    let (start, end) = match (correction_start(period, fiscal_year), correction_end(as_of)) {
        (Some(start), Some(end)) => (start, end),
        _ => return 0.0,
    };
    if start > end {
        return 0.0;
    }

    let total_rate = series.accumulated(start, end) + PAYMENT_MONTH_RATE;
    amount * (total_rate / 100.0)
}
