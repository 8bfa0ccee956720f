//! Monthly SELIC rate series

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Published SELIC rate for one month, in percent
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SelicRate {
    /// Month of the rate, normally the first day (`YYYY-MM-DD`)
    pub month: NaiveDate,
    /// Monthly rate in percentage points (e.g. 0.83 for 0.83%)
    pub rate: f64,
}

/// Immutable, month-ordered rate series
///
/// Loaded once and shared across every correction computed in a session.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SelicRateSeries {
    rates: Vec<SelicRate>,
}

impl SelicRateSeries {
    /// Build a series, sorting the rates by month
    pub fn new(mut rates: Vec<SelicRate>) -> Self {
        rates.sort_by_key(|r| r.month);
        Self { rates }
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn rates(&self) -> &[SelicRate] {
        &self.rates
    }

    /// Sum of rates whose month falls in `[start, end]`, inclusive on both ends
    pub fn accumulated(&self, start: NaiveDate, end: NaiveDate) -> f64 {
        self.rates
            .iter()
            .filter(|r| r.month >= start && r.month <= end)
            .map(|r| r.rate)
            .sum()
    }
}

impl FromIterator<SelicRate> for SelicRateSeries {
    fn from_iter<I: IntoIterator<Item = SelicRate>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
