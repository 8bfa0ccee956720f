//! Monthly resale revenue from EFD-Contribuições and its aggregation by period

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::money::round2;
use crate::period::{AssessmentMethod, PeriodKey};

/// Resale revenue per calendar month
#[derive(Debug, Clone, Default)]
pub struct MonthlyRevenue {
    by_month: BTreeMap<(i32, u32), f64>,
}

impl MonthlyRevenue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the revenue of one processed EFD keyed `yyyymm`.
    ///
    /// Malformed keys are ignored; repeated months accumulate.
    pub fn add_entry(&mut self, year_month: &str, total: f64) {
        if let Some(key) = parse_year_month(year_month) {
            *self.by_month.entry(key).or_insert(0.0) += total;
        }
    }

    pub fn add(&mut self, year: i32, month: u32, total: f64) {
        *self.by_month.entry((year, month)).or_insert(0.0) += total;
    }

    pub fn get(&self, year: i32, month: u32) -> f64 {
        self.by_month.get(&(year, month)).copied().unwrap_or(0.0)
    }

    /// Revenue of `year` grouped into the periods assessed under `method`.
    ///
    /// Quarterly totals are rounded month by month; all four quarters are
    /// always present.
    pub fn by_period(&self, year: i32, method: AssessmentMethod) -> BTreeMap<PeriodKey, f64> {
        let mut periods = BTreeMap::new();
        match method {
            AssessmentMethod::Annual => {
                let sum: f64 = (1..=12).map(|m| self.get(year, m)).sum();
                periods.insert(PeriodKey::Annual, round2(sum));
            }
            AssessmentMethod::Quarterly => {
                for quarter in PeriodKey::QUARTERS {
                    periods.insert(quarter, 0.0);
                }
                for month in 1..=12 {
                    let total = periods.entry(PeriodKey::quarter_of_month(month)).or_insert(0.0);
                    *total = round2(*total + self.get(year, month));
                }
            }
        }
        periods
    }

    /// Revenue of the whole calendar year
    pub fn annual_total(&self, year: i32) -> f64 {
        (1..=12).map(|m| self.get(year, m)).sum()
    }

    /// Calendar years with at least one month of revenue
    pub fn years(&self) -> BTreeSet<i32> {
        self.by_month.keys().map(|(y, _)| *y).collect()
    }
}

fn parse_year_month(year_month: &str) -> Option<(i32, u32)> {
    if year_month.len() < 6 || !year_month.is_char_boundary(4) || !year_month.is_char_boundary(6) {
        return None;
    }
    let year: i32 = year_month[..4].parse().ok()?;
    let month: u32 = year_month[4..6].parse().ok()?;
    if !(1..=12).contains(&month) {
        return None;
    }
    Some((year, month))
}

/// Yearly resale revenue declared in the ECF versus the EFD total
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevenueComparison {
    pub year: i32,
    pub ecf_revenue: f64,
    pub efd_revenue: f64,
    /// EFD minus ECF
    pub delta: f64,
    /// Delta relative to the ECF revenue, in percent; `None` when ECF is zero
    pub delta_pct: Option<f64>,
}

/// Compare both revenue sources over every year present in either, ascending
pub fn compare_yearly(ecf_by_year: &BTreeMap<i32, f64>, efd: &MonthlyRevenue) -> Vec<RevenueComparison> {
    let years: BTreeSet<i32> = ecf_by_year.keys().copied().chain(efd.years()).collect();

    years
        .into_iter()
        .map(|year| {
            let ecf_revenue = ecf_by_year.get(&year).copied().unwrap_or(0.0);
            let efd_revenue = efd.annual_total(year);
            let delta = efd_revenue - ecf_revenue;
            let delta_pct = if ecf_revenue != 0.0 {
                Some(delta / ecf_revenue * 100.0)
            } else {
                None
            };
            RevenueComparison { year, ecf_revenue, efd_revenue, delta, delta_pct }
        })
        .collect()
}
