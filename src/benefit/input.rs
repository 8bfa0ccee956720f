//! Benefit inputs per fiscal year and the report built from them

use std::collections::BTreeMap;
use std::ops::RangeInclusive;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::adjustments::{derive_eligible_adjustments, AdjustmentPeriod};
use super::calculator::{compute_benefit, BenefitResult, CalculationRow, OriginalTaxes};
use super::revenue::MonthlyRevenue;
use super::summary::{ConsolidatedSummary, YearSummary};
use crate::period::{AssessmentMethod, PeriodKey};
use crate::selic::SelicRateSeries;

/// Declared figures of one fiscal year.
///
/// Revenue is given per period or per month (`yyyymm`); monthly revenue takes
/// precedence when both are present.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FiscalYearInput {
    pub fiscal_year: i32,
    pub method: AssessmentMethod,
    #[serde(default)]
    pub revenue: BTreeMap<PeriodKey, f64>,
    #[serde(default)]
    pub monthly_revenue: BTreeMap<String, f64>,
    #[serde(default)]
    pub original: BTreeMap<PeriodKey, OriginalTaxes>,
}

impl FiscalYearInput {
    pub fn revenue_by_period(&self) -> BTreeMap<PeriodKey, f64> {
        if self.monthly_revenue.is_empty() {
            return self.revenue.clone();
        }
        let mut monthly = MonthlyRevenue::new();
        for (year_month, total) in &self.monthly_revenue {
            monthly.add_entry(year_month, *total);
        }
        monthly.by_period(self.fiscal_year, self.method)
    }

    pub fn compute(&self) -> BenefitResult {
        compute_benefit(self.method, &self.revenue_by_period(), &self.original)
    }
}

/// Calculation and adjustments of one fiscal year
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YearReport {
    pub fiscal_year: i32,
    pub method: AssessmentMethod,
    pub rows: Vec<CalculationRow>,
    pub adjustments: Vec<AdjustmentPeriod>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenefitReport {
    pub years: Vec<YearReport>,
    pub summary: ConsolidatedSummary,
}

impl BenefitReport {
    /// Compute every fiscal year, correcting refundables as of `as_of`.
    /// Adjustments are only derived for years inside `eligible_years`.
    pub fn build(
        inputs: &[FiscalYearInput],
        series: &SelicRateSeries,
        as_of: NaiveDate,
        eligible_years: &RangeInclusive<i32>,
    ) -> Self {
        let mut years = Vec::with_capacity(inputs.len());
        let mut summaries = Vec::with_capacity(inputs.len());

        for input in inputs {
            let result = input.compute();
            summaries.push(YearSummary::build(input.fiscal_year, &result, series, as_of));
            years.push(YearReport {
                fiscal_year: input.fiscal_year,
                method: input.method,
                adjustments: derive_eligible_adjustments(input.fiscal_year, &result, eligible_years),
                rows: result.rows,
            });
        }
        years.sort_by_key(|y| y.fiscal_year);

        Self {
            years,
            summary: ConsolidatedSummary::new(summaries),
        }
    }

    /// Adjustments of all years, ready for a rectification request
    pub fn adjustments(&self) -> Vec<AdjustmentPeriod> {
        self.years.iter().flat_map(|y| y.adjustments.iter().cloned()).collect()
    }
}
