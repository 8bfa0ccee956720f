//! Refundable amounts corrected by SELIC, per period, per year and consolidated

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::calculator::{BenefitResult, GENERATED_LOSS_RATE};
use crate::money::round2;
use crate::period::{AssessmentMethod, PeriodKey};
use crate::selic::{correct_period, SelicRateSeries};

/// One period's refundable amount and its correction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorrectedPeriod {
    pub period: PeriodKey,
    pub benefit: f64,
    pub selic: f64,
    pub corrected_total: f64,
}

/// Corrected benefit of one fiscal year
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YearSummary {
    pub fiscal_year: i32,
    pub method: AssessmentMethod,
    pub revenue: f64,
    pub generated_loss: f64,
    pub benefit: f64,
    pub selic: f64,
    pub corrected_total: f64,
    pub unused_loss: f64,
    pub periods: Vec<CorrectedPeriod>,
}

impl YearSummary {
    /// Correct every period of `result` as of `as_of`
    pub fn build(fiscal_year: i32, result: &BenefitResult, series: &SelicRateSeries, as_of: NaiveDate) -> Self {
        let periods: Vec<CorrectedPeriod> = result
            .rows
            .iter()
            .map(|row| {
                let selic = correct_period(row.total_refundable, row.period, fiscal_year, series, as_of);
                CorrectedPeriod {
                    period: row.period,
                    benefit: row.total_refundable,
                    selic,
                    corrected_total: row.total_refundable + selic,
                }
            })
            .collect();

        let revenue = round2(result.rows.iter().map(|r| r.revenue).sum());

        Self {
            fiscal_year,
            method: result.method,
            revenue,
            generated_loss: round2(revenue * GENERATED_LOSS_RATE),
            benefit: round2(periods.iter().map(|p| p.benefit).sum()),
            selic: round2(periods.iter().map(|p| p.selic).sum()),
            corrected_total: round2(periods.iter().map(|p| p.corrected_total).sum()),
            unused_loss: result.unused_loss(),
            periods,
        }
    }
}

/// Corrected benefit across all fiscal years of one company
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConsolidatedSummary {
    pub years: Vec<YearSummary>,
}

impl ConsolidatedSummary {
    pub fn new(mut years: Vec<YearSummary>) -> Self {
        years.sort_by_key(|y| y.fiscal_year);
        Self { years }
    }

    pub fn corrected_total(&self) -> f64 {
        self.years.iter().map(|y| y.corrected_total).sum()
    }

    /// Loss still unused at the end of the latest fiscal year
    pub fn unused_loss(&self) -> f64 {
        self.years.last().map(|y| y.unused_loss).unwrap_or(0.0)
    }
}
