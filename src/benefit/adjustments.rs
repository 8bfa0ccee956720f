//! Per-period adjustments handed to the filing rewriter

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use super::calculator::{BenefitResult, IRPJ_RATE, IRPJ_SURTAX_RATE};
use crate::money::round2;
use crate::period::{AssessmentMethod, PeriodKey};

/// Restated figures for one period of one fiscal year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdjustmentPeriod {
    pub fiscal_year: i32,
    pub method: AssessmentMethod,
    pub period: PeriodKey,
    pub generated_loss: f64,
    pub irpj_base: f64,
    /// Flat 15% portion of the restated IRPJ
    pub irpj_flat: f64,
    /// Surtax portion of the restated IRPJ
    pub irpj_surtax: f64,
    pub csll_base: f64,
    pub csll_total: f64,
}

/// Derive the adjustments of one fiscal year from its benefit calculation.
///
/// Negative restated bases are written as zero.
pub fn derive_adjustments(fiscal_year: i32, result: &BenefitResult) -> Vec<AdjustmentPeriod> {
    let threshold = result.method.surtax_threshold();

    result
        .rows
        .iter()
        .map(|row| {
            let irpj_base = row.restated_irpj_base.max(0.0);
            let csll_base = row.restated_csll_base.max(0.0);
            let surtax_base = (irpj_base - threshold).max(0.0);

            AdjustmentPeriod {
                fiscal_year,
                method: result.method,
                period: row.period,
                generated_loss: round2(row.generated_loss),
                irpj_base: round2(irpj_base),
                irpj_flat: round2(irpj_base * IRPJ_RATE),
                irpj_surtax: round2(surtax_base * IRPJ_SURTAX_RATE),
                csll_base: round2(csll_base),
                csll_total: round2(row.new_csll_total),
            }
        })
        .collect()
}

/// Same as [`derive_adjustments`] but empty for years outside `eligible_years`
pub fn derive_eligible_adjustments(
    fiscal_year: i32,
    result: &BenefitResult,
    eligible_years: &RangeInclusive<i32>,
) -> Vec<AdjustmentPeriod> {
    if eligible_years.contains(&fiscal_year) {
        derive_adjustments(fiscal_year, result)
    } else {
        Vec::new()
    }
}
