//! Restated tax base and refundable amounts per fiscal period
//!
//! For every period the calculator deducts a notional evaporation loss (0.6% of
//! resale revenue) plus any unused loss carried from the previous period,
//! recomputes IRPJ and CSLL on the restated base, and reports what was overpaid.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::money::round2;
use crate::period::{AssessmentMethod, PeriodKey};

/// Notional loss rate applied to resale revenue
pub const GENERATED_LOSS_RATE: f64 = 0.006;

/// Flat IRPJ rate
pub const IRPJ_RATE: f64 = 0.15;

/// IRPJ surtax rate on the base above the method's threshold
pub const IRPJ_SURTAX_RATE: f64 = 0.10;

/// CSLL rate
pub const CSLL_RATE: f64 = 0.09;

/// Figures originally declared for one period.
///
/// There is no separate CSLL base: the restated CSLL base always follows the
/// restated IRPJ base.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct OriginalTaxes {
    #[serde(default)]
    pub irpj_base: f64,
    #[serde(default)]
    pub irpj_due: f64,
    #[serde(default)]
    pub csll_due: f64,
}

/// Calculation output for one period
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculationRow {
    pub period: PeriodKey,
    pub revenue: f64,
    pub generated_loss: f64,
    pub carry_forward_in: f64,
    pub total_deduction: f64,
    pub restated_irpj_base: f64,
    pub restated_csll_base: f64,
    pub new_irpj_flat: f64,
    pub new_irpj_surtax: f64,
    pub new_irpj_total: f64,
    pub new_csll_total: f64,
    pub irpj_refundable: f64,
    pub csll_refundable: f64,
    pub total_refundable: f64,
    pub carry_forward_out: f64,
}

/// Complete calculation for one fiscal year
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenefitResult {
    pub method: AssessmentMethod,
    pub rows: Vec<CalculationRow>,
}

impl BenefitResult {
    pub fn row(&self, period: PeriodKey) -> Option<&CalculationRow> {
        self.rows.iter().find(|r| r.period == period)
    }

    /// Sum of refundable amounts across periods
    pub fn total_refundable(&self) -> f64 {
        round2(self.rows.iter().map(|r| r.total_refundable).sum())
    }

    /// Sum of generated losses across periods
    pub fn total_generated_loss(&self) -> f64 {
        round2(self.rows.iter().map(|r| r.generated_loss).sum())
    }

    /// Loss left unused after the last period
    pub fn unused_loss(&self) -> f64 {
        self.rows.last().map(|r| r.carry_forward_out).unwrap_or(0.0)
    }
}

/// Carry-forward balance of unused loss within one fiscal year
#[derive(Debug, Clone, Copy, Default)]
struct CarryForward {
    balance: f64,
}

impl CarryForward {
    /// Replace the balance after a period has been restated.
    ///
    /// A balance remains only when the restated base falls below the original
    /// base's own negative part.
    fn update(&mut self, restated_base: f64, original_base: f64) {
        let next = round2(restated_base - original_base.min(0.0));
        self.balance = if next < 0.0 { next.abs() } else { 0.0 };
    }
}

/// Compute the benefit for one fiscal year.
///
/// Periods missing from either map are treated as zero.
pub fn compute_benefit(
    method: AssessmentMethod,
    revenue_by_period: &BTreeMap<PeriodKey, f64>,
    original_by_period: &BTreeMap<PeriodKey, OriginalTaxes>,
) -> BenefitResult {
    let threshold = method.surtax_threshold();
    let mut carry = CarryForward::default();
    let mut rows = Vec::with_capacity(method.periods().len());

    for &period in method.periods() {
        let original = original_by_period.get(&period).copied().unwrap_or_default();
        let revenue = revenue_by_period.get(&period).copied().unwrap_or(0.0);

        let generated_loss = round2(revenue * GENERATED_LOSS_RATE);
        let carry_forward_in = carry.balance;
        let total_deduction = round2(carry_forward_in + generated_loss);
        let restated_base = round2(original.irpj_base - total_deduction);

        carry.update(restated_base, original.irpj_base);

        let taxable_base = restated_base.max(0.0);
        let surtax_base = (taxable_base - threshold).max(0.0);

        let new_irpj_flat = round2(taxable_base * IRPJ_RATE);
        let new_irpj_surtax = round2(surtax_base * IRPJ_SURTAX_RATE);
        let new_irpj_total = round2(taxable_base * IRPJ_RATE + surtax_base * IRPJ_SURTAX_RATE);
        let new_csll_total = round2(taxable_base * CSLL_RATE);

        let irpj_refundable = round2(original.irpj_due - new_irpj_total).max(0.0);
        let csll_refundable = round2(original.csll_due - new_csll_total).max(0.0);

        rows.push(CalculationRow {
            period,
            revenue,
            generated_loss,
            carry_forward_in,
            total_deduction,
            restated_irpj_base: restated_base,
            restated_csll_base: restated_base,
            new_irpj_flat,
            new_irpj_surtax,
            new_irpj_total,
            new_csll_total,
            irpj_refundable,
            csll_refundable,
            total_refundable: round2(irpj_refundable + csll_refundable),
            carry_forward_out: carry.balance,
        });
    }

    BenefitResult { method, rows }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn single(period: PeriodKey, revenue: f64, original: OriginalTaxes) -> (BTreeMap<PeriodKey, f64>, BTreeMap<PeriodKey, OriginalTaxes>) {
        (BTreeMap::from([(period, revenue)]), BTreeMap::from([(period, original)]))
    }

    #[test]
    fn test_generated_loss_rounding() {
        let (revenue, original) = single(PeriodKey::Annual, 100_000.0, OriginalTaxes::default());
        let result = compute_benefit(AssessmentMethod::Annual, &revenue, &original);
        assert_eq!(result.rows.len(), 1);
        assert_eq!(result.rows[0].generated_loss, 600.0);
    }

    #[test]
    fn test_quarterly_order_and_defaults() {
        let result = compute_benefit(AssessmentMethod::Quarterly, &BTreeMap::new(), &BTreeMap::new());
        let periods: Vec<_> = result.rows.iter().map(|r| r.period).collect();
        assert_eq!(periods, PeriodKey::QUARTERS.to_vec());
        assert!(result.rows.iter().all(|r| r.total_refundable == 0.0));
    }

    #[test]
    fn test_annual_surtax_boundary() {
        // No revenue, so the restated base equals the original one
        let at_threshold = OriginalTaxes { irpj_base: 240_000.0, ..Default::default() };
        let (revenue, original) = single(PeriodKey::Annual, 0.0, at_threshold);
        let row = &compute_benefit(AssessmentMethod::Annual, &revenue, &original).rows[0];
        assert_eq!(row.new_irpj_surtax, 0.0);
        assert_abs_diff_eq!(row.new_irpj_flat, 36_000.0);

        let above = OriginalTaxes { irpj_base: 250_000.0, ..Default::default() };
        let (revenue, original) = single(PeriodKey::Annual, 0.0, above);
        let row = &compute_benefit(AssessmentMethod::Annual, &revenue, &original).rows[0];
        assert_eq!(row.new_irpj_surtax, 1000.0);
        assert_abs_diff_eq!(row.new_irpj_total, 38_500.0);
    }

    #[test]
    fn test_quarterly_threshold() {
        let original = OriginalTaxes { irpj_base: 70_000.0, ..Default::default() };
        let (revenue, original) = single(PeriodKey::Q1, 0.0, original);
        let row = &compute_benefit(AssessmentMethod::Quarterly, &revenue, &original).rows[0];
        assert_eq!(row.new_irpj_surtax, 1000.0);
    }

    #[test]
    fn test_refundable_amounts() {
        let original = OriginalTaxes {
            irpj_base: 100_000.0,
            irpj_due: 15_000.0,
            csll_due: 9_000.0,
        };
        let (revenue, original) = single(PeriodKey::Annual, 1_000_000.0, original);
        let row = &compute_benefit(AssessmentMethod::Annual, &revenue, &original).rows[0];

        assert_eq!(row.generated_loss, 6000.0);
        assert_eq!(row.restated_irpj_base, 94_000.0);
        assert_eq!(row.restated_csll_base, 94_000.0);
        assert_eq!(row.new_irpj_total, 14_100.0);
        assert_eq!(row.new_csll_total, 8460.0);
        assert_eq!(row.irpj_refundable, 900.0);
        assert_eq!(row.csll_refundable, 540.0);
        assert_eq!(row.total_refundable, 1440.0);
        assert_eq!(row.carry_forward_out, 0.0);
    }

    #[test]
    fn test_refundable_never_negative() {
        // Originally declared tax lower than the recomputed tax
        let original = OriginalTaxes { irpj_base: 100_000.0, irpj_due: 100.0, csll_due: 50.0, ..Default::default() };
        let (revenue, original) = single(PeriodKey::Annual, 0.0, original);
        let row = &compute_benefit(AssessmentMethod::Annual, &revenue, &original).rows[0];
        assert_eq!(row.irpj_refundable, 0.0);
        assert_eq!(row.csll_refundable, 0.0);
    }

    #[test]
    fn test_carry_forward_chains_across_quarters() {
        // 1T loss exceeds its base; the excess must reach 2T
        let revenue = BTreeMap::from([
            (PeriodKey::Q1, 1_000_000.0),
            (PeriodKey::Q2, 0.0),
            (PeriodKey::Q3, 500_000.0),
            (PeriodKey::Q4, 0.0),
        ]);
        let original = BTreeMap::from([
            (PeriodKey::Q1, OriginalTaxes { irpj_base: 2_000.0, irpj_due: 300.0, csll_due: 180.0, ..Default::default() }),
            (PeriodKey::Q2, OriginalTaxes { irpj_base: 3_000.0, irpj_due: 450.0, csll_due: 270.0, ..Default::default() }),
            (PeriodKey::Q3, OriginalTaxes { irpj_base: 10_000.0, irpj_due: 1_500.0, csll_due: 900.0, ..Default::default() }),
            (PeriodKey::Q4, OriginalTaxes { irpj_base: 1_000.0, irpj_due: 150.0, csll_due: 90.0, ..Default::default() }),
        ]);
        let result = compute_benefit(AssessmentMethod::Quarterly, &revenue, &original);

        for pair in result.rows.windows(2) {
            assert_eq!(pair[1].carry_forward_in, pair[0].carry_forward_out);
        }
        assert_eq!(result.rows[0].carry_forward_in, 0.0);

        // 1T: loss 6000 against base 2000 leaves 4000
        assert_eq!(result.rows[0].restated_irpj_base, -4_000.0);
        assert_eq!(result.rows[0].carry_forward_out, 4_000.0);
        assert_eq!(result.rows[0].total_refundable, 480.0);

        // 2T: 4000 carried against 3000 leaves 1000
        assert_eq!(result.rows[1].total_deduction, 4_000.0);
        assert_eq!(result.rows[1].carry_forward_out, 1_000.0);

        // 3T: 1000 carried + 3000 generated against 10000 leaves nothing
        assert_eq!(result.rows[2].restated_irpj_base, 6_000.0);
        assert_eq!(result.rows[2].carry_forward_out, 0.0);
        assert_eq!(result.rows[3].carry_forward_in, 0.0);
    }

    #[test]
    fn test_carry_forward_rule_with_negative_original_base() {
        // The original base's own negative part is not carried again:
        // restated -700 minus min(0, -500) gives -200, so 200 carries.
        let original = OriginalTaxes { irpj_base: -500.0, ..Default::default() };
        let revenue = BTreeMap::from([(PeriodKey::Q1, 200_000.0 / 6.0)]);
        let original = BTreeMap::from([(PeriodKey::Q1, original)]);
        let result = compute_benefit(AssessmentMethod::Quarterly, &revenue, &original);
        let row = &result.rows[0];

        assert_eq!(row.generated_loss, 200.0);
        assert_eq!(row.restated_irpj_base, -700.0);
        assert_eq!(row.carry_forward_out, 200.0);
        assert_eq!(row.new_irpj_total, 0.0);
        assert_eq!(result.unused_loss(), 200.0);

        // Sub-cent original bases: the carried balance is rounded to cents,
        // so 199.996 carries as 200.00 rather than unrounded.
        let original = BTreeMap::from([(PeriodKey::Q1, OriginalTaxes { irpj_base: -500.004, ..Default::default() })]);
        let result = compute_benefit(AssessmentMethod::Quarterly, &revenue, &original);
        assert_eq!(result.rows[0].restated_irpj_base, -700.0);
        assert_eq!(result.rows[0].carry_forward_out, 200.0);
    }

    #[test]
    fn test_totals() {
        let revenue = BTreeMap::from([(PeriodKey::Q1, 100_000.0), (PeriodKey::Q2, 100_000.0)]);
        let original = BTreeMap::from([
            (PeriodKey::Q1, OriginalTaxes { irpj_base: 10_000.0, irpj_due: 1_500.0, csll_due: 900.0, ..Default::default() }),
            (PeriodKey::Q2, OriginalTaxes { irpj_base: 10_000.0, irpj_due: 1_500.0, csll_due: 900.0, ..Default::default() }),
        ]);
        let result = compute_benefit(AssessmentMethod::Quarterly, &revenue, &original);

        assert_eq!(result.total_generated_loss(), 1_200.0);
        // Each quarter: 600 * (15% + 9%) = 144
        assert_abs_diff_eq!(result.total_refundable(), 288.0);
        assert!(result.row(PeriodKey::Annual).is_none());
    }
}
