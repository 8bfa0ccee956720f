//! Benefit computation: restated bases, refundable taxes and their correction

mod calculator;
mod adjustments;
mod input;
pub mod revenue;
pub mod summary;

pub use calculator::{
    compute_benefit, BenefitResult, CalculationRow, OriginalTaxes,
    CSLL_RATE, GENERATED_LOSS_RATE, IRPJ_RATE, IRPJ_SURTAX_RATE,
};
pub use adjustments::{derive_adjustments, derive_eligible_adjustments, AdjustmentPeriod};
pub use input::{BenefitReport, FiscalYearInput, YearReport};
pub use revenue::{compare_yearly, MonthlyRevenue, RevenueComparison};
pub use summary::{ConsolidatedSummary, CorrectedPeriod, YearSummary};
