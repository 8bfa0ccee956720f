//! ECF Rectifier - amended ECF filings from recovered fuel-evaporation losses
//!
//! This library provides:
//! - Parsing of pipe-delimited ECF filings into per-period block ranges
//! - Rewriting of filings with restated IRPJ/CSLL figures and adjustment records
//! - Benefit calculation with carry-forward of unused losses
//! - SELIC correction of refundable amounts
//! - Batch rectification of several fiscal years

pub mod benefit;
pub mod config;
pub mod error;
pub mod filing;
pub mod money;
pub mod period;
pub mod rectification;
pub mod selic;

// Re-export commonly used types
pub use benefit::{compute_benefit, AdjustmentPeriod, BenefitReport, BenefitResult, FiscalYearInput};
pub use config::RectifierConfig;
pub use error::{RectifierError, Result};
pub use filing::{parse, rewrite, AdjustmentDescriptor, FilingDocument};
pub use period::{AssessmentMethod, PeriodKey};
pub use rectification::{rectify_filing, run_batch, RectificationRequest, RectifiedFiling};
pub use selic::{load_selic_rates, SelicRateSeries};
