//! SELIC reference-rate series and monetary correction

mod series;
mod correction;
pub mod loader;

pub use series::{SelicRate, SelicRateSeries};
pub use correction::{correct, correct_period, correction_end, correction_start, PAYMENT_MONTH_RATE};
pub use loader::{load_selic_rates, load_selic_rates_from_reader, DEFAULT_SELIC_PATH};
