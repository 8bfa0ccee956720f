//! CSV-based SELIC series loader
//!
//! Expected columns: `month,rate`, months as `YYYY-MM-DD`.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use log::debug;

use super::{SelicRate, SelicRateSeries};
use crate::error::Result;

/// Default path to the rate table
pub const DEFAULT_SELIC_PATH: &str = "data/selic_rates.csv";

/// Load the series from a CSV file
pub fn load_selic_rates(path: &Path) -> Result<SelicRateSeries> {
    let file = File::open(path)?;
    let series = load_selic_rates_from_reader(file)?;
    debug!("Loaded {} SELIC rates from {}", series.len(), path.display());
    Ok(series)
}

/// Load the series from any reader (e.g., string buffer, network stream)
pub fn load_selic_rates_from_reader<R: Read>(reader: R) -> Result<SelicRateSeries> {
    let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut rates = Vec::new();

    for result in csv_reader.deserialize() {
        let rate: SelicRate = result?;
        rates.push(rate);
    }

    Ok(SelicRateSeries::new(rates))
}
