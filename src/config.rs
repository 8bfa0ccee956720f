//! Rectification settings, loadable from a JSON file

use std::fs::File;
use std::io::BufReader;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{RectifierError, Result};
use crate::filing::AdjustmentDescriptor;
use crate::selic::DEFAULT_SELIC_PATH;

pub const DEFAULT_IRPJ_CODE: &str = "900";
pub const DEFAULT_CSLL_CODE: &str = "900";
pub const DEFAULT_DESCRIPTION: &str = "Perda por Evaporação";
pub const DEFAULT_FIRST_YEAR: i32 = 2020;
pub const DEFAULT_LAST_YEAR: i32 = 2024;

/// Settings shared by the CLI and the lambda
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RectifierConfig {
    /// Adjustment code of the inserted `M410` records
    pub irpj_code: String,
    /// Adjustment code of the inserted `M510` records
    pub csll_code: String,
    pub description: String,
    /// First fiscal year that receives adjustments
    pub first_year: i32,
    /// Last fiscal year that receives adjustments
    pub last_year: i32,
    pub selic_path: PathBuf,
}

impl Default for RectifierConfig {
    fn default() -> Self {
        Self {
            irpj_code: DEFAULT_IRPJ_CODE.to_string(),
            csll_code: DEFAULT_CSLL_CODE.to_string(),
            description: DEFAULT_DESCRIPTION.to_string(),
            first_year: DEFAULT_FIRST_YEAR,
            last_year: DEFAULT_LAST_YEAR,
            selic_path: PathBuf::from(DEFAULT_SELIC_PATH),
        }
    }
}

impl RectifierConfig {
    /// Load from a JSON file; missing fields take their defaults
    pub fn from_json_path(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        let config: Self = serde_json::from_reader(BufReader::new(file))?;
        config.validate()?;
        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.first_year > self.last_year {
            return Err(RectifierError::InvalidConfig(format!(
                "first_year {} is after last_year {}",
                self.first_year, self.last_year
            )));
        }
        if self.irpj_code.contains('|') || self.csll_code.contains('|') || self.description.contains('|') {
            return Err(RectifierError::InvalidConfig(
                "adjustment codes and description must not contain '|'".to_string(),
            ));
        }
        Ok(())
    }

    pub fn eligible_years(&self) -> RangeInclusive<i32> {
        self.first_year..=self.last_year
    }

    pub fn descriptor(&self) -> AdjustmentDescriptor {
        AdjustmentDescriptor {
            irpj_code: self.irpj_code.clone(),
            csll_code: self.csll_code.clone(),
            description: self.description.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RectifierConfig::default();
        assert_eq!(config.eligible_years(), 2020..=2024);
        assert_eq!(config.descriptor().description, "Perda por Evaporação");
        assert_eq!(config.selic_path, PathBuf::from("data/selic_rates.csv"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: RectifierConfig = serde_json::from_str(r#"{"csll_code": "910", "last_year": 2023}"#).unwrap();
        assert_eq!(config.irpj_code, "900");
        assert_eq!(config.csll_code, "910");
        assert_eq!(config.eligible_years(), 2020..=2023);
    }

    #[test]
    fn test_validation() {
        let inverted = RectifierConfig { first_year: 2025, ..Default::default() };
        assert!(matches!(inverted.validate(), Err(RectifierError::InvalidConfig(_))));

        let piped = RectifierConfig { description: "a|b".to_string(), ..Default::default() };
        assert!(piped.validate().is_err());
    }

    #[test]
    fn test_from_missing_file() {
        let result = RectifierConfig::from_json_path(Path::new("does/not/exist.json"));
        assert!(matches!(result, Err(RectifierError::IoError(_))));
    }
}
