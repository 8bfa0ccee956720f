//! Rectification request payload

use serde::{Deserialize, Serialize};

use crate::benefit::AdjustmentPeriod;
use crate::config::{DEFAULT_CSLL_CODE, DEFAULT_DESCRIPTION, DEFAULT_IRPJ_CODE};
use crate::filing::AdjustmentDescriptor;

/// Location of the original filing of one fiscal year
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilingSource {
    pub fiscal_year: i32,
    pub file_path: String,
}

/// Filings of one company and the adjustments to apply to them
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RectificationRequest {
    pub company_id: String,
    pub files: Vec<FilingSource>,
    pub adjustments: Vec<AdjustmentPeriod>,
    #[serde(default = "default_irpj_code")]
    pub irpj_code: String,
    #[serde(default = "default_csll_code")]
    pub csll_code: String,
    #[serde(default = "default_description")]
    pub description: String,
}

fn default_irpj_code() -> String { DEFAULT_IRPJ_CODE.to_string() }
fn default_csll_code() -> String { DEFAULT_CSLL_CODE.to_string() }
fn default_description() -> String { DEFAULT_DESCRIPTION.to_string() }

impl RectificationRequest {
    pub fn descriptor(&self) -> AdjustmentDescriptor {
        AdjustmentDescriptor {
            irpj_code: self.irpj_code.clone(),
            csll_code: self.csll_code.clone(),
            description: self.description.clone(),
        }
    }

    /// Adjustments of one fiscal year, in request order
    pub fn adjustments_for(&self, fiscal_year: i32) -> Vec<AdjustmentPeriod> {
        self.adjustments
            .iter()
            .filter(|a| a.fiscal_year == fiscal_year)
            .cloned()
            .collect()
    }
}
