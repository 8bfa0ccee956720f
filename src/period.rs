//! Fiscal period keys and assessment methods shared by the filing and benefit modules

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::RectifierError;

/// Fiscal sub-period identifier
///
/// Ordering follows the chronological order of quarters, with `Annual` last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum PeriodKey {
    Q1,
    Q2,
    Q3,
    Q4,
    Annual,
}

impl PeriodKey {
    /// Quarterly keys in the order carry-forward must be applied
    pub const QUARTERS: [PeriodKey; 4] = [PeriodKey::Q1, PeriodKey::Q2, PeriodKey::Q3, PeriodKey::Q4];

    /// Token used inside filings and payloads
    pub fn as_str(&self) -> &'static str {
        match self {
            PeriodKey::Q1 => "1T",
            PeriodKey::Q2 => "2T",
            PeriodKey::Q3 => "3T",
            PeriodKey::Q4 => "4T",
            PeriodKey::Annual => "ANUAL",
        }
    }

    /// Parse a filing token, case-insensitively; `None` when it is not a period key
    pub fn from_token(token: &str) -> Option<Self> {
        match token.to_ascii_uppercase().as_str() {
            "ANUAL" => Some(PeriodKey::Annual),
            "1T" => Some(PeriodKey::Q1),
            "2T" => Some(PeriodKey::Q2),
            "3T" => Some(PeriodKey::Q3),
            "4T" => Some(PeriodKey::Q4),
            _ => None,
        }
    }

    /// Quarter containing a calendar month (1-12)
    pub fn quarter_of_month(month: u32) -> Self {
        match month {
            0..=3 => PeriodKey::Q1,
            4..=6 => PeriodKey::Q2,
            7..=9 => PeriodKey::Q3,
            _ => PeriodKey::Q4,
        }
    }
}

impl fmt::Display for PeriodKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PeriodKey {
    type Err = RectifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_token(s.trim()).ok_or_else(|| RectifierError::InvalidPeriodKey(s.to_string()))
    }
}

impl TryFrom<String> for PeriodKey {
    type Error = RectifierError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<PeriodKey> for String {
    fn from(key: PeriodKey) -> Self {
        key.as_str().to_string()
    }
}

/// How a fiscal year's income tax is assessed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssessmentMethod {
    /// One annual assessment
    #[serde(rename = "ANUAL")]
    Annual,
    /// Four quarterly assessments
    #[serde(rename = "TRIMESTRAL")]
    Quarterly,
}

impl AssessmentMethod {
    /// Periods assessed under this method, in processing order
    pub fn periods(&self) -> &'static [PeriodKey] {
        match self {
            AssessmentMethod::Annual => &[PeriodKey::Annual],
            AssessmentMethod::Quarterly => &PeriodKey::QUARTERS,
        }
    }

    /// Base above which the 10% IRPJ surtax applies
    pub fn surtax_threshold(&self) -> f64 {
        match self {
            AssessmentMethod::Annual => 240_000.0,
            AssessmentMethod::Quarterly => 60_000.0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AssessmentMethod::Annual => "ANUAL",
            AssessmentMethod::Quarterly => "TRIMESTRAL",
        }
    }
}

impl FromStr for AssessmentMethod {
    type Err = RectifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ANUAL" => Ok(AssessmentMethod::Annual),
            "TRIMESTRAL" => Ok(AssessmentMethod::Quarterly),
            _ => Err(RectifierError::InvalidMethod(s.to_string())),
        }
    }
}
