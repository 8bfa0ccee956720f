use thiserror::Error;

#[derive(Error, Debug)]
pub enum RectifierError {
    #[error("Invalid period key: {0}")]
    InvalidPeriodKey(String),

    #[error("Invalid assessment method: {0}")]
    InvalidMethod(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Filing {path} is unavailable: {reason}")]
    FilingUnavailable { path: String, reason: String },

    #[error("No eligible filing was processed")]
    NothingToProcess,

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, RectifierError>;
