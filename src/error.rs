//! Dataset error types.

use thiserror::Error;

/// Errors raised while loading or exporting the price dataset.
///
/// Any of these aborts a load: there is no partial dataset.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("missing required column '{0}'")]
    MissingColumn(&'static str),

    #[error("line {line}: invalid timestamp '{value}'")]
    InvalidTimestamp { line: u64, value: String },

    #[error("line {line}: invalid {column} value '{value}'")]
    InvalidNumber {
        line: u64,
        column: &'static str,
        value: String,
    },

    #[error("line {line}: negative {column} value {value}")]
    NegativeValue {
        line: u64,
        column: &'static str,
        value: f64,
    },

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
