//! Shared request/response pieces.

use serde::{Deserialize, Serialize};

use crate::services::selection::YearSelection;

/// Error body returned by every endpoint on failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
    /// Optional error code
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, code: &str) -> Self {
        Self {
            error: error.into(),
            code: Some(code.to_string()),
        }
    }
}

/// `years` query parameter shared by the filtered views.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct YearsQuery {
    /// Comma-separated years; absent selects every year, empty selects none
    pub years: Option<String>,
}

impl YearsQuery {
    pub fn validate(&self) -> Result<YearSelection, String> {
        YearSelection::parse(self.years.as_deref())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub rows: usize,
}
