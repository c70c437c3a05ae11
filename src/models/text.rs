//! Keyword analysis models
//!
//! Models for POST /api/text/keywords.

use serde::{Deserialize, Serialize};

use crate::services::keywords::DEFAULT_MIN_LENGTH;

pub const TOP_TERMS_MIN: usize = 5;
pub const TOP_TERMS_MAX: usize = 30;
pub const TOP_TERMS_DEFAULT: usize = 10;
/// Leading terms echoed as the dominant vocabulary
pub const DOMINANT_TERMS: usize = 7;

/// Request body for the keyword endpoint
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeywordRequest {
    pub text: String,
    /// Number of terms to return, clamped to 5..=30 (defaults to 10)
    pub top_n: Option<usize>,
    /// Minimum token length in characters (defaults to 3)
    pub min_length: Option<usize>,
}

impl KeywordRequest {
    pub fn validate(&self) -> Result<(usize, usize), String> {
        if self.text.trim().is_empty() {
            return Err("Text must not be empty".to_string());
        }
        let top_n = self
            .top_n
            .unwrap_or(TOP_TERMS_DEFAULT)
            .clamp(TOP_TERMS_MIN, TOP_TERMS_MAX);
        let min_length = self.min_length.unwrap_or(DEFAULT_MIN_LENGTH).max(1);
        Ok((top_n, min_length))
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TermCount {
    pub term: String,
    pub count: usize,
    /// Count relative to the most frequent term, for word-cloud sizing
    pub weight: f64,
}

/// Response for POST /api/text/keywords
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KeywordResponse {
    /// Tokens left after cleaning
    pub word_count: usize,
    pub cleaned_text: String,
    pub top_terms: Vec<TermCount>,
    pub dominant_terms: Vec<String>,
    pub stopwords_source: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(text: &str, top_n: Option<usize>) -> KeywordRequest {
        KeywordRequest {
            text: text.to_string(),
            top_n,
            min_length: None,
        }
    }

    #[test]
    fn test_validate_defaults_and_clamp() {
        assert_eq!(request("bitcoin", None).validate().unwrap(), (10, 3));
        assert_eq!(request("bitcoin", Some(2)).validate().unwrap().0, 5);
        assert_eq!(request("bitcoin", Some(100)).validate().unwrap().0, 30);
    }

    #[test]
    fn test_validate_empty_text() {
        assert!(request("  \n ", None).validate().is_err());
    }

    #[test]
    fn test_request_camel_case() {
        let req: KeywordRequest =
            serde_json::from_str(r#"{"text":"abc","topN":12,"minLength":4}"#).unwrap();
        assert_eq!(req.validate().unwrap(), (12, 4));
    }
}
