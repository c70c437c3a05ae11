//! Keyword analysis handler

use axum::{extract::State, Json};
use tracing::info;

use crate::handlers::common::{bad_request, ApiError};
use crate::models::text::{KeywordRequest, KeywordResponse, TermCount, DOMINANT_TERMS};
use crate::services::keywords::{clean_and_tokenize, top_n};
use crate::AppState;

/// POST /api/text/keywords
///
/// Cleans a French article, drops stopwords and short tokens, and returns
/// the most frequent terms with word-cloud weights.
///
/// # Response
/// - 200: term frequencies
/// - 400: empty text
pub async fn analyze_keywords(
    State(state): State<AppState>,
    Json(request): Json<KeywordRequest>,
) -> Result<Json<KeywordResponse>, ApiError> {
    let (limit, min_length) = request
        .validate()
        .map_err(|message| bad_request(message, "EMPTY_TEXT"))?;

    let tokens = clean_and_tokenize(&request.text, state.stopwords.words(), min_length);
    let top = top_n(&tokens, limit);

    let max_count = top.first().map(|(_, c)| *c).unwrap_or(1) as f64;
    let top_terms: Vec<TermCount> = top
        .iter()
        .map(|(term, count)| TermCount {
            term: term.clone(),
            count: *count,
            weight: *count as f64 / max_count,
        })
        .collect();
    let dominant_terms = top
        .iter()
        .take(DOMINANT_TERMS)
        .map(|(term, _)| term.clone())
        .collect();

    info!(
        tokens = tokens.len(),
        terms = top_terms.len(),
        "Keyword analysis completed"
    );

    Ok(Json(KeywordResponse {
        word_count: tokens.len(),
        cleaned_text: tokens.join(" "),
        top_terms,
        dominant_terms,
        stopwords_source: state.stopwords.source().to_string(),
    }))
}
