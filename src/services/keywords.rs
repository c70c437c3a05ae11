//! Free-text keyword extraction for the article analyzer.

use lazy_static::lazy_static;
use regex::Regex;
use std::collections::{HashMap, HashSet};

/// Tokens shorter than this (in characters) are discarded by default.
pub const DEFAULT_MIN_LENGTH: usize = 3;

lazy_static! {
    // Everything outside the French alphabet and whitespace
    static ref NON_WORD_REGEX: Regex = Regex::new(r"[^a-zàâäéèêëîïôöùûüçñ\s]").unwrap();
}

/// Lowercase, strip non-letters, split on whitespace, drop stopwords and short tokens.
pub fn clean_and_tokenize(
    text: &str,
    stopwords: &HashSet<String>,
    min_length: usize,
) -> Vec<String> {
    let lowered = text.to_lowercase();
    let cleaned = NON_WORD_REGEX.replace_all(&lowered, " ");

    cleaned
        .split_whitespace()
        .filter(|w| w.chars().count() >= min_length)
        .filter(|w| !stopwords.contains(*w))
        .map(str::to_string)
        .collect()
}

/// The `n` most frequent tokens, by descending count.
///
/// Ties keep the order in which tokens were first seen.
pub fn top_n(tokens: &[String], n: usize) -> Vec<(String, usize)> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<(String, usize)> = Vec::new();

    for token in tokens {
        match index.get(token.as_str()) {
            Some(&i) => counts[i].1 += 1,
            None => {
                index.insert(token.as_str(), counts.len());
                counts.push((token.clone(), 1));
            }
        }
    }

    // Stable sort keeps first-seen order among equal counts.
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts.truncate(n);
    counts
}
