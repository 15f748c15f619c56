//! Cheap topicality scoring.
//!
//! The score is the fraction of the configured context vocabulary found in
//! an article's title and description. The default threshold is low on
//! purpose: one hit against a 20-word vocabulary passes. The filter exists
//! to reject obviously off-topic results, not to rank quality, and some
//! deployments skip it entirely when their queries are already topical.

use crate::models::Article;

/// Fraction of `keywords` found as case-insensitive substrings of
/// `title + " " + description`, in `[0, 1]`. An empty vocabulary scores 0.
pub fn score(article: &Article, keywords: &[String]) -> f64 {
    if keywords.is_empty() {
        return 0.0;
    }

    let haystack = format!("{} {}", article.title, article.description).to_lowercase();
    let hits = keywords
        .iter()
        .filter(|keyword| {
            let needle = keyword.trim().to_lowercase();
            !needle.is_empty() && haystack.contains(&needle)
        })
        .count();

    hits as f64 / keywords.len() as f64
}

/// Whether an article clears the relevance threshold.
pub fn is_relevant(article: &Article, keywords: &[String], threshold: f64) -> bool {
    score(article, keywords) >= threshold
}
