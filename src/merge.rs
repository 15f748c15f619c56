//! Merge/dedup/retention engine.
//!
//! Combines freshly fetched articles with the previously published feed and
//! produces the next rolling window. Fresh articles are placed ahead of
//! prior ones so that first-occurrence-wins deduplication prefers fresh
//! metadata for a URL seen in both. The sort must be stable: the dedup
//! ordering encodes freshness priority for equal dates.

use std::cmp::Reverse;

use chrono::{Duration, NaiveDate};
use itertools::Itertools;

use crate::models::{Article, DATE_FORMAT};

/// Produce the next persisted collection.
///
/// Steps, in order: concatenate fresh ahead of prior; drop articles without
/// a URL and deduplicate by URL (first occurrence wins); keep only articles
/// dated on or after `today - retention_days` (inclusive); stable-sort by
/// date descending; truncate to `max_count`.
///
/// Inputs are assumed normalized: dates are valid `DD-MM-YYYY` strings. An
/// article whose date nevertheless fails to parse is treated as expired.
pub fn merge(
    fresh: Vec<Article>,
    prior: Vec<Article>,
    today: NaiveDate,
    retention_days: u32,
    max_count: usize,
) -> Vec<Article> {
    let cutoff = today - Duration::days(i64::from(retention_days));

    let mut retained: Vec<Article> = fresh
        .into_iter()
        .chain(prior)
        .filter(|article| !article.url.trim().is_empty())
        .unique_by(|article| article.url.clone())
        .filter(|article| parse_feed_date(&article.date).is_some_and(|date| date >= cutoff))
        .collect();

    retained.sort_by_key(|article| {
        Reverse(parse_feed_date(&article.date).unwrap_or(NaiveDate::MIN))
    });
    retained.truncate(max_count);
    retained
}

/// Parse a `DD-MM-YYYY` feed date.
pub fn parse_feed_date(date: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(date, DATE_FORMAT).ok()
}
