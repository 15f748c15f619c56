//! Raw-to-canonical article conversion.
//!
//! Records missing a usable title or URL are discarded here rather than
//! erroring; everything else is repaired with sentinels so the rest of the
//! pipeline never sees an absent field.

use chrono::{DateTime, NaiveDate, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::fetch::RawArticle;
use crate::models::{Article, DATE_FORMAT, NO_DESCRIPTION, UNKNOWN_SOURCE};

static CONTROL_CHARS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\r\n\t]+").unwrap());

/// Convert a raw record into a canonical [`Article`], or `None` when the
/// record has no usable title or URL.
///
/// `today` is the run date in the reference timezone (UTC); it is the
/// fallback for unparsable timestamps, injected so tests stay deterministic.
pub fn normalize(raw: RawArticle, query: &str, today: NaiveDate) -> Option<Article> {
    let title = clean_text(raw.title.as_deref().unwrap_or_default());
    if title.is_empty() {
        return None;
    }

    let url = raw.url.as_deref().unwrap_or_default().trim().to_string();
    if url.is_empty() {
        return None;
    }

    let source = match clean_text(raw.source.as_deref().unwrap_or_default()) {
        s if s.is_empty() => UNKNOWN_SOURCE.to_string(),
        s => s,
    };
    let description = match clean_text(raw.description.as_deref().unwrap_or_default()) {
        s if s.is_empty() => NO_DESCRIPTION.to_string(),
        s => s,
    };

    Some(Article {
        title,
        url,
        source,
        date: format_published_date(raw.published_at.as_deref(), today),
        description,
        image_url: raw.image_url.unwrap_or_default().trim().to_string(),
        keyword: query.to_string(),
    })
}

/// Clean article text for the JSON contract: embedded double quotes become
/// single quotes, newlines/carriage returns/tabs collapse to single spaces,
/// and the result is trimmed.
pub fn clean_text(raw: &str) -> String {
    let quoted = raw.replace('"', "'");
    CONTROL_CHARS.replace_all(&quoted, " ").trim().to_string()
}

/// Format an upstream ISO-8601 instant as `DD-MM-YYYY` in UTC, falling back
/// to `today` when the timestamp is absent or unparsable.
pub fn format_published_date(published_at: Option<&str>, today: NaiveDate) -> String {
    let date = published_at
        .and_then(|ts| DateTime::parse_from_rfc3339(ts).ok())
        .map(|instant| instant.with_timezone(&Utc).date_naive())
        .unwrap_or(today);
    date.format(DATE_FORMAT).to_string()
}
