//! Data models for the published news feed.
//!
//! This module defines the two structures that make up the on-disk contract:
//! - [`Article`]: a single normalized news article
//! - [`NewsFeed`]: the feed document consumed by the website widget
//!
//! Field names in the serialized JSON are fixed (`lastUpdated`, `imageUrl`,
//! ...) because existing widget deployments read them; the serde `rename`
//! attributes pin that contract.

use serde::{Deserialize, Serialize};

/// Sentinel used when the upstream record carries no publisher name.
pub const UNKNOWN_SOURCE: &str = "Unknown Source";

/// Sentinel used when the upstream record carries no description.
pub const NO_DESCRIPTION: &str = "No description available.";

/// Date format of [`Article::date`]: zero-padded day-month-year.
pub const DATE_FORMAT: &str = "%d-%m-%Y";

/// A normalized news article.
///
/// Every field is always present after normalization: missing source,
/// description, or image data is replaced with sentinels so feed consumers
/// never branch on absent fields. The `url` is the article's identity —
/// the persisted collection holds at most one entry per URL.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Article {
    /// Cleaned headline text, never empty.
    pub title: String,
    /// Canonical article URL; the deduplication key.
    pub url: String,
    /// Publisher display name, or [`UNKNOWN_SOURCE`].
    pub source: String,
    /// Publication date in `DD-MM-YYYY`, always a valid calendar date.
    pub date: String,
    /// Article summary, or [`NO_DESCRIPTION`].
    pub description: String,
    /// Thumbnail URL; may be empty when the upstream had none.
    #[serde(rename = "imageUrl", default)]
    pub image_url: String,
    /// The query that produced this article (provenance, not identity).
    #[serde(default)]
    pub keyword: String,
}

/// The feed document written to disk for the widget.
///
/// `total_articles` always equals `articles.len()`, and `articles` is sorted
/// by date descending — consumers rely on both.
#[derive(Debug, Deserialize, Serialize)]
pub struct NewsFeed {
    /// RFC 3339 timestamp of the run that wrote this document.
    #[serde(rename = "lastUpdated")]
    pub last_updated: String,
    /// Count of the persisted list.
    #[serde(rename = "totalArticles")]
    pub total_articles: usize,
    /// The rolling article window, newest first.
    pub articles: Vec<Article>,
}

impl NewsFeed {
    /// Wrap a final article collection with its metadata envelope.
    pub fn new(last_updated: String, articles: Vec<Article>) -> Self {
        Self {
            last_updated,
            total_articles: articles.len(),
            articles,
        }
    }

    /// A syntactically valid document with zero articles, used both for the
    /// first run (no prior feed) and as the last-resort write fallback.
    pub fn empty(last_updated: String) -> Self {
        Self::new(last_updated, Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_article() -> Article {
        Article {
            title: "Circular economy pilot expands".to_string(),
            url: "https://example.com/a1".to_string(),
            source: "Example Wire".to_string(),
            date: "04-11-2025".to_string(),
            description: "A closed-loop textiles program grows.".to_string(),
            image_url: "https://example.com/a1.jpg".to_string(),
            keyword: "circular economy".to_string(),
        }
    }

    #[test]
    fn test_article_serializes_contract_field_names() {
        let json = serde_json::to_string(&sample_article()).unwrap();
        assert!(json.contains("\"imageUrl\""));
        assert!(json.contains("\"keyword\""));
        assert!(json.contains("\"date\":\"04-11-2025\""));
    }

    #[test]
    fn test_article_deserializes_without_optional_fields() {
        let json = r#"{
            "title": "T",
            "url": "https://example.com/x",
            "source": "S",
            "date": "01-01-2025",
            "description": "D"
        }"#;

        let article: Article = serde_json::from_str(json).unwrap();
        assert_eq!(article.image_url, "");
        assert_eq!(article.keyword, "");
    }

    #[test]
    fn test_feed_count_matches_articles() {
        let feed = NewsFeed::new("2025-11-04T06:00:00Z".to_string(), vec![sample_article()]);
        assert_eq!(feed.total_articles, feed.articles.len());

        let json = serde_json::to_string(&feed).unwrap();
        assert!(json.contains("\"lastUpdated\""));
        assert!(json.contains("\"totalArticles\":1"));
    }

    #[test]
    fn test_empty_feed_is_valid_document() {
        let feed = NewsFeed::empty("2025-11-04T06:00:00Z".to_string());
        assert_eq!(feed.total_articles, 0);

        let round_trip: NewsFeed =
            serde_json::from_str(&serde_json::to_string(&feed).unwrap()).unwrap();
        assert!(round_trip.articles.is_empty());
    }
}
