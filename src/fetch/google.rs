//! Google News RSS fetch client.
//!
//! Searches `news.google.com/rss/search`, which needs no API key. Google's
//! feed has two quirks this module absorbs so downstream code sees the same
//! [`RawArticle`] contract as the JSON provider:
//!
//! - item titles carry the publisher as `"Headline - Publisher"`, with a
//!   separate `<source>` element on most items
//! - `<pubDate>` is RFC 2822; it is converted to ISO-8601 here
//!
//! The `since` lower bound is approximated with the `when:Nd` search
//! operator, which only supports whole-day windows.

use chrono::{DateTime, NaiveDate, Utc};
use quick_xml::Reader;
use quick_xml::events::Event;
use reqwest::Client;
use tracing::{debug, info, instrument};

use super::{ArticleFetcher, FetchError, RawArticle, http_client};
use crate::utils::truncate_for_log;

const GOOGLE_NEWS_RSS_URL: &str = "https://news.google.com/rss/search";

/// Google News RSS client.
#[derive(Debug)]
pub struct GoogleNewsClient {
    http: Client,
    language: String,
}

impl GoogleNewsClient {
    pub fn new(language: String) -> Self {
        Self {
            http: http_client(),
            language,
        }
    }

    fn search_url(&self, query: &str, window_days: i64) -> String {
        let scoped = format!("{query} when:{window_days}d");
        format!(
            "{}?q={}&hl={}-US&gl=US&ceid=US:{}",
            GOOGLE_NEWS_RSS_URL,
            urlencoding::encode(&scoped),
            self.language,
            self.language,
        )
    }
}

impl ArticleFetcher for GoogleNewsClient {
    #[instrument(level = "info", skip_all, fields(%query))]
    async fn search(
        &self,
        query: &str,
        since: NaiveDate,
    ) -> Result<Vec<RawArticle>, FetchError> {
        let window_days = (Utc::now().date_naive() - since).num_days().max(1);
        let url = self.search_url(query, window_days);
        debug!(%url, "Requesting Google News RSS");

        let response = self.http.get(&url).send().await?;
        let status = response.status();
        if status.as_u16() == 429 {
            return Err(FetchError::RateLimited);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::Status {
                status: status.as_u16(),
                body: truncate_for_log(&body, 300),
            });
        }

        let body = response.text().await?;
        let articles = parse_rss(&body)?;
        info!(count = articles.len(), "Fetched Google News articles");
        Ok(articles)
    }
}

/// Parse an RSS 2.0 feed body into raw articles.
///
/// Tolerant of missing child elements; records lacking a title or link are
/// still emitted and left for the normalizer to discard.
fn parse_rss(xml: &str) -> Result<Vec<RawArticle>, FetchError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut articles = Vec::new();
    let mut item = ItemFields::default();
    let mut in_item = false;
    let mut current_tag = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let name = std::str::from_utf8(e.name().as_ref())
                    .unwrap_or("")
                    .to_string();
                if name == "item" {
                    in_item = true;
                    item = ItemFields::default();
                } else {
                    current_tag = name;
                }
            }
            Ok(Event::End(e)) => {
                if e.name().as_ref() == b"item" && in_item {
                    in_item = false;
                    articles.push(item.take().into_raw());
                }
            }
            Ok(Event::Text(e)) => {
                if in_item {
                    let text = e.unescape().unwrap_or_default().into_owned();
                    item.set(&current_tag, text);
                }
            }
            Ok(Event::CData(e)) => {
                if in_item {
                    let text = String::from_utf8_lossy(e.as_ref()).into_owned();
                    item.set(&current_tag, text);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(FetchError::Xml(e)),
            _ => {}
        }
    }

    Ok(articles)
}

/// Accumulator for the children of one `<item>`.
#[derive(Debug, Default)]
struct ItemFields {
    title: String,
    link: String,
    pub_date: String,
    description: String,
    source: String,
}

impl ItemFields {
    fn set(&mut self, tag: &str, text: String) {
        match tag {
            "title" => self.title = text,
            "link" => self.link = text,
            "pubDate" => self.pub_date = text,
            "description" => self.description = strip_html(&text),
            "source" => self.source = text,
            _ => {}
        }
    }

    fn take(&mut self) -> ItemFields {
        std::mem::take(self)
    }

    fn into_raw(self) -> RawArticle {
        let (title, title_source) = split_source_suffix(&self.title);
        let source = if self.source.is_empty() {
            title_source
        } else {
            Some(self.source)
        };

        RawArticle {
            title: non_empty(title),
            url: non_empty(self.link),
            source,
            published_at: non_empty(to_iso8601(&self.pub_date)),
            description: non_empty(self.description),
            image_url: None,
        }
    }
}

/// Google News titles read `"Headline - Publisher"`; split off the publisher.
fn split_source_suffix(title: &str) -> (String, Option<String>) {
    match title.rfind(" - ") {
        Some(pos) => (
            title[..pos].trim().to_string(),
            Some(title[pos + 3..].trim().to_string()),
        ),
        None => (title.to_string(), None),
    }
}

/// Convert an RFC 2822 feed date to RFC 3339. Unparsable input passes
/// through unchanged; the normalizer applies its own fallback.
fn to_iso8601(pub_date: &str) -> String {
    match DateTime::parse_from_rfc2822(pub_date) {
        Ok(instant) => instant.with_timezone(&Utc).to_rfc3339(),
        Err(_) => pub_date.to_string(),
    }
}

/// Drop markup from a description, keeping the text content.
fn strip_html(html: &str) -> String {
    let mut result = String::with_capacity(html.len());
    let mut in_tag = false;
    for ch in html.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => result.push(ch),
            _ => {}
        }
    }
    result.trim().to_string()
}

fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() { None } else { Some(s) }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RSS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>"sustainable textiles" - Google News</title>
    <item>
      <title>Mills adopt closed-loop dyeing - Textile Weekly</title>
      <link>https://example.com/dyeing</link>
      <pubDate>Tue, 04 Nov 2025 10:30:00 GMT</pubDate>
      <description>&lt;a href="https://example.com/dyeing"&gt;Mills adopt closed-loop dyeing&lt;/a&gt;</description>
      <source url="https://textileweekly.example.com">Textile Weekly</source>
    </item>
    <item>
      <title>Water stewardship pact signed - River Post</title>
      <link>https://example.com/water</link>
      <pubDate>Mon, 03 Nov 2025 08:00:00 GMT</pubDate>
    </item>
  </channel>
</rss>"#;

    #[test]
    fn test_parse_rss_items() {
        let articles = parse_rss(SAMPLE_RSS).unwrap();
        assert_eq!(articles.len(), 2);

        let first = &articles[0];
        assert_eq!(first.title.as_deref(), Some("Mills adopt closed-loop dyeing"));
        assert_eq!(first.url.as_deref(), Some("https://example.com/dyeing"));
        assert_eq!(first.source.as_deref(), Some("Textile Weekly"));
        assert_eq!(
            first.published_at.as_deref(),
            Some("2025-11-04T10:30:00+00:00")
        );
        // Markup was stripped from the description.
        assert_eq!(
            first.description.as_deref(),
            Some("Mills adopt closed-loop dyeing")
        );
    }

    #[test]
    fn test_source_from_title_when_element_missing() {
        let articles = parse_rss(SAMPLE_RSS).unwrap();
        let second = &articles[1];
        assert_eq!(second.title.as_deref(), Some("Water stewardship pact signed"));
        assert_eq!(second.source.as_deref(), Some("River Post"));
        assert!(second.description.is_none());
    }

    #[test]
    fn test_empty_feed() {
        let xml = r#"<?xml version="1.0"?><rss version="2.0"><channel></channel></rss>"#;
        assert!(parse_rss(xml).unwrap().is_empty());
    }

    #[test]
    fn test_unparsable_pub_date_passes_through() {
        assert_eq!(to_iso8601("not-a-date"), "not-a-date");
        assert_eq!(
            to_iso8601("Tue, 04 Nov 2025 10:30:00 GMT"),
            "2025-11-04T10:30:00+00:00"
        );
    }

    #[test]
    fn test_split_source_suffix() {
        let (title, source) = split_source_suffix("Headline with - dashes - Publisher");
        assert_eq!(title, "Headline with - dashes");
        assert_eq!(source.as_deref(), Some("Publisher"));

        let (title, source) = split_source_suffix("No publisher here");
        assert_eq!(title, "No publisher here");
        assert!(source.is_none());
    }

    #[test]
    fn test_search_url_includes_window() {
        let client = GoogleNewsClient::new("en".to_string());
        let url = client.search_url("green chemistry", 14);
        assert!(url.contains("green%20chemistry%20when%3A14d"));
        assert!(url.contains("hl=en-US"));
    }
}
