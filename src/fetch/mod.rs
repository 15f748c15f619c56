//! Fetch clients for retrieving raw articles from upstream news sources.
//!
//! Two providers are supported:
//!
//! | Provider | Module | Method | Notes |
//! |----------|--------|--------|-------|
//! | NewsAPI | [`newsapi`] | JSON API | `/v2/everything`; requires an API key |
//! | Google News | [`google`] | RSS search | No key; the scheduled default upstream |
//!
//! Each provider implements [`ArticleFetcher`] and produces provider-neutral
//! [`RawArticle`] records; everything downstream of this module is unaware of
//! which upstream produced a record. Fetch failures are typed so the caller
//! can tell a rate-limit (worth a cooldown) from a hard transport error.

use chrono::NaiveDate;
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;

use crate::config::{Provider, RunConfig};

pub mod google;
pub mod newsapi;

use google::GoogleNewsClient;
use newsapi::NewsApiClient;

/// Per-call HTTP timeout; expiry surfaces as [`FetchError::Http`].
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

const USER_AGENT: &str = concat!("verdant_news/", env!("CARGO_PKG_VERSION"));

/// An article as returned by an upstream source, before normalization.
///
/// All fields are optional: upstreams routinely omit images, descriptions,
/// or even publishers, and the normalizer decides what is usable.
/// `published_at` is an ISO-8601 instant; the RSS provider converts its
/// RFC 2822 dates at the boundary so this contract holds for both upstreams.
#[derive(Debug, Clone, Default)]
pub struct RawArticle {
    pub title: Option<String>,
    pub url: Option<String>,
    pub source: Option<String>,
    pub published_at: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

/// Errors from one provider call. Each is recovered per-query: the query
/// contributes nothing this run and the next scheduled run retries.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("rate limited by upstream (HTTP 429)")]
    RateLimited,
    #[error("unexpected status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("api error {code}: {message}")]
    Api { code: String, message: String },
    #[error("rss parse error: {0}")]
    Xml(#[from] quick_xml::Error),
}

/// A source of raw articles for one query.
///
/// `since` is the publication lower bound; providers are free to approximate
/// it (Google News only supports whole-day windows).
pub trait ArticleFetcher {
    async fn search(&self, query: &str, since: NaiveDate)
    -> Result<Vec<RawArticle>, FetchError>;
}

/// The configured upstream, chosen once at startup.
#[derive(Debug)]
pub enum NewsSource {
    NewsApi(NewsApiClient),
    GoogleRss(GoogleNewsClient),
}

impl NewsSource {
    pub fn from_config(config: &RunConfig) -> Self {
        match config.provider {
            Provider::NewsApi => Self::NewsApi(NewsApiClient::new(
                config.api_key.clone().unwrap_or_default(),
                config.language.clone(),
                config.page_size,
            )),
            Provider::GoogleRss => Self::GoogleRss(GoogleNewsClient::new(config.language.clone())),
        }
    }
}

impl ArticleFetcher for NewsSource {
    async fn search(
        &self,
        query: &str,
        since: NaiveDate,
    ) -> Result<Vec<RawArticle>, FetchError> {
        match self {
            Self::NewsApi(client) => client.search(query, since).await,
            Self::GoogleRss(client) => client.search(query, since).await,
        }
    }
}

/// Shared HTTP client construction: timeout and identifying user agent.
fn http_client() -> Client {
    Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .user_agent(USER_AGENT)
        .build()
        .unwrap_or_else(|_| Client::new())
}
