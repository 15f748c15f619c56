//! NewsAPI.org fetch client.
//!
//! Queries the `/v2/everything` endpoint, one page per query, sorted by
//! publication time. The response envelope carries its own `status` field in
//! addition to the HTTP status; both are checked.

use chrono::NaiveDate;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info, instrument};

use super::{ArticleFetcher, FetchError, RawArticle, http_client};
use crate::utils::truncate_for_log;

const NEWSAPI_BASE_URL: &str = "https://newsapi.org/v2";

/// Response envelope for `/v2/everything`.
#[derive(Debug, Deserialize)]
struct NewsApiResponse {
    status: String,
    articles: Option<Vec<NewsApiArticle>>,
    code: Option<String>,
    message: Option<String>,
}

/// Wire shape of one NewsAPI article.
#[derive(Debug, Deserialize)]
struct NewsApiArticle {
    source: Option<NewsApiSource>,
    title: Option<String>,
    description: Option<String>,
    url: Option<String>,
    #[serde(rename = "urlToImage")]
    url_to_image: Option<String>,
    #[serde(rename = "publishedAt")]
    published_at: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NewsApiSource {
    name: Option<String>,
}

impl NewsApiArticle {
    fn into_raw(self) -> RawArticle {
        RawArticle {
            title: self.title,
            url: self.url,
            source: self.source.and_then(|s| s.name),
            published_at: self.published_at,
            description: self.description,
            image_url: self.url_to_image,
        }
    }
}

/// NewsAPI client; holds the reqwest client and the static API key.
#[derive(Debug)]
pub struct NewsApiClient {
    http: Client,
    api_key: String,
    language: String,
    page_size: u32,
}

impl NewsApiClient {
    pub fn new(api_key: String, language: String, page_size: u32) -> Self {
        Self {
            http: http_client(),
            api_key,
            language,
            page_size,
        }
    }

    fn search_url(&self, query: &str, since: NaiveDate) -> String {
        format!(
            "{}/everything?q={}&language={}&sortBy=publishedAt&pageSize={}&from={}",
            NEWSAPI_BASE_URL,
            urlencoding::encode(query),
            self.language,
            self.page_size,
            since.format("%Y-%m-%d"),
        )
    }
}

impl ArticleFetcher for NewsApiClient {
    #[instrument(level = "info", skip_all, fields(%query))]
    async fn search(
        &self,
        query: &str,
        since: NaiveDate,
    ) -> Result<Vec<RawArticle>, FetchError> {
        let url = self.search_url(query, since);
        debug!(%url, "Requesting NewsAPI page");

        let response = self
            .http
            .get(&url)
            .header("X-Api-Key", &self.api_key)
            .send()
            .await?;

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

        let envelope: NewsApiResponse = response.json().await?;
        if envelope.status != "ok" {
            return Err(FetchError::Api {
                code: envelope.code.unwrap_or_else(|| "unknown".to_string()),
                message: envelope
                    .message
                    .unwrap_or_else(|| "unknown error".to_string()),
            });
        }

        let articles: Vec<RawArticle> = envelope
            .articles
            .unwrap_or_default()
            .into_iter()
            .map(NewsApiArticle::into_raw)
            .collect();
        info!(count = articles.len(), "Fetched NewsAPI articles");
        Ok(articles)
    }
}
