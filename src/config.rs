//! Run configuration assembled from CLI arguments.
//!
//! The keyword lists used to be baked into the fetch script; here they are
//! explicit configuration so deployments (and tests) can substitute their
//! own small deterministic sets.

use std::time::Duration;

use thiserror::Error;

use crate::cli::Cli;

/// Search queries used when the deployment does not supply its own.
pub const DEFAULT_QUERIES: &[&str] = &[
    "sustainability business",
    "corporate sustainability",
    "ESG strategy",
    "green business",
    "circular economy",
    "reuse materials",
    "recycling fashion",
    "closed-loop textiles",
    "sustainable textiles",
    "eco-friendly fabrics",
    "ethical apparel",
    "fashion sustainability",
    "textile wastewater",
    "water stewardship",
    "water pollution textile",
    "clean water in fashion",
    "green chemistry",
    "sustainable chemicals",
    "ZDHC",
    "chemical management textiles",
    "supply chain transparency",
    "supplier audits",
    "CSR compliance",
    "ethical sourcing",
    "carbon footprint fashion",
    "climate action textile",
    "net zero supply chain",
    "sustainable innovation",
    "eco-fashion technology",
    "sustainable material innovation",
    "GRI reporting",
    "Higg Index",
    "sustainability standards",
    "corporate ESG report",
];

/// Relevance vocabulary checked against `title + description`.
pub const DEFAULT_CONTEXT_KEYWORDS: &[&str] = &[
    "sustainability",
    "sustainable",
    "esg",
    "circular economy",
    "recycling",
    "recycled",
    "carbon",
    "emissions",
    "net zero",
    "climate",
    "renewable",
    "green",
    "eco-friendly",
    "textile",
    "supply chain",
    "ethical sourcing",
    "water stewardship",
    "organic",
    "biodiversity",
    "environment",
];

/// Which upstream the fetch client talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    /// NewsAPI.org `/v2/everything` (requires an API key).
    NewsApi,
    /// Google News RSS search (no key).
    GoogleRss,
}

/// Configuration problems that abort the run before any network call.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("NEWS_API_KEY is required for the newsapi provider")]
    MissingApiKey,
    #[error("unknown provider {0:?} (expected \"newsapi\" or \"google-rss\")")]
    UnknownProvider(String),
    #[error("query list is empty")]
    NoQueries,
}

/// Validated configuration for one run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub provider: Provider,
    pub api_key: Option<String>,
    pub queries: Vec<String>,
    pub context_keywords: Vec<String>,
    pub domains: Vec<String>,
    pub retention_days: u32,
    pub max_articles: usize,
    pub relevance_threshold: f64,
    pub relevance_filter: bool,
    pub cache_ttl: Duration,
    pub output_path: String,
    pub cache_path: String,
    pub language: String,
    pub page_size: u32,
    pub query_delay: Duration,
}

impl RunConfig {
    /// Validate CLI arguments into a runnable configuration.
    pub fn from_cli(cli: Cli) -> Result<Self, ConfigError> {
        let provider = match cli.provider.as_str() {
            "newsapi" => Provider::NewsApi,
            "google-rss" => Provider::GoogleRss,
            other => return Err(ConfigError::UnknownProvider(other.to_string())),
        };

        if provider == Provider::NewsApi && cli.api_key.is_none() {
            return Err(ConfigError::MissingApiKey);
        }

        let queries = split_list(cli.queries.as_deref(), DEFAULT_QUERIES);
        if queries.is_empty() {
            return Err(ConfigError::NoQueries);
        }

        Ok(Self {
            provider,
            api_key: cli.api_key,
            queries,
            context_keywords: split_list(cli.context_keywords.as_deref(), DEFAULT_CONTEXT_KEYWORDS),
            domains: split_list(cli.domains.as_deref(), &[]),
            retention_days: cli.retention_days,
            max_articles: cli.max_articles,
            relevance_threshold: cli.relevance_threshold,
            relevance_filter: !cli.no_relevance_filter,
            cache_ttl: Duration::from_secs(u64::from(cli.cache_ttl_hours) * 3600),
            output_path: cli.output,
            cache_path: cli.cache_path,
            language: cli.language,
            page_size: cli.page_size,
            query_delay: Duration::from_millis(cli.query_delay_ms),
        })
    }
}

/// Split a comma-separated override, falling back to `defaults` when absent.
fn split_list(value: Option<&str>, defaults: &[&str]) -> Vec<String> {
    match value {
        Some(raw) => raw
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
        None => defaults.iter().map(|s| s.to_string()).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_newsapi_requires_key() {
        let cli = Cli::parse_from(["verdant_news"]);
        assert!(matches!(
            RunConfig::from_cli(cli),
            Err(ConfigError::MissingApiKey)
        ));
    }

    #[test]
    fn test_google_rss_needs_no_key() {
        let cli = Cli::parse_from(["verdant_news", "--provider", "google-rss"]);
        let config = RunConfig::from_cli(cli).unwrap();

        assert_eq!(config.provider, Provider::GoogleRss);
        assert_eq!(config.queries.len(), DEFAULT_QUERIES.len());
        assert_eq!(
            config.context_keywords.len(),
            DEFAULT_CONTEXT_KEYWORDS.len()
        );
    }

    #[test]
    fn test_unknown_provider_rejected() {
        let cli = Cli::parse_from(["verdant_news", "--provider", "bing"]);
        assert!(matches!(
            RunConfig::from_cli(cli),
            Err(ConfigError::UnknownProvider(_))
        ));
    }

    #[test]
    fn test_query_override_is_split_and_trimmed() {
        let cli = Cli::parse_from([
            "verdant_news",
            "--provider",
            "google-rss",
            "--queries",
            " circular economy , green chemistry ,,",
        ]);
        let config = RunConfig::from_cli(cli).unwrap();

        assert_eq!(config.queries, ["circular economy", "green chemistry"]);
    }

    #[test]
    fn test_empty_query_override_rejected() {
        let cli = Cli::parse_from([
            "verdant_news",
            "--provider",
            "google-rss",
            "--queries",
            " , ",
        ]);
        assert!(matches!(
            RunConfig::from_cli(cli),
            Err(ConfigError::NoQueries)
        ));
    }

    #[test]
    fn test_cache_ttl_converted_to_duration() {
        let cli = Cli::parse_from([
            "verdant_news",
            "--provider",
            "google-rss",
            "--cache-ttl-hours",
            "6",
        ]);
        let config = RunConfig::from_cli(cli).unwrap();
        assert_eq!(config.cache_ttl, Duration::from_secs(6 * 3600));
    }
}
