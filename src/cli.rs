//! Command-line interface definitions for Verdant News.
//!
//! This module defines the CLI arguments and options using the `clap` crate.
//! Every option can be provided via a command-line flag or an environment
//! variable, which is how scheduled (cron) deployments configure the run.

use clap::Parser;

/// Command-line arguments for the Verdant News fetcher.
///
/// All options have defaults except the API key, which the `newsapi`
/// provider requires; its absence is a fatal startup error before any
/// network call is made.
///
/// # Examples
///
/// ```sh
/// # NewsAPI with key from the environment
/// NEWS_API_KEY=... verdant_news --output ./public/news.json
///
/// # Google News RSS needs no key
/// verdant_news --provider google-rss --retention-days 7 --max-articles 30
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// API key for the NewsAPI provider
    #[arg(long, env = "NEWS_API_KEY")]
    pub api_key: Option<String>,

    /// Article source: "newsapi" or "google-rss"
    #[arg(long, env = "VERDANT_PROVIDER", default_value = "newsapi")]
    pub provider: String,

    /// Comma-separated search queries; defaults to the built-in sustainability list
    #[arg(long, env = "VERDANT_QUERIES")]
    pub queries: Option<String>,

    /// Comma-separated relevance vocabulary; defaults to the built-in list
    #[arg(long, env = "VERDANT_CONTEXT_KEYWORDS")]
    pub context_keywords: Option<String>,

    /// Comma-separated domain allow-list; empty means all domains pass
    #[arg(long, env = "VERDANT_DOMAINS")]
    pub domains: Option<String>,

    /// Days an article stays in the published feed
    #[arg(long, env = "VERDANT_RETENTION_DAYS", default_value_t = 14)]
    pub retention_days: u32,

    /// Maximum number of articles kept in the feed
    #[arg(long, env = "VERDANT_MAX_ARTICLES", default_value_t = 50)]
    pub max_articles: usize,

    /// Minimum relevance score an article must reach
    #[arg(long, env = "VERDANT_RELEVANCE_THRESHOLD", default_value_t = 0.05)]
    pub relevance_threshold: f64,

    /// Skip the relevance filter entirely (keyword queries are already topical)
    #[arg(long)]
    pub no_relevance_filter: bool,

    /// Hours a cached query result stays fresh
    #[arg(long, env = "VERDANT_CACHE_TTL_HOURS", default_value_t = 24)]
    pub cache_ttl_hours: u32,

    /// Path of the published feed document
    #[arg(short, long, env = "VERDANT_OUTPUT", default_value = "news.json")]
    pub output: String,

    /// Path of the per-query result cache
    #[arg(long, env = "VERDANT_CACHE_PATH", default_value = ".news_cache.json")]
    pub cache_path: String,

    /// Result language passed to the fetch provider
    #[arg(long, env = "VERDANT_LANGUAGE", default_value = "en")]
    pub language: String,

    /// Upstream page size (one page per query is fetched)
    #[arg(long, env = "VERDANT_PAGE_SIZE", default_value_t = 50)]
    pub page_size: u32,

    /// Delay between consecutive provider calls, in milliseconds
    #[arg(long, env = "VERDANT_QUERY_DELAY_MS", default_value_t = 1500)]
    pub query_delay_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["verdant_news"]);

        assert_eq!(cli.provider, "newsapi");
        assert_eq!(cli.retention_days, 14);
        assert_eq!(cli.max_articles, 50);
        assert_eq!(cli.cache_ttl_hours, 24);
        assert_eq!(cli.output, "news.json");
        assert!(!cli.no_relevance_filter);
        assert!(cli.api_key.is_none());
    }

    #[test]
    fn test_cli_overrides() {
        let cli = Cli::parse_from([
            "verdant_news",
            "--provider",
            "google-rss",
            "--retention-days",
            "7",
            "--max-articles",
            "30",
            "--no-relevance-filter",
            "-o",
            "/tmp/news.json",
        ]);

        assert_eq!(cli.provider, "google-rss");
        assert_eq!(cli.retention_days, 7);
        assert_eq!(cli.max_articles, 30);
        assert!(cli.no_relevance_filter);
        assert_eq!(cli.output, "/tmp/news.json");
    }

    #[test]
    fn test_cli_query_list() {
        let cli = Cli::parse_from([
            "verdant_news",
            "--queries",
            "circular economy,green chemistry",
        ]);

        assert_eq!(
            cli.queries.as_deref(),
            Some("circular economy,green chemistry")
        );
    }
}
