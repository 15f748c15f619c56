//! # Verdant News
//!
//! A news curation pipeline that periodically fetches articles matching a
//! set of sustainability queries, filters them for recency and topical
//! relevance, and maintains a rolling JSON feed for a website widget.
//!
//! ## Features
//!
//! - Fetches from NewsAPI or Google News RSS, one page per query
//! - Normalizes articles into a fixed JSON contract (cleaned text,
//!   `DD-MM-YYYY` dates, sentinel values for missing fields)
//! - Deduplicates by URL, prefers fresh metadata over cached metadata
//! - Enforces a retention window and a maximum feed size
//! - Caches per-query results so reruns inside the staleness window skip
//!   the network
//!
//! ## Usage
//!
//! ```sh
//! NEWS_API_KEY=... verdant_news --output ./public/news.json
//! ```
//!
//! ## Architecture
//!
//! The application follows a pipeline architecture:
//! 1. **Fetch**: one upstream call per configured query, sequential, with an
//!    inter-query delay to respect upstream rate limits
//! 2. **Normalize**: raw records become canonical articles or are discarded
//! 3. **Filter**: domain allow-list, then relevance scoring
//! 4. **Merge**: dedup against the prior feed, retention window, sort, cap
//! 5. **Output**: atomic write of the feed document
//!
//! A failed query contributes nothing and never aborts the run; the only
//! fatal startup error is invalid configuration.

use chrono::{Duration, Utc};
use clap::Parser;
use rand::Rng;
use std::error::Error;
use std::time::Duration as StdDuration;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cache;
mod cli;
mod config;
mod fetch;
mod merge;
mod models;
mod normalize;
mod outputs;
mod relevance;
mod utils;

use cache::CacheStore;
use cli::Cli;
use config::RunConfig;
use fetch::{ArticleFetcher, FetchError, NewsSource};
use models::{Article, NewsFeed};

/// Pause after an upstream 429 before moving on to the next query.
const RATE_LIMIT_COOLDOWN: StdDuration = StdDuration::from_secs(30);

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("verdant_news starting up");

    let args = Cli::parse();
    let config = match RunConfig::from_cli(args) {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Configuration error; aborting before any fetch");
            return Err(e.into());
        }
    };
    debug!(
        provider = ?config.provider,
        queries = config.queries.len(),
        retention_days = config.retention_days,
        max_articles = config.max_articles,
        "Configuration loaded"
    );

    let source = NewsSource::from_config(&config);
    let today = Utc::now().date_naive();
    let since = today - Duration::days(i64::from(config.retention_days));

    let mut cache = CacheStore::load(&config.cache_path, config.cache_ttl);
    let prior = outputs::json::read_prior_articles(&config.output_path).await;

    // ---- Per-query fetch loop ----
    let mut fresh: Vec<Article> = Vec::new();
    let mut cache_hits = 0usize;
    let mut failed_queries = 0usize;
    let mut network_calls = 0usize;

    for query in &config.queries {
        if let Some(cached) = cache.lookup(query, Utc::now()) {
            debug!(%query, count = cached.len(), "Cache hit; skipping fetch");
            fresh.extend_from_slice(cached);
            cache_hits += 1;
            continue;
        }

        if network_calls > 0 {
            sleep(jittered(config.query_delay)).await;
        }
        network_calls += 1;

        match source.search(query, since).await {
            Ok(raw_articles) => {
                let fetched = raw_articles.len();
                let articles: Vec<Article> = raw_articles
                    .into_iter()
                    .filter_map(|raw| normalize::normalize(raw, query, today))
                    .filter(|article| utils::host_allowed(&article.url, &config.domains))
                    .filter(|article| {
                        !config.relevance_filter
                            || relevance::is_relevant(
                                article,
                                &config.context_keywords,
                                config.relevance_threshold,
                            )
                    })
                    .collect();

                info!(%query, fetched, kept = articles.len(), "Query processed");
                cache.insert(query, articles.clone(), Utc::now());
                fresh.extend(articles);
            }
            Err(FetchError::RateLimited) => {
                failed_queries += 1;
                warn!(
                    %query,
                    cooldown_secs = RATE_LIMIT_COOLDOWN.as_secs(),
                    "Rate limited; cooling down before the next query"
                );
                sleep(jittered(RATE_LIMIT_COOLDOWN)).await;
            }
            Err(e) => {
                failed_queries += 1;
                error!(%query, error = %e, "Fetch failed; query contributes nothing this run");
            }
        }
    }

    if let Err(e) = cache.save() {
        warn!(path = %config.cache_path, error = %e, "Failed to persist query cache");
    }

    // ---- Merge into the rolling window ----
    let fresh_count = fresh.len();
    let prior_count = prior.len();
    if failed_queries > 0 && fresh_count == 0 && cache_hits == 0 {
        warn!("Every query failed; publishing from the prior feed only");
    }

    let final_articles = merge::merge(
        fresh,
        prior,
        today,
        config.retention_days,
        config.max_articles,
    );
    info!(
        fresh = fresh_count,
        prior = prior_count,
        kept = final_articles.len(),
        cache_hits,
        failed_queries,
        "Merged article window"
    );

    // ---- Output ----
    let last_updated = Utc::now().to_rfc3339();
    let feed = NewsFeed::new(last_updated.clone(), final_articles);

    if let Err(e) = outputs::json::write_feed(&feed, &config.output_path).await {
        error!(error = %e, "Failed to write feed; retrying once");
        if let Err(e) = outputs::json::write_feed(&feed, &config.output_path).await {
            error!(error = %e, "Retry failed; writing the empty fallback document");
            if let Err(e) = outputs::json::write_fallback(&config.output_path, last_updated).await {
                error!(error = %e, "Fallback write failed; this run produced no output");
                return Err(e);
            }
        }
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        articles = feed.total_articles,
        "Execution complete"
    );

    Ok(())
}

/// Add up to 250 ms of jitter so scheduled runs across deployments do not
/// hit the upstream in lockstep.
fn jittered(base: StdDuration) -> StdDuration {
    let jitter_ms: u64 = rand::rng().random_range(0..=250);
    base + StdDuration::from_millis(jitter_ms)
}
