//! Feed document reader and writer.
//!
//! The feed is both the run's output and the next run's "prior" input, so
//! this module owns both directions. Writes go through a temp file and a
//! rename: a widget polling the file mid-run must never observe a truncated
//! document.

use std::error::Error;
use std::path::Path;

use tokio::fs;
use tracing::{info, instrument, warn};

use crate::models::{Article, NewsFeed};

/// Read the previously published feed's articles.
///
/// A missing file is the normal first-run case; a corrupt file is logged and
/// treated as empty. Neither fails the run.
#[instrument(level = "info", skip_all, fields(path = %path))]
pub async fn read_prior_articles(path: &str) -> Vec<Article> {
    let contents = match fs::read_to_string(path).await {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            info!("No prior feed document; starting empty");
            return Vec::new();
        }
        Err(e) => {
            warn!(error = %e, "Prior feed is unreadable; treating as empty");
            return Vec::new();
        }
    };

    match serde_json::from_str::<NewsFeed>(&contents) {
        Ok(feed) => {
            info!(count = feed.articles.len(), "Loaded prior feed");
            feed.articles
        }
        Err(e) => {
            warn!(error = %e, "Prior feed is corrupt; treating as empty");
            Vec::new()
        }
    }
}

/// Write the feed document atomically (write-temp-then-rename).
#[instrument(level = "info", skip_all, fields(path = %output_path))]
pub async fn write_feed(feed: &NewsFeed, output_path: &str) -> Result<(), Box<dyn Error>> {
    let json = serde_json::to_string_pretty(feed)?;

    if let Some(parent) = Path::new(output_path).parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).await?;
        }
    }

    let tmp_path = format!("{output_path}.tmp");
    fs::write(&tmp_path, &json).await?;
    fs::rename(&tmp_path, output_path).await?;

    info!(count = feed.articles.len(), "Wrote feed document");
    Ok(())
}

/// Last-resort fallback: a valid document with zero articles. Losing the
/// output file entirely defeats the run's purpose; an accurate empty
/// document does not.
pub async fn write_fallback(output_path: &str, last_updated: String) -> Result<(), Box<dyn Error>> {
    write_feed(&NewsFeed::empty(last_updated), output_path).await
}
