//! Small helpers for logging and URL filtering.

use url::Url;

/// Truncate a string for logging purposes.
///
/// Long strings are truncated to `max` bytes with an ellipsis and byte count
/// indicator appended. Used when logging upstream error bodies, which can be
/// whole HTML pages.
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        s.to_string()
    } else {
        format!("{}…(+{} bytes)", &s[..max], s.len() - max)
    }
}

/// Whether an article URL's host falls under the domain allow-list.
///
/// An empty allow-list admits everything. A listed domain matches itself and
/// any subdomain, so `example.com` admits `news.example.com`. URLs that fail
/// to parse are rejected when a list is configured.
pub fn host_allowed(article_url: &str, domains: &[String]) -> bool {
    if domains.is_empty() {
        return true;
    }

    let Ok(parsed) = Url::parse(article_url) else {
        return false;
    };
    let Some(host) = parsed.host_str() else {
        return false;
    };

    domains
        .iter()
        .any(|domain| host == domain || host.ends_with(&format!(".{domain}")))
}
