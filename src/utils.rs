//! URL helpers and small string utilities.
//!
//! This module provides helper functions used throughout the crate:
//! - URL validation before any network call
//! - Schema stripping for the lookup key stored on each article
//! - Domain extraction for picking a publisher extractor
//! - String truncation for log output

use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

static SCHEMA_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^https?://").unwrap());

/// Check that a URL is absolute, fetchable over HTTP(S) and has a host.
///
/// # Examples
///
/// ```ignore
/// assert!(url_is_valid("https://www.cnn.com/2020/03/03/politics/story"));
/// assert!(!url_is_valid("cnn.com/2020/03/03/politics/story"));
/// ```
pub fn url_is_valid(url: &str) -> bool {
    match Url::parse(url) {
        Ok(parsed) => {
            matches!(parsed.scheme(), "http" | "https")
                && parsed.host_str().is_some_and(|h| !h.is_empty())
        }
        Err(_) => false,
    }
}

/// Remove a leading `http://` or `https://` from a URL.
///
/// Applying it twice gives the same result as applying it once.
pub fn strip_schema(url: &str) -> String {
    SCHEMA_RE.replace(url, "").into_owned()
}

/// Parse the host out of a URL, dropping one leading `www.` label.
///
/// Returns `None` when the URL cannot be parsed or has no host.
pub fn url_domain(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let host = parsed.host_str()?;
    Some(host.strip_prefix("www.").unwrap_or(host).to_string())
}

/// Truncate a string for logging purposes.
///
/// Long strings are cut at `max` bytes (backing off to a char boundary) with
/// an ellipsis and byte count appended.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(truncate_for_log("short", 100), "short");
/// assert_eq!(truncate_for_log(&"a".repeat(500), 10), "aaaaaaaaaa…(+490 bytes)");
/// ```
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut cut = max;
    while !s.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}…(+{} bytes)", &s[..cut], s.len() - cut)
}
