//! Page fetching with character-encoding resolution.
//!
//! The encoding used to decode a page is resolved in this order:
//!
//! 1. An encoding declared inside the document (XML declaration or
//!    `<meta charset>` / `<meta http-equiv>`), found by scanning the
//!    leading bytes
//! 2. The `charset` parameter of the `Content-Type` response header
//! 3. UTF-8, unless a byte-order mark says otherwise
//!
//! After parsing, every anchor is rewritten by [`adjust_anchors`].

use encoding_rs::{Encoding, UTF_8};
use once_cell::sync::Lazy;
use regex::bytes::Regex as BytesRegex;
use regex::Regex;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use scraper::Html;
use tracing::{debug, info, instrument};

use crate::dom::adjust_anchors;
use crate::error::RipError;

const XML_SCAN_LIMIT: usize = 1024;
const HTML_SCAN_MIN: usize = 2048;

static XML_ENCODING_RE: Lazy<BytesRegex> = Lazy::new(|| {
    BytesRegex::new(r#"(?i)^\s*<\?[^>]*encoding=['"]([^'"]+)['"][^>]*\?>"#).unwrap()
});

static META_CHARSET_RE: Lazy<BytesRegex> = Lazy::new(|| {
    BytesRegex::new(r#"(?i)<\s*meta[^>]+charset\s*=\s*["']?([^>]*?)[ /;'">]"#).unwrap()
});

static HEADER_CHARSET_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)charset\s*=\s*["']?([^"';\s]+)"#).unwrap());

/// Fetch `url` and parse it into a document tree.
///
/// Returns `Ok(None)` without touching the network when `url` is empty.
/// Connection failures and error statuses become [`RipError::Fetch`].
#[instrument(level = "info", skip_all, fields(%url))]
pub async fn fetch_document(client: &Client, url: &str) -> Result<Option<Html>, RipError> {
    if url.trim().is_empty() {
        debug!("Empty URL; nothing to fetch");
        return Ok(None);
    }

    let response = client.get(url).send().await?.error_for_status()?;
    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(String::from);
    let body = response.bytes().await?;

    let document = parse_html(&body, content_type.as_deref());
    info!(bytes = body.len(), "Fetched page");
    Ok(Some(document))
}

/// Decode raw page bytes and parse them, then adjust anchors.
pub fn parse_html(bytes: &[u8], content_type: Option<&str>) -> Html {
    let encoding = resolve_encoding(bytes, content_type);
    let (text, used, had_errors) = encoding.decode(bytes);
    debug!(encoding = used.name(), had_errors, "Decoded page");

    let mut document = Html::parse_document(&text);
    let anchors = adjust_anchors(&mut document);
    debug!(anchors, "Adjusted anchors");
    document
}

/// Pick the encoding for `bytes`: document-declared, then header, then UTF-8.
pub fn resolve_encoding(bytes: &[u8], content_type: Option<&str>) -> &'static Encoding {
    declared_encoding(bytes)
        .or_else(|| content_type.and_then(header_encoding))
        .unwrap_or(UTF_8)
}

/// Encoding declared inside the document itself, if any is recognized.
pub fn declared_encoding(bytes: &[u8]) -> Option<&'static Encoding> {
    let xml_end = bytes.len().min(XML_SCAN_LIMIT);
    let html_end = bytes.len().min(HTML_SCAN_MIN.max(bytes.len() / 20));

    let label = XML_ENCODING_RE
        .captures(&bytes[..xml_end])
        .or_else(|| META_CHARSET_RE.captures(&bytes[..html_end]))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_bytes())?;
    Encoding::for_label(label)
}

/// Encoding named by a `Content-Type` header's `charset` parameter.
pub fn header_encoding(content_type: &str) -> Option<&'static Encoding> {
    let caps = HEADER_CHARSET_RE.captures(content_type)?;
    Encoding::for_label(caps.get(1)?.as_str().as_bytes())
}
