//! Data models for ripped articles.
//!
//! This module defines the core data structures used throughout the crate:
//! - [`Article`]: The normalized record produced by a rip
//! - [`RipType`]: Which publisher extractor populated a record

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::utils::strip_schema;

static PARAGRAPH: Lazy<Selector> = Lazy::new(|| Selector::parse("p").unwrap());

/// Publisher code stamped on each record by the extractor that filled it.
///
/// `Unknown` is used only for domains routed through the generic extractor.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RipType {
    #[default]
    Unknown,
    Cnn,
    Nyt,
    Wapo,
    Politico,
    Hill,
}

impl RipType {
    /// Stored code, e.g. `"WAPO"`.
    pub fn code(self) -> &'static str {
        match self {
            RipType::Unknown => "UNKNOWN",
            RipType::Cnn => "CNN",
            RipType::Nyt => "NYT",
            RipType::Wapo => "WAPO",
            RipType::Politico => "POLITICO",
            RipType::Hill => "HILL",
        }
    }

    /// Human-readable publisher name.
    pub fn label(self) -> &'static str {
        match self {
            RipType::Unknown => "<unknown>",
            RipType::Cnn => "CNN",
            RipType::Nyt => "New York Times",
            RipType::Wapo => "Washington Post",
            RipType::Politico => "Politico",
            RipType::Hill => "The Hill",
        }
    }
}

impl fmt::Display for RipType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A news article ripped from a publisher page.
///
/// Built in memory by the pipeline from a URL, then either discarded or
/// handed to a store. Once stored, the extracted fields only change through
/// [`Article::copy_article`].
///
/// # Fields
///
/// * `url_no_schema` - `url` without its `http(s)://` prefix; the primary
///   lookup key. Optional only so that legacy records which predate it can
///   still be loaded.
/// * `body_content` - Serialized markup: either newline-joined paragraph
///   and heading elements or one prettified container, per publisher.
/// * `article_time` - Parsed from `time_str`; absent when parsing failed.
/// * `rip_time` - When the record was last ripped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    /// Store-assigned identity; `None` until persisted.
    #[serde(default)]
    pub id: Option<u64>,
    pub title: Option<String>,
    pub summary: Option<String>,
    pub byline: Option<String>,
    /// Raw, site-native time string.
    pub time_str: Option<String>,
    pub body_content: Option<String>,
    pub article_time: Option<DateTime<Utc>>,
    /// Content was hand-entered rather than ripped.
    #[serde(default)]
    pub manual: bool,
    pub url: String,
    #[serde(default)]
    pub url_no_schema: Option<String>,
    #[serde(default)]
    pub rip_type: RipType,
    pub rip_time: DateTime<Utc>,
}

impl Article {
    /// Create an empty, unsaved record for `url`.
    pub fn new(url: &str) -> Self {
        Article {
            id: None,
            title: None,
            summary: None,
            byline: None,
            time_str: None,
            body_content: None,
            article_time: None,
            manual: false,
            url: url.to_string(),
            url_no_schema: Some(strip_schema(url)),
            rip_type: RipType::Unknown,
            rip_time: Utc::now(),
        }
    }

    /// Replace the URL, keeping `url_no_schema` in sync.
    pub fn set_url(&mut self, url: &str) {
        self.url = url.to_string();
        self.parse_url();
    }

    /// Re-derive `url_no_schema` from `url`.
    pub fn parse_url(&mut self) {
        self.url_no_schema = Some(strip_schema(&self.url));
    }

    /// Copy the extracted fields of a freshly ripped `other` onto this record.
    ///
    /// Identity, URL and the `manual` flag stay as they are. Every copied
    /// field is overwritten, including with `None`. `rip_time` becomes now.
    pub fn copy_article(&mut self, other: &Article) {
        self.title = other.title.clone();
        self.summary = other.summary.clone();
        self.byline = other.byline.clone();
        self.time_str = other.time_str.clone();
        self.body_content = other.body_content.clone();
        self.article_time = other.article_time;
        self.rip_type = other.rip_type;
        self.rip_time = Utc::now();
    }

    /// The summary, or the first paragraph's text when there is none.
    pub fn summary_part(&self) -> Option<String> {
        if let Some(summary) = self.summary.as_deref().filter(|s| !s.is_empty()) {
            return Some(summary.to_string());
        }
        let body = self.body_content.as_deref()?;
        let fragment = Html::parse_fragment(body);
        fragment
            .select(&PARAGRAPH)
            .next()
            .map(|el| el.text().collect::<String>())
    }
}

impl fmt::Display for Article {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {}",
            self.rip_type,
            self.title.as_deref().unwrap_or("<untitled>")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_new_article_derives_url_no_schema() {
        let article = Article::new("https://www.nytimes.com/2020/03/03/us/story.html");
        assert_eq!(
            article.url_no_schema.as_deref(),
            Some("www.nytimes.com/2020/03/03/us/story.html")
        );
        assert_eq!(article.rip_type, RipType::Unknown);
        assert!(!article.manual);
        assert!(article.id.is_none());
        assert!(article.title.is_none());
    }

    #[test]
    fn test_set_url_keeps_key_in_sync() {
        let mut article = Article::new("https://cnn.com/a");
        article.set_url("http://thehill.com/b");
        assert_eq!(article.url, "http://thehill.com/b");
        assert_eq!(article.url_no_schema.as_deref(), Some("thehill.com/b"));
    }

    #[test]
    fn test_copy_article_overwrites_fields_and_keeps_identity() {
        let mut stored = Article::new("https://cnn.com/a");
        stored.id = Some(7);
        stored.title = Some("Old".to_string());
        stored.summary = Some("Old summary".to_string());
        stored.rip_time = Utc::now() - Duration::days(3);
        let original_rip_time = stored.rip_time;

        let mut fresh = Article::new("https://cnn.com/a");
        fresh.title = Some("New".to_string());
        fresh.byline = Some("By Someone".to_string());
        fresh.rip_type = RipType::Cnn;

        stored.copy_article(&fresh);

        assert_eq!(stored.id, Some(7));
        assert_eq!(stored.title.as_deref(), Some("New"));
        assert_eq!(stored.summary, None);
        assert_eq!(stored.byline.as_deref(), Some("By Someone"));
        assert_eq!(stored.rip_type, RipType::Cnn);
        assert!(stored.rip_time > original_rip_time);
    }

    #[test]
    fn test_summary_part_prefers_summary() {
        let mut article = Article::new("https://politico.com/x");
        article.summary = Some("The dek".to_string());
        article.body_content = Some("<p>First</p>\n<p>Second</p>".to_string());
        assert_eq!(article.summary_part().as_deref(), Some("The dek"));
    }

    #[test]
    fn test_summary_part_falls_back_to_first_paragraph() {
        let mut article = Article::new("https://cnn.com/x");
        article.summary = Some(String::new());
        article.body_content = Some("<h2>Head</h2>\n<p>First <b>bold</b></p>\n<p>Second</p>".to_string());
        assert_eq!(article.summary_part().as_deref(), Some("First bold"));
    }

    #[test]
    fn test_summary_part_none_without_content() {
        let article = Article::new("https://cnn.com/x");
        assert_eq!(article.summary_part(), None);
    }

    #[test]
    fn test_display() {
        let mut article = Article::new("https://thehill.com/x");
        article.rip_type = RipType::Hill;
        article.title = Some("A headline".to_string());
        assert_eq!(article.to_string(), "HILL - A headline");
        assert_eq!(RipType::Hill.label(), "The Hill");
    }

    #[test]
    fn test_rip_type_serializes_as_code() {
        assert_eq!(serde_json::to_string(&RipType::Wapo).unwrap(), "\"WAPO\"");
        assert_eq!(serde_json::to_string(&RipType::Unknown).unwrap(), "\"UNKNOWN\"");
        let parsed: RipType = serde_json::from_str("\"POLITICO\"").unwrap();
        assert_eq!(parsed, RipType::Politico);
    }

    #[test]
    fn test_legacy_record_deserializes_without_key() {
        let json = r#"{
            "title": "Legacy",
            "summary": null,
            "byline": null,
            "time_str": null,
            "body_content": null,
            "article_time": null,
            "url": "http://legacy.example.com/path",
            "rip_time": "2019-12-04T10:00:00Z"
        }"#;
        let article: Article = serde_json::from_str(json).unwrap();
        assert_eq!(article.url_no_schema, None);
        assert_eq!(article.rip_type, RipType::Unknown);
        assert!(!article.manual);
    }
}
