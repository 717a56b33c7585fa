//! Publisher-specific extraction rules.
//!
//! Each publisher module knows the structure of that site's article pages
//! (as they were when the rules were written) and exports:
//! - `REMOVE_TAGS`: elements to delete before extraction
//! - `extract(document, article)`: fill the article's fields from the page
//!
//! # Supported Publishers
//!
//! | Domain | Module | Body shape |
//! |--------|--------|------------|
//! | cnn.com | [`cnn`] | Prettified `section#body-text` |
//! | nytimes.com | [`nyt`] | Joined paragraphs and headings |
//! | washingtonpost.com | [`wapo`] | Prettified `div.article-body` |
//! | politico.com | [`politico`] | Joined paragraphs |
//! | thehill.com | [`hill`] | Joined paragraphs and headings |
//!
//! Any other domain goes through [`generic`], which only reads `<title>`.
//!
//! Domains are matched exactly after dropping one leading `www.`, so
//! `edition.cnn.com` is not CNN.

use once_cell::sync::Lazy;
use scraper::Html;
use std::collections::HashMap;
use tracing::debug;

use crate::dom::RemovalRule;
use crate::error::RipError;
use crate::models::{Article, RipType};
use crate::utils::url_domain;

pub mod cnn;
pub mod generic;
pub mod hill;
pub mod nyt;
pub mod politico;
pub mod wapo;

/// Removed from every page before any publisher rules run.
pub const BASE_REMOVE_TAGS: &[RemovalRule] = &[
    RemovalRule::Tag("figure"),
    RemovalRule::Tag("img"),
    RemovalRule::Tag("aside"),
    RemovalRule::Tag("script"),
];

static DOMAIN_TO_EXTRACTOR: Lazy<HashMap<&'static str, Extractor>> = Lazy::new(|| {
    HashMap::from([
        ("cnn.com", Extractor::Cnn),
        ("nytimes.com", Extractor::Nyt),
        ("washingtonpost.com", Extractor::Wapo),
        ("politico.com", Extractor::Politico),
        ("thehill.com", Extractor::Hill),
    ])
});

/// The extraction rule set for one publisher, or the generic fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Extractor {
    Generic,
    Cnn,
    Nyt,
    Wapo,
    Politico,
    Hill,
}

impl Extractor {
    /// Pick the extractor for a URL's domain. Unparseable URLs and unknown
    /// domains get [`Extractor::Generic`].
    pub fn for_url(url: &str) -> Self {
        url_domain(url)
            .map(|domain| Self::for_domain(&domain))
            .unwrap_or(Extractor::Generic)
    }

    pub fn for_domain(domain: &str) -> Self {
        DOMAIN_TO_EXTRACTOR
            .get(domain.to_ascii_lowercase().as_str())
            .copied()
            .unwrap_or(Extractor::Generic)
    }

    pub fn name(self) -> &'static str {
        match self {
            Extractor::Generic => "generic",
            Extractor::Cnn => cnn::NAME,
            Extractor::Nyt => nyt::NAME,
            Extractor::Wapo => wapo::NAME,
            Extractor::Politico => politico::NAME,
            Extractor::Hill => hill::NAME,
        }
    }

    /// The code stamped on records this extractor fills.
    pub fn rip_type(self) -> RipType {
        match self {
            Extractor::Generic => RipType::Unknown,
            Extractor::Cnn => RipType::Cnn,
            Extractor::Nyt => RipType::Nyt,
            Extractor::Wapo => RipType::Wapo,
            Extractor::Politico => RipType::Politico,
            Extractor::Hill => RipType::Hill,
        }
    }

    /// Publisher-specific removal rules, applied after [`BASE_REMOVE_TAGS`].
    pub fn removal_rules(self) -> &'static [RemovalRule] {
        match self {
            Extractor::Generic | Extractor::Nyt => &[],
            Extractor::Cnn => cnn::REMOVE_TAGS,
            Extractor::Wapo => wapo::REMOVE_TAGS,
            Extractor::Politico => politico::REMOVE_TAGS,
            Extractor::Hill => hill::REMOVE_TAGS,
        }
    }

    /// Fill `article` from a cleaned document.
    ///
    /// The generic pass always runs first; the publisher pass then
    /// overwrites what it knows better. `rip_type` is stamped last, only when
    /// extraction succeeded.
    ///
    /// # Errors
    ///
    /// [`RipError::StructureNotFound`] when a required element is missing.
    pub fn extract(self, document: &mut Html, article: &mut Article) -> Result<(), RipError> {
        generic::extract(document, article);
        match self {
            Extractor::Generic => {}
            Extractor::Cnn => cnn::extract(document, article)?,
            Extractor::Nyt => nyt::extract(document, article)?,
            Extractor::Wapo => wapo::extract(document, article)?,
            Extractor::Politico => politico::extract(document, article)?,
            Extractor::Hill => hill::extract(document, article)?,
        }
        article.rip_type = self.rip_type();
        debug!(extractor = self.name(), title = ?article.title, "Extracted article");
        Ok(())
    }
}
