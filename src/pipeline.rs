//! The rip pipeline: URL in, populated [`Article`] out.
//!
//! ```text
//! validate URL ─► fetch + decode ─► remove base tags ─► remove publisher tags
//!              ─► extract ─► parse time string ─► Article
//! ```
//!
//! One URL is processed at a time and nothing is shared between runs apart
//! from the HTTP client, so separate runs may be driven in parallel by the
//! caller. Nothing is retried.

use reqwest::Client;
use scraper::Html;
use tracing::{info, instrument};

use crate::dom::remove_tags;
use crate::error::RipError;
use crate::fetcher::fetch_document;
use crate::models::Article;
use crate::scrapers::{BASE_REMOVE_TAGS, Extractor};
use crate::timeparse::parse_time_str;
use crate::utils::{truncate_for_log, url_is_valid};

/// Turns article URLs into [`Article`] records.
#[derive(Debug, Clone)]
pub struct Ripper {
    client: Client,
}

impl Ripper {
    /// Build a ripper with a default HTTP client. System proxy settings from
    /// the environment are honored.
    pub fn new() -> Result<Self, RipError> {
        let client = Client::builder()
            .user_agent(concat!("newsripper/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// Rip `url` into a fresh, unsaved article.
    ///
    /// # Errors
    ///
    /// - [`RipError::InvalidUrl`] before any network call
    /// - [`RipError::Fetch`] on network or HTTP failure
    /// - [`RipError::StructureNotFound`] when the page no longer matches the
    ///   publisher's rules
    ///
    /// An unparseable time string is not an error: `article_time` stays empty.
    #[instrument(level = "info", skip_all, fields(%url))]
    pub async fn process_url(&self, url: &str) -> Result<Article, RipError> {
        if !url_is_valid(url) {
            return Err(RipError::InvalidUrl(url.to_string()));
        }
        let mut article = Article::new(url);
        let extractor = Extractor::for_url(url);
        info!(extractor = extractor.name(), "Ripping article");

        // An empty URL is the only fetch that yields no document, and it
        // never gets past validation.
        if let Some(document) = fetch_document(&self.client, &article.url).await? {
            process_document(&mut article, document, extractor)?;
        }
        Ok(article)
    }
}

/// Clean `document`, extract into `article`, then parse its time string.
pub fn process_document(
    article: &mut Article,
    mut document: Html,
    extractor: Extractor,
) -> Result<(), RipError> {
    // Base tags first, then the publisher's own.
    remove_tags(&mut document, BASE_REMOVE_TAGS)?;
    remove_tags(&mut document, extractor.removal_rules())?;

    extractor.extract(&mut document, article)?;

    article.article_time = article.time_str.as_deref().and_then(parse_time_str);
    info!(
        rip_type = %article.rip_type,
        title = %truncate_for_log(article.title.as_deref().unwrap_or_default(), 80),
        parsed_time = article.article_time.is_some(),
        "Processed article"
    );
    Ok(())
}
