//! Article storage with URL lookup and re-processing.
//!
//! The store keeps records in memory and, when given a path, mirrors them to
//! a single JSON file after every change:
//!
//! ```text
//! articles.json
//! {
//!   "next_id": 3,
//!   "articles": [ { "id": 1, "url": "...", ... }, ... ]
//! }
//! ```
//!
//! Lookups try the schema-stripped URL first and the raw URL second, so
//! records saved before `url_no_schema` existed are still found.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, instrument, warn};

use crate::error::RipError;
use crate::models::Article;
use crate::pipeline::Ripper;
use crate::utils::strip_schema;

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreFile {
    #[serde(default)]
    next_id: u64,
    #[serde(default)]
    articles: Vec<Article>,
}

/// Stored articles, optionally backed by a JSON file.
#[derive(Debug, Default)]
pub struct ArticleStore {
    path: Option<PathBuf>,
    data: StoreFile,
}

impl ArticleStore {
    /// An empty store that is never written to disk.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Load the store at `path`, starting empty if the file does not exist.
    #[instrument(level = "info", skip_all, fields(path = %path.as_ref().display()))]
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, RipError> {
        let path = path.as_ref().to_path_buf();
        let mut data: StoreFile = match fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!("No store file yet; starting empty");
                StoreFile::default()
            }
            Err(e) => return Err(e.into()),
        };
        // Ids are never reused, even if the counter was lost or hand-edited.
        let max_id = data.articles.iter().filter_map(|a| a.id).max().unwrap_or(0);
        data.next_id = data.next_id.max(max_id);
        info!(count = data.articles.len(), "Opened article store");
        Ok(Self {
            path: Some(path),
            data,
        })
    }

    /// Write the store to its file, if it has one.
    pub async fn save(&self) -> Result<(), RipError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }
        let json = serde_json::to_string_pretty(&self.data)?;
        fs::write(path, json).await?;
        info!(path = %path.display(), count = self.data.articles.len(), "Saved article store");
        Ok(())
    }

    /// Articles, most recently ripped first.
    pub fn articles(&self) -> Vec<&Article> {
        let mut articles: Vec<&Article> = self.data.articles.iter().collect();
        articles.sort_by(|a, b| b.rip_time.cmp(&a.rip_time));
        articles
    }

    pub fn len(&self) -> usize {
        self.data.articles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.articles.is_empty()
    }

    /// Find an article by URL: schema-stripped key first, then the raw URL.
    pub fn get_by_url(&self, url: &str) -> Result<&Article, RipError> {
        let index = self.position_by_url(url)?;
        Ok(&self.data.articles[index])
    }

    fn position_by_url(&self, url: &str) -> Result<usize, RipError> {
        let key = strip_schema(url);
        self.data
            .articles
            .iter()
            .position(|a| a.url_no_schema.as_deref() == Some(key.as_str()))
            .or_else(|| self.data.articles.iter().position(|a| a.url == url))
            .ok_or_else(|| RipError::NotFound(url.to_string()))
    }

    /// Add a new article, assigning it an id. Returns the stored copy.
    pub fn insert(&mut self, mut article: Article) -> &Article {
        article.parse_url();
        self.data.next_id += 1;
        article.id = Some(self.data.next_id);
        self.data.articles.push(article);
        &self.data.articles[self.data.articles.len() - 1]
    }

    /// Remove and return the article stored for `url`.
    pub fn delete_by_url(&mut self, url: &str) -> Result<Article, RipError> {
        let index = self.position_by_url(url)?;
        Ok(self.data.articles.remove(index))
    }

    /// Rip `url` unless it is already stored.
    ///
    /// Returns the article and whether it was newly created. An existing
    /// article is returned as-is, without a network call.
    #[instrument(level = "info", skip_all, fields(%url))]
    pub async fn process_article_from_url(
        &mut self,
        ripper: &Ripper,
        url: &str,
    ) -> Result<(Article, bool), RipError> {
        if let Ok(existing) = self.get_by_url(url) {
            info!(id = ?existing.id, rip_time = %existing.rip_time, "Article already exists");
            return Ok((existing.clone(), false));
        }

        let article = ripper.process_url(url).await?;
        let stored = self.insert(article).clone();
        self.save().await?;
        info!(id = ?stored.id, title = ?stored.title, "Stored new article");
        Ok((stored, true))
    }

    /// Rip `url` again and copy the fresh fields onto the stored record.
    ///
    /// # Errors
    ///
    /// [`RipError::NotFound`] when nothing is stored for `url`; otherwise any
    /// error from the rip itself, in which case the stored record is left
    /// untouched.
    #[instrument(level = "info", skip_all, fields(%url))]
    pub async fn reprocess(&mut self, ripper: &Ripper, url: &str) -> Result<Article, RipError> {
        let index = self.position_by_url(url)?;
        let source_url = self.data.articles[index].url.clone();

        let fresh = ripper.process_url(&source_url).await.inspect_err(|e| {
            warn!(error = %e, "Re-processing failed; stored article unchanged");
        })?;
        self.data.articles[index].copy_article(&fresh);
        let updated = self.data.articles[index].clone();

        self.save().await?;
        info!(id = ?updated.id, "Re-processed article");
        Ok(updated)
    }
}
