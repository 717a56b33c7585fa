//! Error types for ripping and storing articles.

use thiserror::Error;

/// Error type for every fallible ripper operation.
#[derive(Debug, Error)]
pub enum RipError {
    /// The URL failed syntax validation; no network call was made.
    #[error("'{0}' is not a valid URL")]
    InvalidUrl(String),

    /// Network or HTTP-level failure while fetching the page.
    #[error("fetch failed: {0}")]
    Fetch(#[from] reqwest::Error),

    /// A publisher's required element was missing from the page.
    ///
    /// Usually means the live site's markup has drifted away from what the
    /// extractor was written against.
    #[error("{extractor} structure not found: {element}")]
    StructureNotFound {
        extractor: &'static str,
        element: &'static str,
    },

    /// No stored article matches the URL.
    #[error("article not found for '{0}'")]
    NotFound(String),

    /// A removal rule could not be turned into a CSS selector.
    #[error("invalid selector '{0}'")]
    Selector(String),

    /// Store file I/O error
    #[error("store I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Store file (de)serialization error
    #[error("store format error: {0}")]
    Json(#[from] serde_json::Error),
}

impl RipError {
    pub(crate) fn missing(extractor: &'static str, element: &'static str) -> Self {
        RipError::StructureNotFound { extractor, element }
    }
}
