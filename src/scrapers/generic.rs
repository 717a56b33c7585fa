//! Fallback extraction shared by every page.

use once_cell::sync::Lazy;
use scraper::{Html, Selector};

use crate::dom::text_of;
use crate::models::Article;

static TITLE: Lazy<Selector> = Lazy::new(|| Selector::parse("title").unwrap());

/// Set the title from the document's `<title>`, if it has one.
pub(super) fn extract(document: &Html, article: &mut Article) {
    article.title = document.root_element().select(&TITLE).next().map(text_of);
}
