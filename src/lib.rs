//! # Newsripper
//!
//! Rips news articles from publisher websites into a uniform [`Article`]
//! record: title, summary, byline, publication time and a cleaned-up HTML
//! body.
//!
//! ## Architecture
//!
//! 1. **Fetching**: download the page and decode it with the right encoding
//!    ([`fetcher`])
//! 2. **Cleaning**: strip ads, media and scripts ([`dom`])
//! 3. **Extraction**: pick the publisher's extractor by domain and read the
//!    fields out of the page ([`scrapers`])
//! 4. **Time parsing**: turn the publisher's free-form time string into UTC
//!    ([`timeparse`])
//!
//! [`pipeline::Ripper`] ties the steps together and [`store::ArticleStore`]
//! keeps the results.

pub mod dom;
pub mod error;
pub mod fetcher;
pub mod models;
pub mod pipeline;
pub mod scrapers;
pub mod store;
pub mod timeparse;
pub mod utils;

pub use dom::{RemovalRule, TargetTag};
pub use error::RipError;
pub use models::{Article, RipType};
pub use pipeline::Ripper;
pub use scrapers::Extractor;
pub use store::ArticleStore;
