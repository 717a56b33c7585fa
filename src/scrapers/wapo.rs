//! Washington Post article extraction.

use once_cell::sync::Lazy;
use scraper::{Html, Selector};

use crate::dom::{RemovalRule, TargetTag, prettify, text_of};
use crate::error::RipError;
use crate::models::Article;

pub(super) const NAME: &str = "WAPO";

pub(super) const REMOVE_TAGS: &[RemovalRule] = &[
    // Wrappers for advertisements, occasionally for figures.
    RemovalRule::Target(TargetTag::new("div", &[("class", "cb")])),
    // Links to other articles in the middle of the story.
    RemovalRule::Target(TargetTag::new("p", &[("class", "interstitial")])),
];

static HEADLINE: Lazy<Selector> = Lazy::new(|| Selector::parse("h1.font--headline").unwrap());
static BODY: Lazy<Selector> = Lazy::new(|| Selector::parse("div.article-body").unwrap());
static AUTHORS: Lazy<Selector> = Lazy::new(|| Selector::parse("div.author-names").unwrap());
static AUTHOR_NAME: Lazy<Selector> = Lazy::new(|| Selector::parse("span.author-name").unwrap());
static DISPLAY_DATE: Lazy<Selector> = Lazy::new(|| Selector::parse("div.display-date").unwrap());

pub(super) fn extract(document: &mut Html, article: &mut Article) -> Result<(), RipError> {
    let page = document.root_element();

    let title = page
        .select(&HEADLINE)
        .next()
        .ok_or_else(|| RipError::missing(NAME, "h1.font--headline"))?;
    let body = page
        .select(&BODY)
        .next()
        .ok_or_else(|| RipError::missing(NAME, "div.article-body"))?;

    // The author block is full of tooltip text; only the name spans are wanted.
    let authors = page
        .select(&AUTHORS)
        .next()
        .ok_or_else(|| RipError::missing(NAME, "div.author-names"))?;
    let names: Vec<String> = authors.select(&AUTHOR_NAME).map(text_of).collect();
    let byline = if names.is_empty() {
        "By <Unknown>".to_string()
    } else {
        format!("By {}", names.join(", "))
    };

    let time = page
        .select(&DISPLAY_DATE)
        .next()
        .ok_or_else(|| RipError::missing(NAME, "div.display-date"))?;

    article.title = Some(text_of(title));
    article.body_content = Some(prettify(body));
    article.byline = Some(byline);
    article.time_str = Some(text_of(time));
    Ok(())
}
