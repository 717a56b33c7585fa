//! The Hill article extraction.
//!
//! Byline and date share one element, so the date is read from its child
//! and then cut out of the byline text. The story text lives in a nested
//! `div.field-item` whose first `div` holds the summary.

use once_cell::sync::Lazy;
use scraper::{Html, Selector};

use crate::dom::{PARAGRAPHS_AND_HEADERS, RemovalRule, TargetTag, join_markup, text_of};
use crate::error::RipError;
use crate::models::Article;

pub(super) const NAME: &str = "HILL";

pub(super) const REMOVE_TAGS: &[RemovalRule] = &[RemovalRule::Target(TargetTag::new(
    "span",
    &[("class", "rollover-people-block")],
))];

static HEADLINE: Lazy<Selector> = Lazy::new(|| Selector::parse("h1#page-title").unwrap());
static SUBMITTED_BY: Lazy<Selector> = Lazy::new(|| Selector::parse("span.submitted-by").unwrap());
static SUBMITTED_DATE: Lazy<Selector> =
    Lazy::new(|| Selector::parse("span.submitted-date").unwrap());
static BODY: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("article.node-article div.field-name-body div.field-item").unwrap()
});
static FIRST_DIV: Lazy<Selector> = Lazy::new(|| Selector::parse("div:first-child").unwrap());
static PARAGRAPHS: Lazy<Selector> = Lazy::new(|| Selector::parse(PARAGRAPHS_AND_HEADERS).unwrap());

pub(super) fn extract(document: &mut Html, article: &mut Article) -> Result<(), RipError> {
    let page = document.root_element();

    let title = page
        .select(&HEADLINE)
        .next()
        .ok_or_else(|| RipError::missing(NAME, "h1#page-title"))?;

    let submitted = page
        .select(&SUBMITTED_BY)
        .next()
        .ok_or_else(|| RipError::missing(NAME, "span.submitted-by"))?;
    let time_str = submitted
        .select(&SUBMITTED_DATE)
        .next()
        .map(text_of)
        .ok_or_else(|| RipError::missing(NAME, "span.submitted-date"))?;
    let byline = text_of(submitted)
        .replace(&time_str, "")
        .trim_matches(|c: char| c == '-' || c == ' ')
        .to_string();

    let body = page
        .select(&BODY)
        .next()
        .ok_or_else(|| RipError::missing(NAME, "div.field-name-body div.field-item"))?;
    let summary = body
        .select(&FIRST_DIV)
        .next()
        .map(text_of)
        .ok_or_else(|| RipError::missing(NAME, "div.field-item div:first-child"))?;

    article.title = Some(text_of(title));
    article.time_str = Some(time_str);
    article.byline = Some(byline);
    article.summary = Some(summary);
    article.body_content = Some(join_markup(body.select(&PARAGRAPHS)));
    Ok(())
}
