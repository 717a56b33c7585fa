//! CNN article extraction.
//!
//! CNN wraps every body paragraph in a `div.zn-body__paragraph` instead of a
//! `p`. Those are renamed to `p` before the body section is serialized so the
//! stored body reads as plain paragraph markup.
//!
//! CNN pages carry no summary; it is stored as an empty string.

use once_cell::sync::Lazy;
use scraper::{Html, Selector};

use crate::dom::{RemovalRule, TargetTag, prettify, retag, text_of};
use crate::error::RipError;
use crate::models::Article;

pub(super) const NAME: &str = "CNN";

pub(super) const REMOVE_TAGS: &[RemovalRule] = &[
    // Ad embeds
    RemovalRule::Target(TargetTag::new("div", &[("class", "ad")])),
    RemovalRule::Target(TargetTag::new("div", &[("class", "el__embedded")])),
    RemovalRule::Target(TargetTag::new("div", &[("class", "el__leafmedia--instagram-aside")])),
    // "Read more" blocks at the end of the story
    RemovalRule::Target(TargetTag::new("div", &[("class", "zn-body__read-more-outbrain")])),
    RemovalRule::Target(TargetTag::new("div", &[("class", "zn-body__read-more")])),
    RemovalRule::Target(TargetTag::new("ul", &[("class", "cn-zoneAdContainer")])),
];

static PARAGRAPH_DIV: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.zn-body__paragraph").unwrap());
static HEADLINE: Lazy<Selector> = Lazy::new(|| Selector::parse("h1.pg-headline").unwrap());
static BODY: Lazy<Selector> = Lazy::new(|| Selector::parse("section#body-text").unwrap());
static BYLINE: Lazy<Selector> =
    Lazy::new(|| Selector::parse("span.metadata__byline__author").unwrap());
static UPDATE_TIME: Lazy<Selector> = Lazy::new(|| Selector::parse("p.update-time").unwrap());

pub(super) fn extract(document: &mut Html, article: &mut Article) -> Result<(), RipError> {
    retag(document, &PARAGRAPH_DIV, "p");
    let page = document.root_element();

    let title = page
        .select(&HEADLINE)
        .next()
        .ok_or_else(|| RipError::missing(NAME, "h1.pg-headline"))?;
    let body = page
        .select(&BODY)
        .next()
        .ok_or_else(|| RipError::missing(NAME, "section#body-text"))?;
    let byline = page
        .select(&BYLINE)
        .next()
        .ok_or_else(|| RipError::missing(NAME, "span.metadata__byline__author"))?;
    let time = page
        .select(&UPDATE_TIME)
        .next()
        .ok_or_else(|| RipError::missing(NAME, "p.update-time"))?;

    article.title = Some(text_of(title));
    article.summary = Some(String::new());
    article.body_content = Some(prettify(body));
    article.byline = Some(text_of(byline));
    article.time_str = Some(text_of(time));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<html><head><title>Story - CNNPolitics</title></head><body>
        <h1 class="pg-headline">Senate passes the bill</h1>
        <div class="metadata">
          <p class="metadata__byline"><span class="metadata__byline__author">By Jane Doe, CNN</span></p>
          <p class="update-time">Updated 9:15 PM ET, Tue March 3, 2020</p>
        </div>
        <section id="body-text">
          <div class="zn-body__paragraph">First paragraph.</div>
          <div class="zn-body__paragraph">Second <a href="/x">link</a>.</div>
        </section>
    </body></html>"#;

    #[test]
    fn test_extract() {
        let mut document = Html::parse_document(PAGE);
        let mut article = Article::new("https://www.cnn.com/2020/03/03/politics/story");
        extract(&mut document, &mut article).unwrap();

        assert_eq!(article.title.as_deref(), Some("Senate passes the bill"));
        assert_eq!(article.summary.as_deref(), Some(""));
        assert_eq!(article.byline.as_deref(), Some("By Jane Doe, CNN"));
        assert_eq!(
            article.time_str.as_deref(),
            Some("Updated 9:15 PM ET, Tue March 3, 2020")
        );

        let body = article.body_content.unwrap();
        assert!(body.starts_with("<section id=\"body-text\">\n"));
        assert!(body.contains(" <p class=\"zn-body__paragraph\">\n  First paragraph.\n </p>"));
        assert!(!body.contains("<div"));
        assert!(body.trim_end().ends_with("</section>"));
    }

    #[test]
    fn test_missing_update_time_is_structure_error() {
        let page = PAGE.replace("update-time", "updated-at");
        let mut document = Html::parse_document(&page);
        let mut article = Article::new("https://www.cnn.com/2020/03/03/politics/story");
        let err = extract(&mut document, &mut article).unwrap_err();
        assert!(matches!(
            err,
            RipError::StructureNotFound { extractor: "CNN", element: "p.update-time" }
        ));
        assert_eq!(article.title, None);
    }
}
