//! Politico article extraction.
//!
//! Politico has served two page layouts. Each field tries the newer
//! structure first and falls back to the older one.

use once_cell::sync::Lazy;
use scraper::{Html, Selector};

use crate::dom::{
    RemovalRule, TargetTag, first_match, first_nonempty, join_markup, selectors, text_of,
};
use crate::error::RipError;
use crate::models::Article;

pub(super) const NAME: &str = "POLITICO";

pub(super) const REMOVE_TAGS: &[RemovalRule] = &[
    // The top bar sits in the middle of the story markup.
    RemovalRule::Target(TargetTag::new("div", &[("class", "pop-up-bar")])),
    RemovalRule::Target(TargetTag::new("section", &[("class", "below-article-section")])),
    RemovalRule::Target(TargetTag::new("section", &[("class", "comments-section")])),
    RemovalRule::Tag("section[data-ad-section]"),
    RemovalRule::Target(TargetTag::new("div", &[("class", "ad")])),
];

static HEADLINE: Lazy<Vec<Selector>> =
    Lazy::new(|| selectors(&["h2.headline", r#"span[itemprop="headline"]"#]));
static DEK: Lazy<Selector> = Lazy::new(|| Selector::parse("p.dek").unwrap());
static PARAGRAPHS: Lazy<Vec<Selector>> = Lazy::new(|| {
    selectors(&["p.story-text__paragraph", "p:not(.byline):not(.timestamp)"])
});
static BYLINE: Lazy<Vec<Selector>> =
    Lazy::new(|| selectors(&["p.story-meta__authors", "p.byline"]));
static TIMESTAMP: Lazy<Vec<Selector>> = Lazy::new(|| {
    selectors(&["p.story-meta__timestamp", r#"time[itemprop="datePublished"]"#])
});

pub(super) fn extract(document: &mut Html, article: &mut Article) -> Result<(), RipError> {
    let document = &*document;

    let title = first_match(document, &HEADLINE)
        .ok_or_else(|| RipError::missing(NAME, "h2.headline | span[itemprop=headline]"))?;
    let summary = document.root_element().select(&DEK).next().map(text_of);
    let body = join_markup(first_nonempty(document, &PARAGRAPHS));
    let byline = first_match(document, &BYLINE)
        .ok_or_else(|| RipError::missing(NAME, "p.story-meta__authors | p.byline"))?;
    let time = first_match(document, &TIMESTAMP).ok_or_else(|| {
        RipError::missing(NAME, "p.story-meta__timestamp | time[itemprop=datePublished]")
    })?;

    article.title = Some(text_of(title));
    if summary.is_some() {
        article.summary = summary;
    }
    article.body_content = Some(body);
    article.byline = Some(text_of(byline));
    article.time_str = Some(text_of(time));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const CURRENT: &str = r#"<html><head><title>Story - POLITICO</title></head><body>
        <h2 class="headline">Primary night results</h2>
        <p class="dek">Who won where.</p>
        <p class="story-meta__authors">By Cara Lee</p>
        <p class="story-meta__timestamp">03/03/2020 09:15 PM EST</p>
        <p class="story-text__paragraph">One.</p>
        <p class="story-text__paragraph">Two.</p>
        <p class="footer">Not story text.</p>
    </body></html>"#;

    const LEGACY: &str = r#"<html><head><title>Story - POLITICO</title></head><body>
        <span itemprop="headline">Old layout headline</span>
        <p class="byline">By Dan Park</p>
        <p class="timestamp"><time itemprop="datePublished">March 3, 2020</time></p>
        <p>Alpha.</p>
        <p>Beta.</p>
    </body></html>"#;

    #[test]
    fn test_extract_current_layout() {
        let mut document = Html::parse_document(CURRENT);
        let mut article = Article::new("https://www.politico.com/news/2020/03/03/x");
        extract(&mut document, &mut article).unwrap();

        assert_eq!(article.title.as_deref(), Some("Primary night results"));
        assert_eq!(article.summary.as_deref(), Some("Who won where."));
        assert_eq!(article.byline.as_deref(), Some("By Cara Lee"));
        assert_eq!(article.time_str.as_deref(), Some("03/03/2020 09:15 PM EST"));
        assert_eq!(
            article.body_content.as_deref(),
            Some(
                "<p class=\"story-text__paragraph\">One.</p>\n\
                 <p class=\"story-text__paragraph\">Two.</p>"
            )
        );
    }

    #[test]
    fn test_extract_legacy_layout() {
        let mut document = Html::parse_document(LEGACY);
        let mut article = Article::new("https://www.politico.com/story/2019/01/01/x");
        extract(&mut document, &mut article).unwrap();

        assert_eq!(article.title.as_deref(), Some("Old layout headline"));
        assert_eq!(article.summary, None);
        assert_eq!(article.byline.as_deref(), Some("By Dan Park"));
        assert_eq!(article.time_str.as_deref(), Some("March 3, 2020"));
        assert_eq!(article.body_content.as_deref(), Some("<p>Alpha.</p>\n<p>Beta.</p>"));
    }

    #[test]
    fn test_missing_both_headlines() {
        let page = LEGACY.replace("itemprop=\"headline\"", "class=\"kicker\"");
        let mut document = Html::parse_document(&page);
        let mut article = Article::new("https://www.politico.com/story/x");
        let err = extract(&mut document, &mut article).unwrap_err();
        assert!(matches!(err, RipError::StructureNotFound { extractor: "POLITICO", .. }));
    }
}
