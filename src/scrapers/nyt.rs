//! New York Times article extraction.
//!
//! The byline and the publication `<time>` elements sit under a shared
//! ancestor rather than next to each other, so the time string is found by
//! walking up from the byline until some ancestor contains `time` elements.

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

use crate::dom::{PARAGRAPHS_AND_HEADERS, join_markup, text_of};
use crate::error::RipError;
use crate::models::Article;

pub(super) const NAME: &str = "NYT";

static HEADLINE: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"h1[itemprop="headline"]"#).unwrap());
static SUMMARY: Lazy<Selector> = Lazy::new(|| Selector::parse("p#article-summary").unwrap());
static BODY_SECTION: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"section[name="articleBody"]"#).unwrap());
static COMPANION_COLUMN: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.StoryBodyCompanionColumn").unwrap());
static PARAGRAPHS: Lazy<Selector> = Lazy::new(|| Selector::parse(PARAGRAPHS_AND_HEADERS).unwrap());
static AUTHOR: Lazy<Selector> = Lazy::new(|| Selector::parse(r#"p[itemprop="author"]"#).unwrap());
static TIME: Lazy<Selector> = Lazy::new(|| Selector::parse("time").unwrap());

pub(super) fn extract(document: &mut Html, article: &mut Article) -> Result<(), RipError> {
    let page = document.root_element();

    let title = page
        .select(&HEADLINE)
        .next()
        .ok_or_else(|| RipError::missing(NAME, "h1[itemprop=headline]"))?;
    let summary = page.select(&SUMMARY).next().map(text_of);

    let body_section = page
        .select(&BODY_SECTION)
        .next()
        .ok_or_else(|| RipError::missing(NAME, "section[name=articleBody]"))?;
    let body = join_markup(
        body_section
            .select(&COMPANION_COLUMN)
            .flat_map(|column| column.select(&PARAGRAPHS)),
    );

    let byline = page
        .select(&AUTHOR)
        .next()
        .ok_or_else(|| RipError::missing(NAME, "p[itemprop=author]"))?;

    article.title = Some(text_of(title));
    if summary.is_some() {
        article.summary = summary;
    }
    article.body_content = Some(body);
    article.byline = Some(text_of(byline));
    article.time_str = Some(time_near(byline));
    Ok(())
}

/// Space-joined text of the `time` elements under the byline's nearest
/// ancestor that has any. Empty when no ancestor does.
fn time_near(byline: ElementRef<'_>) -> String {
    byline
        .ancestors()
        .filter_map(ElementRef::wrap)
        .map(|parent| parent.select(&TIME).map(text_of).collect::<Vec<_>>())
        .find(|times| !times.is_empty())
        .map(|times| times.join(" "))
        .unwrap_or_default()
}
