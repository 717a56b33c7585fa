//! Document-tree helpers shared by the fetcher and the extractors.
//!
//! [`scraper`] is read-oriented, so the in-place edits the pipeline needs
//! (removing subtrees, renaming elements, rewriting anchors) go through the
//! document's underlying tree by node id.
//!
//! Detached nodes stay in the tree's arena, and [`Html::select`] walks the
//! whole arena, so every document-level query here starts from
//! [`Html::root_element`] to see only what is still attached.
//!
//! Serialization comes in two shapes, both valid for `body_content`:
//! - [`join_markup`]: each element's outer HTML, newline-joined
//! - [`prettify`]: one element rendered with one node per line, indented

use html_escape::{encode_double_quoted_attribute, encode_text};
use itertools::Itertools;
use once_cell::sync::Lazy;
use scraper::node::Element;
use scraper::{ElementRef, Html, Node, Selector};
use std::fmt::Write;
use tracing::debug;

use crate::error::RipError;

/// Paragraph and heading tags, in the order body content keeps them.
pub const PARAGRAPHS_AND_HEADERS: &str = "p, h1, h2, h3, h4, h5, h6";

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

static ANCHOR: Lazy<Selector> = Lazy::new(|| Selector::parse("a").unwrap());

/// An element to delete: a tag name plus attribute constraints.
///
/// `class` constraints match on class membership, any other attribute on
/// exact value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetTag {
    pub tag_name: &'static str,
    pub attrs: &'static [(&'static str, &'static str)],
}

impl TargetTag {
    pub const fn new(tag_name: &'static str, attrs: &'static [(&'static str, &'static str)]) -> Self {
        TargetTag { tag_name, attrs }
    }

    /// Render as an equivalent CSS selector, e.g. `div[class~="ad"]`.
    pub fn to_css(&self) -> String {
        let mut css = self.tag_name.to_string();
        for (name, value) in self.attrs {
            let op = if *name == "class" { "~=" } else { "=" };
            let value = value.replace('\\', "\\\\").replace('"', "\\\"");
            let _ = write!(css, "[{name}{op}\"{value}\"]");
        }
        css
    }
}

/// One removal rule, applied before extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemovalRule {
    /// A bare tag name (or any CSS selector, e.g. `section[data-ad-section]`).
    Tag(&'static str),
    Target(TargetTag),
}

impl RemovalRule {
    pub fn selector(&self) -> Result<Selector, RipError> {
        let css = match self {
            RemovalRule::Tag(css) => css.to_string(),
            RemovalRule::Target(target) => target.to_css(),
        };
        Selector::parse(&css).map_err(|_| RipError::Selector(css.clone()))
    }
}

/// Parse a list of static selectors. Only for literals known to be valid.
pub(crate) fn selectors(list: &[&str]) -> Vec<Selector> {
    list.iter().map(|css| Selector::parse(css).unwrap()).collect()
}

/// Delete every element matched by any rule, subtree included.
///
/// Rules are applied in order. A match nested inside an earlier match is
/// already gone with its parent, which is harmless. Returns how many
/// elements were matched.
pub fn remove_tags(document: &mut Html, rules: &[RemovalRule]) -> Result<usize, RipError> {
    let mut removed = 0;
    for rule in rules {
        let selector = rule.selector()?;
        removed += remove_matching(document, &selector);
    }
    debug!(rules = rules.len(), removed, "Removed tags");
    Ok(removed)
}

/// Detach every element matching `selector` from the document.
pub fn remove_matching(document: &mut Html, selector: &Selector) -> usize {
    let ids: Vec<_> = document
        .root_element()
        .select(selector)
        .map(|el| el.id())
        .collect();
    for id in &ids {
        if let Some(mut node) = document.tree.get_mut(*id) {
            node.detach();
        }
    }
    ids.len()
}

/// Rename every element matching `selector` to `tag`, keeping attributes
/// and children.
pub fn retag(document: &mut Html, selector: &Selector, tag: &str) -> usize {
    let ids: Vec<_> = document
        .root_element()
        .select(selector)
        .map(|el| el.id())
        .collect();
    for id in &ids {
        if let Some(mut node) = document.tree.get_mut(*id) {
            if let Node::Element(element) = node.value() {
                element.name.local = tag.into();
            }
        }
    }
    ids.len()
}

/// Force every anchor to open in a new tab without passing rank or referrer.
pub fn adjust_anchors(document: &mut Html) -> usize {
    let rewrites: Vec<_> = document
        .root_element()
        .select(&ANCHOR)
        .filter_map(|a| rewritten_anchor(a.value()).map(|el| (a.id(), el)))
        .collect();
    for (id, element) in &rewrites {
        if let Some(mut node) = document.tree.get_mut(*id) {
            *node.value() = Node::Element(element.clone());
        }
    }
    rewrites.len()
}

fn rewritten_anchor(anchor: &Element) -> Option<Element> {
    let mut tag = String::from("<a");
    for (name, value) in anchor.attrs() {
        if name == "target" || name == "rel" {
            continue;
        }
        let _ = write!(tag, " {}=\"{}\"", name, encode_double_quoted_attribute(value));
    }
    tag.push_str(" target=\"_blank\" rel=\"nofollow noreferrer\"></a>");
    let fragment = Html::parse_fragment(&tag);
    fragment.select(&ANCHOR).next().map(|a| a.value().clone())
}

/// First element matched by the earliest selector in `choices` that matches
/// anything.
pub fn first_match<'a>(document: &'a Html, choices: &[Selector]) -> Option<ElementRef<'a>> {
    choices
        .iter()
        .find_map(|selector| document.root_element().select(selector).next())
}

/// All elements matched by the earliest selector in `choices` that matches
/// anything; empty if none do.
pub fn first_nonempty<'a>(document: &'a Html, choices: &[Selector]) -> Vec<ElementRef<'a>> {
    for selector in choices {
        let found: Vec<_> = document.root_element().select(selector).collect();
        if !found.is_empty() {
            return found;
        }
    }
    Vec::new()
}

/// Concatenated text of an element and its descendants.
pub fn text_of(element: ElementRef<'_>) -> String {
    element.text().collect()
}

/// Outer HTML of each element, newline-joined.
pub fn join_markup<'a>(elements: impl IntoIterator<Item = ElementRef<'a>>) -> String {
    elements.into_iter().map(|el| el.html()).join("\n")
}

/// Render an element one node per line, children indented by one space.
///
/// Whitespace-only text is dropped and other text is trimmed.
pub fn prettify(element: ElementRef<'_>) -> String {
    let mut out = String::new();
    write_pretty(element, 0, &mut out);
    out
}

fn write_pretty(element: ElementRef<'_>, depth: usize, out: &mut String) {
    let el = element.value();
    let name = el.name();
    let indent = " ".repeat(depth);

    out.push_str(&indent);
    out.push('<');
    out.push_str(name);
    for (attr, value) in el.attrs() {
        let _ = write!(out, " {}=\"{}\"", attr, encode_double_quoted_attribute(value));
    }
    if VOID_ELEMENTS.contains(&name) {
        out.push_str("/>\n");
        return;
    }
    out.push_str(">\n");

    for child in element.children() {
        match child.value() {
            Node::Element(_) => {
                if let Some(child_el) = ElementRef::wrap(child) {
                    write_pretty(child_el, depth + 1, out);
                }
            }
            Node::Text(text) => {
                let trimmed = text.trim();
                if !trimmed.is_empty() {
                    let _ = writeln!(out, "{} {}", indent, encode_text(trimmed));
                }
            }
            Node::Comment(comment) => {
                let _ = writeln!(out, "{} <!--{}-->", indent, &**comment);
            }
            _ => {}
        }
    }

    let _ = writeln!(out, "{}</{}>", indent, name);
}
