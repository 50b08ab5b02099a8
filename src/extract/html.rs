//! HTML content extraction
//!
//! Pulls the title, headings, keywords, language and visible text out of a
//! parsed page. Parsing itself is left to the caller so the same tree can be
//! reused for link discovery.

use super::document::collapse_whitespace;
use super::Extracted;
use crate::url::canonicalize;
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Subtrees that never contribute visible text
const NON_CONTENT_TAGS: &[&str] = &[
    "script", "style", "nav", "footer", "header", "iframe", "noscript",
];

/// Heading tags; their text is reported separately as `headers`
const HEADING_TAGS: &[&str] = &["h1", "h2", "h3", "h4", "h5", "h6"];

const DEFAULT_LANGUAGE: &str = "en";

/// Extracts the indexable parts of an HTML page
pub(crate) fn extract_html(url: &Url, document: &Html) -> Extracted {
    Extracted {
        title: extract_title(document).unwrap_or_else(|| canonicalize(url)),
        content: extract_visible_text(document),
        headers: extract_headings(document),
        keywords: extract_keywords(document),
        language: extract_language(document),
        is_pdf: false,
    }
}

fn extract_title(document: &Html) -> Option<String> {
    let selector = Selector::parse("title").ok()?;
    document
        .select(&selector)
        .next()
        .map(|title| collapse_whitespace(&title.text().collect::<String>()))
        .filter(|title| !title.is_empty())
}

fn extract_headings(document: &Html) -> Vec<String> {
    let Ok(selector) = Selector::parse("h1, h2, h3, h4, h5, h6") else {
        return Vec::new();
    };

    document
        .select(&selector)
        .map(|heading| collapse_whitespace(&heading.text().collect::<String>()))
        .filter(|text| !text.is_empty())
        .collect()
}

fn extract_keywords(document: &Html) -> Vec<String> {
    let Ok(selector) = Selector::parse("meta[name][content]") else {
        return Vec::new();
    };

    document
        .select(&selector)
        .find(|meta| {
            meta.value()
                .attr("name")
                .is_some_and(|name| name.eq_ignore_ascii_case("keywords"))
        })
        .and_then(|meta| meta.value().attr("content"))
        .map(|content| {
            content
                .split(',')
                .map(str::trim)
                .filter(|k| !k.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn extract_language(document: &Html) -> String {
    document
        .root_element()
        .value()
        .attr("lang")
        .map(|lang| lang.trim().chars().take(2).collect::<String>().to_lowercase())
        .filter(|lang| !lang.is_empty())
        .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string())
}

/// Visible text of `<body>` (or the whole document when there is none)
fn extract_visible_text(document: &Html) -> String {
    let root = Selector::parse("body")
        .ok()
        .and_then(|body| document.select(&body).next())
        .unwrap_or_else(|| document.root_element());

    let mut pieces = Vec::new();
    collect_text(root, &mut pieces);
    pieces.join(" ")
}

fn collect_text(element: ElementRef<'_>, pieces: &mut Vec<String>) {
    for child in element.children() {
        if let Some(text) = child.value().as_text() {
            let text = collapse_whitespace(text);
            if !text.is_empty() {
                pieces.push(text);
            }
        } else if let Some(child) = ElementRef::wrap(child) {
            let tag = child.value().name();
            if !NON_CONTENT_TAGS.contains(&tag) && !HEADING_TAGS.contains(&tag) {
                collect_text(child, pieces);
            }
        }
    }
}
