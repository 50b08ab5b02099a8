//! Link discovery for fetched HTML pages
//!
//! This module turns the anchors of a page into the set of same-domain,
//! crawlable URLs to offer back to the frontier, each tagged with a traversal
//! priority tier.

use crate::url::{canonicalize, same_domain};
use scraper::{Html, Selector};
use std::collections::HashSet;
use url::Url;

/// File extensions that never lead to indexable content
pub const BANNED_EXTENSIONS: &[&str] = &[
    ".xml", ".atom", ".png", ".json", ".jpg", ".jpeg", ".gif", ".svg", ".webp", ".bmp", ".ico",
    ".zip", ".tar", ".gz", ".exe", ".dmg", ".mp3", ".mp4", ".avi", ".mov",
];

/// Path segment used by Cloudflare's email obfuscation
const EMAIL_PROTECTION_MARKER: &str = "/cdn-cgi/l/email-protection";

/// Path keywords and their tiers, checked in order; the first keyword
/// contained anywhere in the lowercase path wins
const PRIORITY_KEYWORDS: &[(&str, u8)] = &[
    ("index", 0),
    ("home", 0),
    ("about", 1),
    ("contact", 1),
    ("blog", 2),
    ("articles", 2),
    ("docs", 2),
];

/// Tier assigned to paths that match no keyword
pub const DEFAULT_PRIORITY: u8 = 3;

/// A crawlable link found on a page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredLink {
    /// Canonical absolute URL
    pub url: String,

    /// Priority tier (lower is fetched earlier within a wave)
    pub priority: u8,
}

/// Classifies a URL path into a priority tier
///
/// # Examples
///
/// ```
/// use crawldex::crawler::priority_tier;
///
/// assert_eq!(priority_tier("/"), 3);
/// assert_eq!(priority_tier("/About-Us"), 1);
/// assert_eq!(priority_tier("/blog/post"), 2);
/// assert_eq!(priority_tier("/home/blog"), 0);
/// ```
pub fn priority_tier(path: &str) -> u8 {
    let path = path.to_lowercase();
    PRIORITY_KEYWORDS
        .iter()
        .find(|(keyword, _)| path.contains(keyword))
        .map(|(_, tier)| *tier)
        .unwrap_or(DEFAULT_PRIORITY)
}

/// Discovers crawlable links in an HTML page
///
/// # Link Rules
///
/// **Include:** every `<a href="...">`, resolved against `base_url` and
/// reduced to canonical form.
///
/// **Exclude:**
/// - `mailto:` and `javascript:` hrefs
/// - URLs ending in a [`BANNED_EXTENSIONS`] entry
/// - Cloudflare email-protection links
/// - Schemes other than `http`/`https`
/// - URLs whose network location differs from `scope`'s
///
/// The result holds each URL once (first occurrence) and is stably sorted
/// by ascending priority tier.
///
/// # Arguments
///
/// * `base_url` - The URL the page was served from
/// * `html` - The page body
/// * `scope` - The seed URL defining the crawl's domain
///
/// # Example
///
/// ```
/// use crawldex::crawler::discover;
/// use url::Url;
///
/// let base = Url::parse("https://a.example/").unwrap();
/// let html = r#"<a href="/other">x</a><a href="https://b.example/page">y</a>"#;
/// let links = discover(&base, html, &base);
/// assert_eq!(links.len(), 1);
/// assert_eq!(links[0].url, "https://a.example/other");
/// ```
pub fn discover(base_url: &Url, html: &str, scope: &Url) -> Vec<DiscoveredLink> {
    let document = Html::parse_document(html);
    discover_in(&document, base_url, scope)
}

/// Discovers crawlable links in an already parsed document
pub fn discover_in(document: &Html, base_url: &Url, scope: &Url) -> Vec<DiscoveredLink> {
    let mut links = Vec::new();
    let mut seen = HashSet::new();

    if let Ok(a_selector) = Selector::parse("a[href]") {
        for element in document.select(&a_selector) {
            if let Some(href) = element.value().attr("href") {
                if let Some(link) = resolve_link(href, base_url, scope) {
                    if seen.insert(link.url.clone()) {
                        links.push(link);
                    }
                }
            }
        }
    }

    links.sort_by_key(|link| link.priority);
    links
}

/// Resolves an href to a canonical, in-scope, crawlable link
///
/// Returns None if the link should be excluded.
fn resolve_link(href: &str, base_url: &Url, scope: &Url) -> Option<DiscoveredLink> {
    let href = href.trim();

    let lowered_href = href.to_ascii_lowercase();
    if lowered_href.starts_with("mailto:") || lowered_href.starts_with("javascript:") {
        return None;
    }

    let absolute = base_url.join(href).ok()?;
    if absolute.scheme() != "http" && absolute.scheme() != "https" {
        return None;
    }

    if !same_domain(&absolute, scope) {
        return None;
    }

    let canonical = canonicalize(&absolute);
    if has_banned_extension(&canonical) || canonical.contains(EMAIL_PROTECTION_MARKER) {
        return None;
    }

    Some(DiscoveredLink {
        priority: priority_tier(absolute.path()),
        url: canonical,
    })
}

/// Returns true if the URL ends with a non-content file extension
pub fn has_banned_extension(url: &str) -> bool {
    let lowered = url.to_ascii_lowercase();
    BANNED_EXTENSIONS.iter().any(|ext| lowered.ends_with(ext))
}
