//! Content extraction
//!
//! Turns one fetched response into a normalized [`Document`]. The kind of
//! content is decided once per response as a [`ContentKind`]; every later
//! branch matches on that variant.
//!
//! # Example
//!
//! ```
//! use crawldex::extract::ContentKind;
//!
//! assert_eq!(ContentKind::detect("https://a.example/", Some("text/html")), ContentKind::Html);
//! assert_eq!(ContentKind::detect("https://a.example/r.PDF", None), ContentKind::Pdf);
//! assert_eq!(ContentKind::detect("mailto:x@a.example", None), ContentKind::Skipped);
//! ```

mod document;
mod html;
mod pdf;

pub use document::{base_popularity, word_count, Document};

use crate::crawler::FetchedPage;
use crate::url::{canonical_path, canonicalize, extract_domain};
use scraper::Html;
use thiserror::Error;
use url::Url;

/// Content types that are never parsed for text
const SKIPPED_MEDIA_TYPES: &[&str] = &["image", "audio", "video", "font"];

/// The kind of content a response carries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    Html,
    Pdf,
    /// Rejected scheme or non-text media; produces no document
    Skipped,
}

impl ContentKind {
    /// Classifies a response from its URL and `Content-Type` header
    ///
    /// `mailto:` and `javascript:` URLs are skipped. A PDF content type or a
    /// `.pdf` path (case-insensitive) means PDF. Image, audio, video and font
    /// content types are skipped. Everything else is treated as HTML.
    pub fn detect(url: &str, content_type: Option<&str>) -> Self {
        let url = url.trim().to_ascii_lowercase();
        if url.starts_with("mailto:") || url.starts_with("javascript:") {
            return Self::Skipped;
        }

        let content_type = content_type.unwrap_or_default().to_ascii_lowercase();
        let path = url.split(['?', '#']).next().unwrap_or_default();
        if content_type.contains("application/pdf") || path.ends_with(".pdf") {
            return Self::Pdf;
        }

        let major = content_type.split('/').next().unwrap_or_default().trim();
        if SKIPPED_MEDIA_TYPES.contains(&major) {
            return Self::Skipped;
        }

        Self::Html
    }
}

/// Errors from content extraction
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("PDF read failure: {0}")]
    Pdf(String),

    #[error("Unsupported content: {0}")]
    Unsupported(String),
}

/// Fields common to every content kind, before URL-derived fields are added
#[derive(Debug)]
pub(crate) struct Extracted {
    pub title: String,
    pub content: String,
    pub headers: Vec<String>,
    pub keywords: Vec<String>,
    pub language: String,
    pub is_pdf: bool,
}

impl Extracted {
    fn into_document(self, url: &Url) -> Document {
        let canonical = canonicalize(url);
        let domain = extract_domain(url).unwrap_or_default();
        let path = canonical_path(url);
        let word_count = word_count(&self.content);

        Document {
            id: Document::make_id(&domain, &canonical),
            popularity: base_popularity(&path, word_count),
            last_crawled: chrono::Utc::now().timestamp(),
            url: canonical,
            title: self.title,
            content: self.content,
            domain,
            path,
            word_count,
            headers: self.headers,
            keywords: self.keywords,
            language: self.language,
            is_pdf: self.is_pdf,
        }
    }
}

/// Builds a document from an already parsed HTML page
pub fn document_from_html(url: &Url, document: &Html) -> Document {
    html::extract_html(url, document).into_document(url)
}

/// Builds a document from PDF bytes
pub fn document_from_pdf(url: &Url, bytes: &[u8]) -> Result<Document, ExtractError> {
    Ok(pdf::extract_pdf(url, bytes)?.into_document(url))
}

/// A response after extraction
///
/// The parsed HTML tree is kept so links can be discovered without parsing
/// the page a second time. It is `None` for PDFs and skipped content.
pub struct ExtractedPage {
    pub document: Result<Document, ExtractError>,
    pub html: Option<Html>,
}

impl ExtractedPage {
    /// Takes the document, logging why there is none
    pub fn into_document(self, url: &str) -> Option<Document> {
        match self.document {
            Ok(document) => Some(document),
            Err(ExtractError::Unsupported(reason)) => {
                tracing::debug!("Skipping {}: {}", url, reason);
                None
            }
            Err(e) => {
                tracing::warn!("Failed to extract {}: {}", url, e);
                None
            }
        }
    }
}

/// Classifies a fetched response and extracts its document
pub fn extract_page(url: &Url, page: &FetchedPage) -> ExtractedPage {
    match ContentKind::detect(url.as_str(), page.content_type.as_deref()) {
        ContentKind::Html => {
            let html = Html::parse_document(&page.text());
            ExtractedPage {
                document: Ok(document_from_html(url, &html)),
                html: Some(html),
            }
        }
        ContentKind::Pdf => ExtractedPage {
            document: document_from_pdf(url, &page.body),
            html: None,
        },
        ContentKind::Skipped => ExtractedPage {
            document: Err(ExtractError::Unsupported(
                page.content_type
                    .clone()
                    .unwrap_or_else(|| "rejected scheme".to_string()),
            )),
            html: None,
        },
    }
}

/// Extracts a document from a fetched response
///
/// Failures are logged and reported as `None`; they never propagate.
///
/// # Arguments
///
/// * `url` - The URL the page was requested as
/// * `page` - The fetched response
pub fn extract(url: &str, page: &FetchedPage) -> Option<Document> {
    match Url::parse(url) {
        Ok(parsed) => extract_page(&parsed, page).into_document(url),
        Err(e) => {
            tracing::debug!("Skipping {}: {}", url, e);
            None
        }
    }
}
