//! URL handling module for Crawldex
//!
//! This module provides URL canonicalization and domain extraction. Every
//! URL the crawler touches is reduced to its canonical form before it is
//! compared, queued, fetched or indexed.

mod domain;
mod normalize;

pub use domain::extract_domain;
pub use normalize::{canonical_path, canonicalize, canonicalize_str, parse_http_url};

/// Returns true if two URLs share the same network location
///
/// # Examples
///
/// ```
/// use url::Url;
/// use crawldex::url::same_domain;
///
/// let a = Url::parse("https://a.example/one").unwrap();
/// let b = Url::parse("https://a.example/two").unwrap();
/// let c = Url::parse("https://b.example/page").unwrap();
/// assert!(same_domain(&a, &b));
/// assert!(!same_domain(&a, &c));
/// ```
pub fn same_domain(a: &::url::Url, b: &::url::Url) -> bool {
    match (extract_domain(a), extract_domain(b)) {
        (Some(x), Some(y)) => x == y,
        _ => false,
    }
}
