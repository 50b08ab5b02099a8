use crate::{UrlError, UrlResult};
use url::Url;

/// Reduces a URL to the canonical form used as the crawl's deduplication key
///
/// # Canonicalization Rules
///
/// 1. Scheme and host are kept (the host is already lowercased by parsing)
/// 2. Userinfo is dropped
/// 3. A non-default port is kept
/// 4. Trailing slashes on the path are removed (the site root becomes empty)
/// 5. The query string is kept verbatim; an empty query is dropped
/// 6. The fragment is removed
///
/// The same string is used as the visited-set key, the fetch target and the
/// indexed document URL, so `?query` variants of a path are distinct pages
/// while `/docs` and `/docs/` are the same page.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use crawldex::url::canonicalize;
///
/// let url = Url::parse("https://Example.com/docs/?page=2#top").unwrap();
/// assert_eq!(canonicalize(&url), "https://example.com/docs?page=2");
/// ```
pub fn canonicalize(url: &Url) -> String {
    let mut canonical = String::with_capacity(url.as_str().len());
    canonical.push_str(url.scheme());
    canonical.push_str("://");

    if let Some(host) = url.host_str() {
        canonical.push_str(host);
    }

    if let Some(port) = url.port() {
        canonical.push(':');
        canonical.push_str(&port.to_string());
    }

    canonical.push_str(url.path().trim_end_matches('/'));

    if let Some(query) = url.query().filter(|q| !q.is_empty()) {
        canonical.push('?');
        canonical.push_str(query);
    }

    canonical
}

/// Parses a URL string and returns its canonical form
///
/// Only `http` and `https` URLs are accepted; `mailto:`, `javascript:` and
/// every other scheme are rejected before anything is fetched.
///
/// # Arguments
///
/// * `url_str` - The URL string to canonicalize
///
/// # Returns
///
/// * `Ok(String)` - The canonical URL
/// * `Err(UrlError)` - The URL is malformed, has no host, or has an unsupported scheme
pub fn canonicalize_str(url_str: &str) -> UrlResult<String> {
    let url = parse_http_url(url_str)?;
    Ok(canonicalize(&url))
}

/// Parses a URL string, accepting only absolute `http`/`https` URLs with a host
pub fn parse_http_url(url_str: &str) -> UrlResult<Url> {
    let url = Url::parse(url_str.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(UrlError::MissingDomain);
    }

    Ok(url)
}

/// Returns the canonical path of a URL as stored on a document
///
/// Trailing slashes are removed; the site root is reported as `/`.
pub fn canonical_path(url: &Url) -> String {
    let path = url.path().trim_end_matches('/');
    if path.is_empty() {
        "/".to_string()
    } else {
        path.to_string()
    }
}
