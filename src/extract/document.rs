use serde::{Deserialize, Serialize};

/// Word count above which a page earns a popularity point
const LONG_FORM_WORDS: usize = 500;

/// Highest priority tier; the popularity bonus is `MAX_TIER - priority`
const MAX_TIER: u8 = 3;

/// A normalized, indexable page record
///
/// Field names are the search collection's field names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// `"{domain}:{url}"`, stable across re-crawls
    pub id: String,
    pub url: String,
    pub title: String,
    pub content: String,
    pub domain: String,
    pub path: String,

    /// Unix timestamp (seconds) of extraction
    pub last_crawled: i64,
    pub word_count: usize,
    pub popularity: i32,
    pub headers: Vec<String>,
    pub keywords: Vec<String>,
    pub language: String,
    pub is_pdf: bool,
}

impl Document {
    /// Builds the stable document id
    pub fn make_id(domain: &str, url: &str) -> String {
        format!("{}:{}", domain, url)
    }

    /// Adds the traversal bonus for the tier the URL was enqueued with
    pub fn apply_priority(&mut self, priority: u8) {
        self.popularity += i32::from(MAX_TIER.saturating_sub(priority));
    }
}

/// Counts whitespace-delimited tokens
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Collapses every whitespace run to one space and trims the ends
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Popularity before the traversal bonus
///
/// +1 if the path mentions `blog`, +1 if it mentions `about`, +1 for long-form
/// pages. Path matching is case-insensitive.
pub fn base_popularity(path: &str, word_count: usize) -> i32 {
    let path = path.to_lowercase();
    let mut score = 0;
    if path.contains("blog") {
        score += 1;
    }
    if path.contains("about") {
        score += 1;
    }
    if word_count > LONG_FORM_WORDS {
        score += 1;
    }
    score
}
