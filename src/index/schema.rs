use serde_json::{json, Value};

/// Field used for the collection's default relevance ordering
pub const DEFAULT_SORTING_FIELD: &str = "popularity";

/// Builds the Typesense collection schema for crawled documents
pub fn collection_schema(name: &str) -> Value {
    json!({
        "name": name,
        "fields": [
            { "name": "id", "type": "string" },
            { "name": "url", "type": "string" },
            { "name": "title", "type": "string", "sort": true },
            { "name": "content", "type": "string" },
            { "name": "domain", "type": "string", "facet": true },
            { "name": "last_crawled", "type": "int64", "sort": true },
            { "name": "path", "type": "string", "facet": true },
            { "name": "word_count", "type": "int32", "sort": true },
            { "name": "popularity", "type": "int32", "sort": true },
            { "name": "headers", "type": "string[]", "optional": true },
            { "name": "keywords", "type": "string[]", "optional": true },
            { "name": "language", "type": "string", "facet": true },
            { "name": "is_pdf", "type": "bool", "facet": true },
        ],
        "default_sorting_field": DEFAULT_SORTING_FIELD,
    })
}
