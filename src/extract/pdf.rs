//! PDF text extraction
//!
//! Text comes from pdf-extract; the title comes from the document's Info
//! dictionary via lopdf. Both parsers can panic on malformed input, so every
//! call is isolated with `catch_unwind`.

use super::document::collapse_whitespace;
use super::{ExtractError, Extracted};
use lopdf::Object;
use std::panic;
use url::Url;

/// Extracts the indexable parts of a PDF document
pub(crate) fn extract_pdf(url: &Url, bytes: &[u8]) -> Result<Extracted, ExtractError> {
    let text = panic::catch_unwind(|| pdf_extract::extract_text_from_mem(bytes))
        .map_err(|_| ExtractError::Pdf("parser panicked".to_string()))?
        .map_err(|e| ExtractError::Pdf(e.to_string()))?;

    let title = read_title(bytes).unwrap_or_else(|| title_from_path(url));

    Ok(Extracted {
        title,
        content: collapse_whitespace(&text),
        headers: Vec::new(),
        keywords: Vec::new(),
        language: "en".to_string(),
        is_pdf: true,
    })
}

/// Reads `/Title` from the trailer's Info dictionary
fn read_title(bytes: &[u8]) -> Option<String> {
    panic::catch_unwind(|| {
        let document = lopdf::Document::load_mem(bytes).ok()?;
        info_title(&document)
    })
    .ok()
    .flatten()
}

fn info_title(document: &lopdf::Document) -> Option<String> {
    let info = match document.trailer.get(b"Info").ok()? {
        Object::Reference(id) => document.get_object(*id).ok()?.as_dict().ok()?,
        Object::Dictionary(dict) => dict,
        _ => return None,
    };

    let raw = info.get(b"Title").ok()?.as_str().ok()?;
    let title = collapse_whitespace(&decode_pdf_string(raw));
    (!title.is_empty()).then_some(title)
}

/// Decodes a PDF text string: UTF-16BE with a byte-order mark, otherwise
/// one byte per character
fn decode_pdf_string(raw: &[u8]) -> String {
    match raw {
        [0xFE, 0xFF, rest @ ..] => {
            let units: Vec<u16> = rest
                .chunks_exact(2)
                .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
                .collect();
            String::from_utf16_lossy(&units)
        }
        _ => raw.iter().map(|&b| char::from(b)).collect(),
    }
}

/// Last non-empty path segment, or the host for a bare domain
fn title_from_path(url: &Url) -> String {
    url.path_segments()
        .and_then(|segments| segments.filter(|s| !s.is_empty()).last())
        .map(str::to_string)
        .or_else(|| url.host_str().map(str::to_string))
        .unwrap_or_else(|| url.to_string())
}
