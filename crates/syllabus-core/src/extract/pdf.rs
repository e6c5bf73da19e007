//! PDF text extraction via `lopdf`.

use lopdf::Document;
use tracing::{debug, warn};

use super::ExtractError;

/// Extract the text of every page, each preceded by a `--- Page N ---`
/// marker line. Whitespace runs inside a page collapse to single spaces.
pub fn extract_pdf_text(bytes: &[u8]) -> Result<String, ExtractError> {
    let doc = Document::load_mem(bytes).map_err(|e| ExtractError::Pdf(e.to_string()))?;

    if doc.is_encrypted() {
        return Err(ExtractError::Encrypted);
    }

    let pages = doc.get_pages();
    debug!(pages = pages.len(), "extracting PDF text");

    let mut text = String::new();
    for (index, page_number) in pages.keys().enumerate() {
        let raw = match doc.extract_text(&[*page_number]) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(page = page_number, error = %e, "could not extract page text");
                String::new()
            }
        };
        text.push_str(&format!("\n--- Page {} ---\n", index + 1));
        text.push_str(&collapse_whitespace(&raw));
    }

    Ok(text)
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
