//! PDF documents

use crate::error::ExtractError;
use crate::extractor::{TextExtractor, TextUnits};
use lopdf::Document;
use patrol_domain::TextUnit;
use std::path::Path;

/// Extracts text page by page
///
/// Pages are parsed lazily, so a file that reaches the match limit on page 1
/// never has its remaining pages decoded.
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfExtractor;

impl TextExtractor for PdfExtractor {
    fn name(&self) -> &'static str {
        "pdf"
    }

    fn units(&self, path: &Path) -> Result<TextUnits, ExtractError> {
        let document = Document::load(path)?;
        if document.is_encrypted() {
            return Err(ExtractError::Encrypted(path.display().to_string()));
        }

        let pages: Vec<u32> = document.get_pages().keys().copied().collect();
        Ok(Box::new(pages.into_iter().map(move |page| {
            let text = document.extract_text(&[page])?;
            Ok(TextUnit::new(format!("page {}", page), text))
        })))
    }
}
