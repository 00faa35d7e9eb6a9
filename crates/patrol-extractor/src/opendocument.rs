//! OpenDocument text and presentation files (odt, odp)

use crate::error::ExtractError;
use crate::extractor::{ready, TextExtractor, TextUnits};
use crate::package::Package;
use crate::xml::{blocks, XmlLayout};
use patrol_domain::TextUnit;
use std::path::Path;

const CONTENT_PART: &str = "content.xml";
const MANIFEST_PART: &str = "META-INF/manifest.xml";

const OPEN_DOCUMENT_TEXT: XmlLayout = XmlLayout {
    blocks: &[b"text:p", b"text:h"],
    texts: None,
    line_breaks: &[b"text:line-break"],
    spaces: &[b"text:s", b"text:tab"],
};

/// Extracts paragraphs and headings from `content.xml`
#[derive(Debug, Default, Clone, Copy)]
pub struct OpenDocumentExtractor;

impl TextExtractor for OpenDocumentExtractor {
    fn name(&self) -> &'static str {
        "odf"
    }

    fn units(&self, path: &Path) -> Result<TextUnits, ExtractError> {
        let mut package = Package::open(path)?;

        if package.has_part(MANIFEST_PART) {
            let manifest = package.read(MANIFEST_PART)?;
            if contains(&manifest, b"encryption-data") {
                return Err(ExtractError::Encrypted(path.display().to_string()));
            }
        }

        let xml = package.read(CONTENT_PART)?;
        let text = blocks(&xml, &OPEN_DOCUMENT_TEXT)?.join("\n");
        Ok(ready(vec![TextUnit::whole(text)]))
    }
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|window| window == needle)
}
