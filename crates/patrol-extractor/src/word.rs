//! Word documents (docx, docm, dotx)

use crate::error::ExtractError;
use crate::extractor::{TextExtractor, TextUnits};
use crate::package::Package;
use crate::xml::{blocks, XmlLayout};
use patrol_domain::TextUnit;
use std::path::Path;

const BODY_PART: &str = "word/document.xml";

const WORDPROCESSING: XmlLayout = XmlLayout {
    blocks: &[b"w:p"],
    texts: Some(&[b"w:t"]),
    line_breaks: &[b"w:br", b"w:cr"],
    spaces: &[b"w:tab"],
};

/// Extracts paragraphs from the document body, then headers and footers
///
/// The body becomes a single `document` unit with one paragraph per line, so
/// snippet context follows the document's own line structure.
#[derive(Debug, Default, Clone, Copy)]
pub struct WordExtractor;

impl TextExtractor for WordExtractor {
    fn name(&self) -> &'static str {
        "docx"
    }

    fn units(&self, path: &Path) -> Result<TextUnits, ExtractError> {
        let mut package = Package::open(path)?;
        if !package.has_part(BODY_PART) {
            return Err(ExtractError::MissingPart(BODY_PART.to_string()));
        }

        let mut parts = vec![(BODY_PART.to_string(), "document".to_string())];
        let mut extras: Vec<String> = package
            .part_names()
            .into_iter()
            .filter(|name| is_header_or_footer(name))
            .collect();
        extras.sort();
        parts.extend(extras.into_iter().map(|name| {
            let label = name
                .trim_start_matches("word/")
                .trim_end_matches(".xml")
                .to_string();
            (name, label)
        }));

        Ok(Box::new(parts.into_iter().map(move |(part, label)| {
            let xml = package.read(&part)?;
            let text = blocks(&xml, &WORDPROCESSING)?.join("\n");
            Ok(TextUnit::new(label, text))
        })))
    }
}

fn is_header_or_footer(name: &str) -> bool {
    name.strip_prefix("word/")
        .is_some_and(|rest| {
            (rest.starts_with("header") || rest.starts_with("footer"))
                && rest.ends_with(".xml")
                && !rest.contains('/')
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::package::fixtures::write_package;

    const BODY: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:body>
    <w:p><w:r><w:t>Server: db01</w:t></w:r></w:p>
    <w:p><w:r><w:t xml:space="preserve">Pass</w:t></w:r><w:r><w:t>word: Summer2024!</w:t></w:r></w:p>
    <w:p><w:r><w:t>Owner:</w:t><w:tab/><w:t>IT</w:t></w:r></w:p>
  </w:body>
</w:document>"#;

    const HEADER: &str = r#"<w:hdr xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:p><w:r><w:t>Confidential</w:t></w:r></w:p></w:hdr>"#;

    #[test]
    fn test_paragraphs_joined_by_newline() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_package(dir.path(), "creds.docx", &[(BODY_PART, BODY)]);

        let units: Vec<TextUnit> = WordExtractor
            .units(&path)
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(units.len(), 1);
        assert_eq!(units[0].label, "document");
        assert_eq!(units[0].text, "Server: db01\nPassword: Summer2024!\nOwner: IT");
    }

    #[test]
    fn test_headers_follow_body() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_package(
            dir.path(),
            "memo.docx",
            &[(BODY_PART, BODY), ("word/header1.xml", HEADER), ("word/styles.xml", "<w:styles/>")],
        );

        let units: Vec<TextUnit> = WordExtractor
            .units(&path)
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(units.len(), 2);
        assert_eq!(units[1].label, "header1");
        assert_eq!(units[1].text, "Confidential");
    }

    #[test]
    fn test_missing_body() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_package(dir.path(), "empty.docx", &[("[Content_Types].xml", "<Types/>")]);
        assert!(matches!(WordExtractor.units(&path), Err(ExtractError::MissingPart(_))));
    }

    #[test]
    fn test_header_footer_names() {
        assert!(is_header_or_footer("word/header2.xml"));
        assert!(is_header_or_footer("word/footer1.xml"));
        assert!(!is_header_or_footer("word/_rels/header1.xml.rels"));
        assert!(!is_header_or_footer("word/document.xml"));
    }
}
