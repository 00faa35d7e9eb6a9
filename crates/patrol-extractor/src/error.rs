//! Error types for text extraction

use thiserror::Error;

/// Errors that can occur while extracting text from a document
///
/// These never abort a scan: the orchestrator logs them and moves on to the
/// next file.
#[derive(Error, Debug)]
pub enum ExtractError {
    /// The file could not be read
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The ZIP container of an OOXML/ODF document is corrupt
    #[error("Archive error: {0}")]
    Archive(String),

    /// A document part is not well-formed XML
    #[error("XML error: {0}")]
    Xml(String),

    /// PDF parsing failed
    #[error("PDF error: {0}")]
    Pdf(String),

    /// Spreadsheet parsing failed
    #[error("Spreadsheet error: {0}")]
    Spreadsheet(String),

    /// The document is encrypted or password protected
    #[error("Document is encrypted: {0}")]
    Encrypted(String),

    /// A required part is missing from the document package
    #[error("Missing document part: {0}")]
    MissingPart(String),
}

impl From<zip::result::ZipError> for ExtractError {
    fn from(e: zip::result::ZipError) -> Self {
        match e {
            zip::result::ZipError::FileNotFound => {
                ExtractError::MissingPart("entry not found in archive".to_string())
            }
            other => ExtractError::Archive(other.to_string()),
        }
    }
}

impl From<quick_xml::Error> for ExtractError {
    fn from(e: quick_xml::Error) -> Self {
        ExtractError::Xml(e.to_string())
    }
}

impl From<lopdf::Error> for ExtractError {
    fn from(e: lopdf::Error) -> Self {
        ExtractError::Pdf(e.to_string())
    }
}

impl From<calamine::Error> for ExtractError {
    fn from(e: calamine::Error) -> Self {
        ExtractError::Spreadsheet(e.to_string())
    }
}
