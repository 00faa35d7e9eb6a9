//! PassPatrol Text Extractors
//!
//! Turns documents found on a share into searchable [`TextUnit`]s.
//!
//! ## Formats
//!
//! | Extractor | Extensions | Units |
//! |---|---|---|
//! | [`PlainTextExtractor`] | txt, ini, config, ps1, ... | whole file |
//! | [`PdfExtractor`] | pdf | one per page |
//! | [`WordExtractor`] | docx, docm, dotx | body, then headers and footers |
//! | [`SpreadsheetExtractor`] | xlsx, xlsm, xlsb, xls, ods | one per non-empty cell |
//! | [`PresentationExtractor`] | pptx, pptm | one per shape |
//! | [`OpenDocumentExtractor`] | odt, odp | whole document |
//! | [`LegacyBinaryExtractor`] | doc, ppt | printable strings |
//!
//! Extractors return lazy iterators; callers stop pulling once they have
//! seen enough. Every failure is an [`ExtractError`], never a panic.
//!
//! [`ExtractorRegistry`] routes a path to its [`Handler`] by extension.
//!
//! [`TextUnit`]: patrol_domain::TextUnit

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod extractor;
pub mod legacy;
pub mod opendocument;
mod package;
pub mod pdf;
pub mod plain;
pub mod presentation;
pub mod registry;
pub mod spreadsheet;
pub mod word;
mod xml;

pub use error::ExtractError;
pub use extractor::{TextExtractor, TextUnits};
pub use legacy::LegacyBinaryExtractor;
pub use opendocument::OpenDocumentExtractor;
pub use pdf::PdfExtractor;
pub use plain::PlainTextExtractor;
pub use presentation::PresentationExtractor;
pub use registry::{
    normalize_extension, ExtractorRegistry, Handler, UnknownPolicy, INTERESTING_EXTENSIONS,
    PLAIN_TEXT_EXTENSIONS,
};
pub use spreadsheet::SpreadsheetExtractor;
pub use word::WordExtractor;
