//! The text extraction capability shared by every document format

use crate::error::ExtractError;
use patrol_domain::TextUnit;
use std::path::Path;

/// Lazy sequence of text units produced by an extractor
///
/// Units are parsed on demand, so a consumer that stops early (for example
/// once the per-file match limit is reached) never pays for the rest of the
/// document.
pub type TextUnits = Box<dyn Iterator<Item = Result<TextUnit, ExtractError>>>;

/// Converts a file into searchable text
///
/// Implementations must not panic on malformed input; every parse failure is
/// reported as an [`ExtractError`].
pub trait TextExtractor: Send + Sync {
    /// Short name used in logs (e.g. "pdf")
    fn name(&self) -> &'static str;

    /// Open the document and return its text units
    fn units(&self, path: &Path) -> Result<TextUnits, ExtractError>;
}

/// Wrap an already-extracted list of units
pub(crate) fn ready(units: Vec<TextUnit>) -> TextUnits {
    Box::new(units.into_iter().map(Ok))
}
