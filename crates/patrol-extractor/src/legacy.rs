//! Legacy binary Office files (doc, ppt)

use crate::error::ExtractError;
use crate::extractor::{ready, TextExtractor, TextUnits};
use crate::presentation::PresentationExtractor;
use crate::word::WordExtractor;
use patrol_domain::TextUnit;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Minimum length of a printable run worth keeping
pub const MIN_RUN_CHARS: usize = 4;

const ZIP_MAGIC: [u8; 4] = [b'P', b'K', 0x03, 0x04];

/// Pulls printable strings out of binary Office files
///
/// Files that carry a legacy extension but are really OOXML packages (a common
/// result of renaming) are handed to the matching modern extractor instead.
pub struct LegacyBinaryExtractor {
    modern: Box<dyn TextExtractor>,
}

impl LegacyBinaryExtractor {
    /// Extractor for `.doc`, falling back to the docx reader for renamed files
    pub fn word() -> Self {
        Self {
            modern: Box::new(WordExtractor),
        }
    }

    /// Extractor for `.ppt`, falling back to the pptx reader for renamed files
    pub fn presentation() -> Self {
        Self {
            modern: Box::new(PresentationExtractor),
        }
    }
}

impl TextExtractor for LegacyBinaryExtractor {
    fn name(&self) -> &'static str {
        "legacy"
    }

    fn units(&self, path: &Path) -> Result<TextUnits, ExtractError> {
        let mut magic = [0u8; 4];
        let read = File::open(path)?.read(&mut magic)?;
        if read == magic.len() && magic == ZIP_MAGIC {
            return self.modern.units(path);
        }

        let bytes = std::fs::read(path)?;
        Ok(ready(vec![TextUnit::whole(printable_strings(&bytes).join("\n"))]))
    }
}

impl std::fmt::Debug for LegacyBinaryExtractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LegacyBinaryExtractor")
            .field("modern", &self.modern.name())
            .finish()
    }
}

fn is_printable(byte: u8) -> bool {
    byte == b'\t' || (0x20..=0x7E).contains(&byte)
}

/// Printable ASCII runs followed by printable UTF-16LE runs
pub fn printable_strings(bytes: &[u8]) -> Vec<String> {
    let mut runs = Vec::new();

    let mut current = String::new();
    for &byte in bytes {
        if is_printable(byte) {
            current.push(byte as char);
        } else {
            flush(&mut current, &mut runs);
        }
    }
    flush(&mut current, &mut runs);

    for offset in 0..2 {
        for pair in bytes.get(offset..).unwrap_or_default().chunks_exact(2) {
            if pair[1] == 0 && is_printable(pair[0]) {
                current.push(pair[0] as char);
            } else {
                flush(&mut current, &mut runs);
            }
        }
        flush(&mut current, &mut runs);
    }

    runs
}

fn flush(current: &mut String, runs: &mut Vec<String>) {
    if current.chars().count() >= MIN_RUN_CHARS {
        runs.push(std::mem::take(current));
    } else {
        current.clear();
    }
}
