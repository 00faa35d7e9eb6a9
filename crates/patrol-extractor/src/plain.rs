//! Plain text files (configs, scripts, logs, and anything read raw)

use crate::error::ExtractError;
use crate::extractor::{ready, TextExtractor, TextUnits};
use patrol_domain::TextUnit;
use std::path::Path;

/// Reads the whole file as one text unit
///
/// Invalid UTF-8 is replaced rather than rejected. Files with a UTF-16 byte
/// order mark (common for exported Windows scripts and registry files) are
/// decoded as UTF-16.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    fn name(&self) -> &'static str {
        "text"
    }

    fn units(&self, path: &Path) -> Result<TextUnits, ExtractError> {
        let bytes = std::fs::read(path)?;
        Ok(ready(vec![TextUnit::whole(decode(&bytes))]))
    }
}

/// Decode file contents, honouring UTF-16 byte order marks
pub(crate) fn decode(bytes: &[u8]) -> String {
    match bytes {
        [0xFF, 0xFE, rest @ ..] => decode_utf16(rest, u16::from_le_bytes),
        [0xFE, 0xFF, rest @ ..] => decode_utf16(rest, u16::from_be_bytes),
        [0xEF, 0xBB, 0xBF, rest @ ..] => String::from_utf8_lossy(rest).into_owned(),
        _ => String::from_utf8_lossy(bytes).into_owned(),
    }
}

fn decode_utf16(bytes: &[u8], to_unit: fn([u8; 2]) -> u16) -> String {
    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| to_unit([pair[0], pair[1]]))
        .collect();
    String::from_utf16_lossy(&units)
}
