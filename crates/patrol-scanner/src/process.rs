//! Searching one file

use patrol_domain::{search, FileFindings, KeywordSet};
use patrol_extractor::{ExtractError, TextExtractor};
use std::path::Path;
use tracing::debug;

/// Extract `path` unit by unit and collect keyword matches
///
/// Units are pulled lazily, so nothing past the unit that reaches `limit` is
/// parsed. Returns `Ok(None)` when nothing matched. An extraction error
/// after some matches were recorded ends the file but keeps its findings.
pub fn process_file(
    path: &Path,
    extractor: &dyn TextExtractor,
    keywords: &KeywordSet,
    limit: usize,
) -> Result<Option<FileFindings>, ExtractError> {
    let mut findings = FileFindings::new(path);

    for unit in extractor.units(path)? {
        let unit = match unit {
            Ok(unit) => unit,
            Err(e) if findings.has_matches() => {
                debug!(
                    "{} stopped early in {}: {}",
                    extractor.name(),
                    path.display(),
                    e
                );
                break;
            }
            Err(e) => return Err(e),
        };

        let matches = search(&unit.text, keywords, findings.remaining(limit));
        findings.record(&unit, &matches);
        if findings.remaining(limit) == 0 {
            debug!("Match limit reached in {}", path.display());
            break;
        }
    }

    Ok(findings.has_matches().then_some(findings))
}

#[cfg(test)]
mod tests {
    use super::*;
    use patrol_domain::TextUnit;
    use patrol_extractor::{PlainTextExtractor, TextUnits};
    use std::fs;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Yields `units` one by one, then an error; counts pulled units
    struct Scripted {
        units: Vec<&'static str>,
        pulled: Arc<AtomicUsize>,
    }

    impl TextExtractor for Scripted {
        fn name(&self) -> &'static str {
            "scripted"
        }

        fn units(&self, _path: &Path) -> Result<TextUnits, ExtractError> {
            let pulled = Arc::clone(&self.pulled);
            let units = self.units.clone().into_iter().enumerate().map(move |(i, text)| {
                pulled.fetch_add(1, Ordering::SeqCst);
                Ok(TextUnit::new(format!("page {}", i + 1), text))
            });
            let failure = std::iter::once(Err(ExtractError::MissingPart("trailer".into())));
            Ok(Box::new(units.chain(failure)))
        }
    }

    fn keywords() -> KeywordSet {
        KeywordSet::from_lines("password\n")
    }

    #[test]
    fn test_plain_text_match() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.txt");
        fs::write(&path, "my password: hunter2").unwrap();

        let findings = process_file(&path, &PlainTextExtractor, &keywords(), 10)
            .unwrap()
            .unwrap();
        assert_eq!(findings.match_count, 1);
        assert_eq!(findings.snippets.len(), 1);
        assert_eq!(findings.original_path, path);
    }

    #[test]
    fn test_no_match_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.txt");
        fs::write(&path, "nothing to see").unwrap();

        assert!(process_file(&path, &PlainTextExtractor, &keywords(), 10)
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_limit_spans_units_and_stops_pulling() {
        let pulled = Arc::new(AtomicUsize::new(0));
        let extractor = Scripted {
            units: vec!["password password", "password", "password", "password"],
            pulled: Arc::clone(&pulled),
        };

        let findings = process_file(Path::new("/x.pdf"), &extractor, &keywords(), 3)
            .unwrap()
            .unwrap();
        assert_eq!(findings.match_count, 3);
        assert_eq!(pulled.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_error_after_matches_keeps_findings() {
        let extractor = Scripted {
            units: vec!["old password"],
            pulled: Arc::new(AtomicUsize::new(0)),
        };
        let findings = process_file(Path::new("/x.pdf"), &extractor, &keywords(), 10)
            .unwrap()
            .unwrap();
        assert_eq!(findings.match_count, 1);
    }

    #[test]
    fn test_error_without_matches_is_returned() {
        let extractor = Scripted {
            units: vec!["nothing"],
            pulled: Arc::new(AtomicUsize::new(0)),
        };
        let result = process_file(Path::new("/x.pdf"), &extractor, &keywords(), 10);
        assert!(matches!(result, Err(ExtractError::MissingPart(_))));
    }

    #[test]
    fn test_missing_file_is_error() {
        let result = process_file(
            Path::new("/definitely/not/here.txt"),
            &PlainTextExtractor,
            &keywords(),
            10,
        );
        assert!(result.is_err());
    }
}
