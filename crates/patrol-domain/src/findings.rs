//! Evidence collected for a single file

use crate::matcher::Match;
use crate::snippet::{render, Snippet};
use crate::unit::TextUnit;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Matches and snippets found in one file
///
/// A file is only quarantined when at least one match was recorded. A match
/// whose snippet cannot be rendered still counts toward the per-file limit
/// but contributes no snippet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileFindings {
    /// Path of the scanned file as it was discovered
    pub original_path: PathBuf,

    /// Rendered snippets, in match order
    pub snippets: Vec<Snippet>,

    /// Number of matches recorded (including those without a snippet)
    pub match_count: usize,

    /// Distinct keywords that matched, in first-seen order
    pub keywords: Vec<String>,
}

impl FileFindings {
    /// Start collecting findings for a file
    pub fn new(original_path: impl Into<PathBuf>) -> Self {
        Self {
            original_path: original_path.into(),
            snippets: Vec::new(),
            match_count: 0,
            keywords: Vec::new(),
        }
    }

    /// Record the matches found in one text unit
    pub fn record(&mut self, unit: &TextUnit, matches: &[Match]) {
        for m in matches {
            self.match_count += 1;

            let keyword = m.keyword.as_str();
            if !self.keywords.iter().any(|k| k == keyword) {
                self.keywords.push(keyword.to_string());
            }

            match render(&unit.text, m) {
                Some(snippet) => self.snippets.push(snippet),
                None => debug!(
                    "No snippet for '{}' at {} in {} ({})",
                    keyword,
                    m.offset,
                    self.original_path.display(),
                    unit.label
                ),
            }
        }
    }

    /// How many more matches may be recorded before reaching `limit`
    pub fn remaining(&self, limit: usize) -> usize {
        limit.saturating_sub(self.match_count)
    }

    /// Whether any match was recorded
    pub fn has_matches(&self) -> bool {
        self.match_count > 0
    }

    /// Path of the scanned file
    pub fn path(&self) -> &Path {
        &self.original_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{search, KeywordSet, DEFAULT_MATCH_LIMIT};

    #[test]
    fn test_record_across_units_respects_limit() {
        let keywords = KeywordSet::from_lines("password");
        let units = vec![
            TextUnit::new("page 1", "password ".repeat(8)),
            TextUnit::new("page 2", "password ".repeat(7)),
        ];

        let mut findings = FileFindings::new("/shares/hr/doc.pdf");
        for unit in &units {
            let remaining = findings.remaining(DEFAULT_MATCH_LIMIT);
            if remaining == 0 {
                break;
            }
            let matches = search(&unit.text, &keywords, remaining);
            findings.record(unit, &matches);
        }

        assert_eq!(findings.match_count, 10);
        assert_eq!(findings.snippets.len(), 10);
        assert_eq!(findings.remaining(DEFAULT_MATCH_LIMIT), 0);
        assert_eq!(findings.keywords, vec!["password".to_string()]);
    }

    #[test]
    fn test_new_findings_are_empty() {
        let findings = FileFindings::new("a.txt");
        assert!(!findings.has_matches());
        assert_eq!(findings.path(), Path::new("a.txt"));
    }

    #[test]
    fn test_distinct_keywords_in_order() {
        let keywords = KeywordSet::from_lines("token\nsecret");
        let unit = TextUnit::whole("secret token secret");
        let mut findings = FileFindings::new("x.txt");
        findings.record(&unit, &search(&unit.text, &keywords, 10));
        assert_eq!(findings.keywords, vec!["token".to_string(), "secret".to_string()]);
        assert_eq!(findings.match_count, 3);
    }
}
