//! Manifest data model: what was quarantined, from where, and why

use patrol_domain::{FileFindings, Snippet, Verdict};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The report document, keyed by quarantined file name
pub type Manifest = BTreeMap<String, ManifestEntry>;

/// Provenance and evidence for one quarantined copy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    /// Path of the file as found during the scan
    pub original_path: String,

    /// Snippets with keyword occurrences wrapped in `**`
    pub snippets: Vec<String>,

    /// Byte ranges of the highlighted occurrences in each unmarked snippet
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub highlights: Vec<Vec<[usize; 2]>>,

    /// Classifier verdicts, added by `passpatrol classify`
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub verdicts: Vec<VerdictRecord>,
}

/// A verdict attached to one snippet of an entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerdictRecord {
    /// Index into [`ManifestEntry::snippets`]
    pub snippet: usize,

    /// The classifier's judgement
    pub verdict: Verdict,
}

impl ManifestEntry {
    /// Create an entry with no verdicts
    pub fn new(original_path: impl Into<String>, snippets: Vec<String>) -> Self {
        Self {
            original_path: original_path.into(),
            snippets,
            highlights: Vec::new(),
            verdicts: Vec::new(),
        }
    }

    /// Build the entry for a file's findings
    pub fn from_findings(findings: &FileFindings) -> Self {
        let mut entry = Self::new(
            findings.original_path.to_string_lossy(),
            findings.snippets.iter().map(mark).collect(),
        );
        entry.highlights = findings
            .snippets
            .iter()
            .map(|s| s.highlights.iter().map(|r| [r.start, r.end]).collect())
            .collect();
        entry
    }

    /// The snippet at `index` as it appeared in the file
    ///
    /// Only the markers at the recorded highlight positions are removed, so
    /// `**` present in the original text survives. Entries without recorded
    /// positions fall back to [`unmark`].
    pub fn plain_snippet(&self, index: usize) -> Option<String> {
        let marked = self.snippets.get(index)?;
        let plain = self
            .highlights
            .get(index)
            .and_then(|ranges| strip_markers(marked, ranges))
            .unwrap_or_else(|| unmark(marked));
        Some(plain)
    }

    /// Replace any existing verdict for `snippet`
    pub fn set_verdict(&mut self, snippet: usize, verdict: Verdict) {
        self.verdicts.retain(|record| record.snippet != snippet);
        self.verdicts.push(VerdictRecord { snippet, verdict });
        self.verdicts.sort_by_key(|record| record.snippet);
    }
}

const MARKER: &str = "**";

/// Render a snippet for the report, wrapping keyword occurrences in `**`
pub fn mark(snippet: &Snippet) -> String {
    snippet.highlight_with(|kw| format!("{MARKER}{kw}{MARKER}"))
}

/// Strip every `**` from a marked snippet
pub fn unmark(snippet: &str) -> String {
    snippet.replace(MARKER, "")
}

/// Undo [`mark`] given the highlight ranges of the plain text
///
/// Returns `None` if a marker is not where the ranges say it should be.
fn strip_markers(marked: &str, ranges: &[[usize; 2]]) -> Option<String> {
    let width = MARKER.len();
    let mut out = String::with_capacity(marked.len());
    let mut cursor = 0;
    for (i, &[start, end]) in ranges.iter().enumerate() {
        let open = start + 2 * i * width;
        let close = end + (2 * i + 1) * width;
        let opens = marked.get(open..open + width)? == MARKER;
        let closes = marked.get(close..close + width)? == MARKER;
        if !(opens && closes) {
            return None;
        }
        out.push_str(marked.get(cursor..open)?);
        out.push_str(marked.get(open + width..close)?);
        cursor = close + width;
    }
    out.push_str(marked.get(cursor..)?);
    Some(out)
}
