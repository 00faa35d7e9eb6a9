//! Metrics collection for scan runs

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Why a discovered file was not searched
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Excluded by the extension filter
    Filtered,
    /// No extractor handles the extension
    NoHandler,
    /// Larger than the configured size limit
    TooLarge,
    /// Metadata could not be read
    Unreadable,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SkipReason::Filtered => "filtered",
            SkipReason::NoHandler => "no handler",
            SkipReason::TooLarge => "too large",
            SkipReason::Unreadable => "unreadable",
        };
        f.write_str(label)
    }
}

/// Metrics collected during a scan
///
/// Counts every file the walker discovered and what happened to it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScanMetrics {
    /// Regular files found by the walker
    pub discovered: u64,

    /// Files not searched, per reason
    pub skipped: BTreeMap<SkipReason, u64>,

    /// Files whose content was searched to completion
    pub scanned: u64,

    /// Files whose extraction failed
    pub errored: u64,

    /// Files abandoned after the per-file timeout
    pub timed_out: u64,

    /// Files with at least one match
    pub matched: u64,

    /// Matching files copied into the quarantine folder
    pub quarantined: u64,

    /// Matching files whose copy failed
    pub copy_failed: u64,

    /// Files flagged by extension alone
    pub interesting: u64,

    /// Snippets recorded across all quarantined files
    pub snippets: u64,

    /// Wall-clock duration of the scan in milliseconds
    pub elapsed_ms: u64,
}

impl ScanMetrics {
    /// Create new empty metrics
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a file found by the walker
    pub fn record_discovered(&mut self) {
        self.discovered += 1;
    }

    /// Record skipped files
    pub fn record_skip(&mut self, reason: SkipReason, count: u64) {
        *self.skipped.entry(reason).or_insert(0) += count;
    }

    /// Record a searched file that produced no match
    pub fn record_clean(&mut self) {
        self.scanned += 1;
    }

    /// Record a searched file with matches, copied with `snippets` snippets
    pub fn record_quarantined(&mut self, snippets: usize) {
        self.scanned += 1;
        self.matched += 1;
        self.quarantined += 1;
        self.snippets += snippets as u64;
    }

    /// Record a searched file with matches whose copy failed
    pub fn record_copy_failure(&mut self) {
        self.scanned += 1;
        self.matched += 1;
        self.copy_failed += 1;
    }

    /// Record an extraction error
    pub fn record_error(&mut self) {
        self.errored += 1;
    }

    /// Record a file abandoned after the timeout
    pub fn record_timeout(&mut self) {
        self.timed_out += 1;
    }

    /// Record an interesting file
    pub fn record_interesting(&mut self) {
        self.interesting += 1;
    }

    /// Get total skipped files across all reasons
    pub fn total_skipped(&self) -> u64 {
        self.skipped.values().sum()
    }

    /// Generate a summary report of metrics
    pub fn summary(&self) -> String {
        let mut lines = vec![
            "Scan Summary".to_string(),
            "============".to_string(),
            format!("Files discovered: {}", self.discovered),
            format!("Files scanned: {}", self.scanned),
            format!("Files matched: {}", self.matched),
            format!("Files quarantined: {}", self.quarantined),
            format!("Snippets recorded: {}", self.snippets),
            format!("Interesting files: {}", self.interesting),
            format!("Errors: {}", self.errored),
            format!("Timeouts: {}", self.timed_out),
            format!("Copy failures: {}", self.copy_failed),
            format!("Elapsed: {:.1}s", self.elapsed_ms as f64 / 1000.0),
        ];

        if !self.skipped.is_empty() {
            lines.push(String::new());
            lines.push("Skipped:".to_string());
            for (reason, count) in &self.skipped {
                lines.push(format!("  {}: {}", reason, count));
            }
            lines.push(format!("  Total: {}", self.total_skipped()));
        }

        lines.join("\n")
    }
}
