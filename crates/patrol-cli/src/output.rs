//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use colored::*;
use patrol_classifier::{ClassificationSummary, ClassifiedSnippet};
use patrol_domain::{FileFindings, Snippet};
use patrol_scanner::ScanSummary;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Whether results are printed while work is in progress.
    ///
    /// JSON output is a single document, so it never streams.
    pub fn streams(&self) -> bool {
        self.format != OutputFormat::Json
    }

    /// Format a quarantined file: bold path, then each highlighted snippet.
    pub fn quarantined(&self, copied_name: &str, findings: &FileFindings) -> String {
        let path = findings.original_path.display().to_string();
        let header = if self.color_enabled {
            format!("{} {}", path.bold(), format!("-> {}", copied_name).dimmed())
        } else {
            format!("{} -> {}", path, copied_name)
        };

        let mut lines = vec![header];
        for snippet in &findings.snippets {
            for line in self.highlight(snippet).lines() {
                lines.push(format!("    {}", line));
            }
            lines.push(String::new());
        }
        lines.join("\n")
    }

    /// Render a snippet with its keywords in bold red.
    pub fn highlight(&self, snippet: &Snippet) -> String {
        if self.color_enabled {
            snippet.highlight_with(|kw| kw.red().bold().to_string())
        } else {
            snippet.text.clone()
        }
    }

    /// Format the result of a scan.
    pub fn scan_summary(&self, summary: &ScanSummary) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(summary)?),
            OutputFormat::Table => Ok(self.scan_summary_table(summary)),
            OutputFormat::Quiet => Ok(summary.report.report.display().to_string()),
        }
    }

    fn scan_summary_table(&self, summary: &ScanSummary) -> String {
        let m = &summary.metrics;
        let mut builder = Builder::default();
        builder.push_record(["Metric", "Count"]);

        let rows = [
            ("Discovered", m.discovered),
            ("Scanned", m.scanned),
            ("Matched", m.matched),
            ("Quarantined", m.quarantined),
            ("Snippets", m.snippets),
            ("Interesting", m.interesting),
            ("Skipped", m.total_skipped()),
            ("Errors", m.errored),
            ("Timeouts", m.timed_out),
            ("Copy failures", m.copy_failed),
        ];
        for (name, count) in rows {
            builder.push_record([name.to_string(), count.to_string()]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        let mut out = vec![table.to_string()];
        if summary.cancelled {
            out.push(self.warning("Scan interrupted; report covers files finished so far"));
        }
        out.push(self.success(&format!(
            "Report written to {} ({:.1}s)",
            summary.report.report.display(),
            m.elapsed_ms as f64 / 1000.0
        )));
        if m.interesting > 0 {
            out.push(self.info(&format!(
                "{} interesting file(s) listed in {}",
                m.interesting,
                summary.report.interesting.display()
            )));
        }
        out.join("\n")
    }

    /// Format one verdict as it arrives.
    pub fn verdict(&self, classified: &ClassifiedSnippet) -> String {
        let label = format!("[{}]", classified.verdict.label().to_uppercase());
        let label = if classified.verdict.is_credential() {
            self.colorize(&label, "red")
        } else if matches!(classified.verdict, patrol_domain::Verdict::Clean) {
            self.colorize(&label, "green")
        } else {
            self.colorize(&label, "yellow")
        };
        format!(
            "{} {} #{}: {}",
            label, classified.original_path, classified.snippet_index, classified.verdict
        )
    }

    /// Format the result of a classification pass.
    pub fn classification(
        &self,
        summary: &ClassificationSummary,
        verdicts: &[ClassifiedSnippet],
    ) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&serde_json::json!({
                "summary": summary,
                "verdicts": verdicts,
            }))?),
            OutputFormat::Table => Ok(self.classification_table(summary, verdicts)),
            OutputFormat::Quiet => Ok(verdicts
                .iter()
                .filter(|c| c.verdict.is_credential())
                .map(|c| format!("{}\t{}", c.original_path, c.verdict))
                .collect::<Vec<_>>()
                .join("\n")),
        }
    }

    fn classification_table(
        &self,
        summary: &ClassificationSummary,
        verdicts: &[ClassifiedSnippet],
    ) -> String {
        let credentials: Vec<&ClassifiedSnippet> =
            verdicts.iter().filter(|c| c.verdict.is_credential()).collect();

        let mut out = Vec::new();
        if credentials.is_empty() {
            out.push(self.colorize("No credentials found.", "yellow"));
        } else {
            let mut builder = Builder::default();
            builder.push_record(["File", "Copy", "Snippet", "Verdict"]);
            for c in credentials {
                builder.push_record([
                    c.original_path.clone(),
                    c.copied_name.clone(),
                    c.snippet_index.to_string(),
                    c.verdict.to_string(),
                ]);
            }
            let mut table = builder.build();
            table
                .with(Style::rounded())
                .with(Modify::new(Rows::first()).with(Alignment::center()));
            out.push(table.to_string());
        }

        out.push(self.success(&format!(
            "{} snippet(s) classified, {} credential(s)",
            summary.classified, summary.credentials
        )));
        if summary.unparsed > 0 {
            out.push(self.warning(&format!(
                "{} response(s) did not follow the answer format",
                summary.unparsed
            )));
        }
        if summary.failed > 0 {
            out.push(self.error(&format!(
                "{} snippet(s) could not be classified",
                summary.failed
            )));
        }
        out.join("\n")
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}
