//! Core Classifier implementation

use crate::config::ClassifierConfig;
use crate::error::ClassifierError;
use crate::parser::parse_verdict;
use crate::prompt::PromptBuilder;
use patrol_domain::Verdict;
use patrol_llm::LlmProvider;
use patrol_store::{read_report, write_report};
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// One judged snippet, as reported to the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassifiedSnippet {
    /// Name of the quarantined copy
    pub copied_name: String,
    /// Path of the file as found during the scan
    pub original_path: String,
    /// Index of the snippet in the report entry
    pub snippet_index: usize,
    /// Snippet text as stored in the report
    pub snippet: String,
    /// The classifier's judgement
    pub verdict: Verdict,
}

/// Totals for one classification pass over a report
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ClassificationSummary {
    /// Snippets that received a verdict
    pub classified: usize,
    /// Verdicts reporting a password or credential
    pub credentials: usize,
    /// Verdicts whose response did not follow the contract
    pub unparsed: usize,
    /// Snippets skipped because of service errors or timeouts
    pub failed: usize,
}

/// Sends report snippets to an LLM and records its verdicts
pub struct Classifier<L>
where
    L: LlmProvider,
{
    llm_provider: Arc<L>,
    config: ClassifierConfig,
}

impl<L> Classifier<L>
where
    L: LlmProvider,
{
    /// Create a new Classifier
    pub fn new(llm_provider: L, config: ClassifierConfig) -> Result<Self, ClassifierError> {
        config.validate().map_err(ClassifierError::Config)?;
        Ok(Self {
            llm_provider: Arc::new(llm_provider),
            config,
        })
    }

    /// Judge one snippet
    ///
    /// `snippet` is the plain text, without keyword markers. The call is
    /// bounded by the configured request timeout.
    pub async fn classify_snippet(
        &self,
        snippet: &str,
        source: &str,
    ) -> Result<Verdict, ClassifierError> {
        let prompt = PromptBuilder::new(snippet).with_source(source).build();
        debug!("Prompt length: {} chars", prompt.len());

        let response = timeout(
            self.config.request_timeout(),
            self.llm_provider.generate(&prompt),
        )
        .await
        .map_err(|_| ClassifierError::Timeout)??;

        Ok(parse_verdict(&response))
    }

    /// Classify every snippet of a finalized report
    ///
    /// Each verdict is passed to `on_verdict` as soon as it is known and
    /// stored on its entry; the report is rewritten atomically once all
    /// snippets are done. A snippet whose request fails is logged and left
    /// without a verdict.
    pub async fn classify_report<F>(
        &self,
        report_path: &Path,
        mut on_verdict: F,
    ) -> Result<ClassificationSummary, ClassifierError>
    where
        F: FnMut(&ClassifiedSnippet),
    {
        let mut manifest = read_report(report_path)?;
        let total: usize = manifest.values().map(|e| e.snippets.len()).sum();
        info!(
            "Classifying {} snippet(s) from {} file(s) with {}",
            total,
            manifest.len(),
            self.llm_provider.model()
        );

        let mut summary = ClassificationSummary::default();
        for (copied_name, entry) in manifest.iter_mut() {
            for index in 0..entry.snippets.len() {
                let snippet = entry.snippets[index].clone();
                let plain = entry.plain_snippet(index).unwrap_or_default();
                let verdict = match self.classify_snippet(&plain, &entry.original_path).await {
                    Ok(verdict) => verdict,
                    Err(e) => {
                        warn!(
                            "Skipping snippet {} of {}: {}",
                            index, entry.original_path, e
                        );
                        summary.failed += 1;
                        continue;
                    }
                };

                summary.classified += 1;
                if verdict.is_credential() {
                    summary.credentials += 1;
                }
                if matches!(verdict, Verdict::Unparsed { .. }) {
                    summary.unparsed += 1;
                }

                on_verdict(&ClassifiedSnippet {
                    copied_name: copied_name.clone(),
                    original_path: entry.original_path.clone(),
                    snippet_index: index,
                    snippet,
                    verdict: verdict.clone(),
                });
                entry.set_verdict(index, verdict);
            }
        }

        write_report(report_path, &manifest)?;
        info!(
            "Classification complete: {} classified, {} credential(s), {} failed",
            summary.classified, summary.credentials, summary.failed
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use patrol_domain::{search, FileFindings, KeywordSet, TextUnit};
    use patrol_llm::{LlmError, MockProvider};
    use patrol_store::{Manifest, ManifestEntry};
    use std::time::Duration;

    /// Provider that never answers in time
    struct SlowProvider;

    #[async_trait]
    impl LlmProvider for SlowProvider {
        async fn generate(&self, _prompt: &str) -> Result<String, LlmError> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok("OK".to_string())
        }

        fn model(&self) -> &str {
            "slow"
        }
    }

    fn write_fixture(dir: &Path) -> std::path::PathBuf {
        let mut manifest = Manifest::new();
        manifest.insert(
            "web.config".to_string(),
            ManifestEntry::new(
                "/mnt/it/web.config",
                vec![
                    "<add key=\"**password**\" value=\"Winter2023\"/>".to_string(),
                    "reset your **password** here".to_string(),
                ],
            ),
        );
        manifest.insert(
            "notes.txt".to_string(),
            ManifestEntry::new("/mnt/hr/notes.txt", vec!["sa **password**: x".to_string()]),
        );
        let path = dir.join("report.json");
        write_report(&path, &manifest).unwrap();
        path
    }

    #[tokio::test]
    async fn test_classify_report_records_verdicts() {
        let dir = tempfile::tempdir().unwrap();
        let report = write_fixture(dir.path());

        let mut llm = MockProvider::new("OK");
        llm.add_response("Winter2023", "pass=Winter2023");
        llm.add_response("sa password: x", "Sure.\nuser=sa,pass=x");

        let classifier = Classifier::new(llm.clone(), ClassifierConfig::default()).unwrap();
        let mut seen = Vec::new();
        let summary = classifier
            .classify_report(&report, |c| seen.push(c.clone()))
            .await
            .unwrap();

        assert_eq!(summary.classified, 3);
        assert_eq!(summary.credentials, 2);
        assert_eq!(summary.failed, 0);
        assert_eq!(seen.len(), 3);
        assert_eq!(llm.call_count(), 3);

        let manifest = read_report(&report).unwrap();
        let web = &manifest["web.config"];
        assert_eq!(web.verdicts.len(), 2);
        assert_eq!(web.verdicts[0].verdict, Verdict::Password { password: "Winter2023".into() });
        assert_eq!(web.verdicts[1].verdict, Verdict::Clean);
        assert_eq!(
            manifest["notes.txt"].verdicts[0].verdict,
            Verdict::Credential { user: "sa".into(), password: "x".into() }
        );
    }

    #[tokio::test]
    async fn test_service_errors_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let report = write_fixture(dir.path());

        let mut llm = MockProvider::new("OK");
        llm.add_error("Winter2023");

        let classifier = Classifier::new(llm, ClassifierConfig::default()).unwrap();
        let summary = classifier.classify_report(&report, |_| {}).await.unwrap();

        assert_eq!(summary.failed, 1);
        assert_eq!(summary.classified, 2);
        let manifest = read_report(&report).unwrap();
        assert_eq!(manifest["web.config"].verdicts.len(), 1);
        assert_eq!(manifest["web.config"].verdicts[0].snippet, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_snippet_timeout() {
        let mut config = ClassifierConfig::default();
        config.request_timeout_secs = 1;
        let classifier = Classifier::new(SlowProvider, config).unwrap();

        let result = classifier.classify_snippet("password=1", "/a.txt").await;
        assert!(matches!(result, Err(ClassifierError::Timeout)));
    }

    #[tokio::test]
    async fn test_markers_are_stripped_from_prompt() {
        let mut llm = MockProvider::new("OK");
        llm.add_response("**password**", "pass=leaked-marker");
        llm.add_response("**Admin**", "user=admin,pass=hunter2");

        let dir = tempfile::tempdir().unwrap();
        let keywords = KeywordSet::from_lines("password");
        let unit = TextUnit::whole("**Admin** password: hunter2");
        let mut findings = FileFindings::new("/mnt/wiki/setup.md");
        findings.record(&unit, &search(&unit.text, &keywords, 10));
        let mut manifest = Manifest::new();
        manifest.insert("setup.md".to_string(), ManifestEntry::from_findings(&findings));
        let report = dir.path().join("report.json");
        write_report(&report, &manifest).unwrap();

        let classifier = Classifier::new(llm, ClassifierConfig::default()).unwrap();
        let mut seen = Vec::new();
        classifier
            .classify_report(&report, |c| seen.push(c.clone()))
            .await
            .unwrap();

        assert_eq!(seen[0].snippet, "**Admin** **password**: hunter2");
        assert_eq!(
            seen[0].verdict,
            Verdict::Credential { user: "admin".into(), password: "hunter2".into() }
        );
    }

    #[tokio::test]
    async fn test_missing_report() {
        let classifier =
            Classifier::new(MockProvider::default(), ClassifierConfig::default()).unwrap();
        let result = classifier
            .classify_report(Path::new("/no/such/report.json"), |_| {})
            .await;
        assert!(matches!(result, Err(ClassifierError::Store(_))));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = ClassifierConfig::default();
        config.model = String::new();
        assert!(matches!(
            Classifier::new(MockProvider::default(), config),
            Err(ClassifierError::Config(_))
        ));
    }
}
