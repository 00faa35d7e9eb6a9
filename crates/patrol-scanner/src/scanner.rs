//! Scan orchestration
//!
//! A walker thread streams paths into a bounded channel; the dispatcher
//! filters and routes each path, then runs one task per file with at most
//! `workers` in flight. Results are collected as tasks finish.

use crate::config::ScanConfig;
use crate::error::ScanError;
use crate::filter::{ExtensionFilter, FilterMode};
use crate::metrics::{ScanMetrics, SkipReason};
use crate::process::process_file;
use crate::walker::{walk, WalkStats};
use chrono::Local;
use patrol_domain::{FileFindings, KeywordSet};
use patrol_extractor::{ExtractorRegistry, Handler, TextExtractor};
use patrol_store::{QuarantineStore, ReportPaths};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{mpsc, Semaphore};
use tokio::task::{JoinError, JoinSet};
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Result of a completed (or cancelled) scan
#[derive(Debug, Clone, Serialize)]
pub struct ScanSummary {
    /// What happened to every discovered file
    pub metrics: ScanMetrics,
    /// Location of the quarantine folder and its documents
    pub report: ReportPaths,
    /// Whether the scan stopped early
    pub cancelled: bool,
}

/// Outcome of one file task
enum FileOutcome {
    Clean,
    Quarantined { name: String, findings: FileFindings },
    CopyFailed,
    Skipped(SkipReason),
    Failed,
    TimedOut,
}

/// Per-file work shared by every task
struct FileJob {
    keywords: Arc<KeywordSet>,
    store: Arc<QuarantineStore>,
    match_limit: usize,
    max_size: u64,
    timeout: std::time::Duration,
}

/// Keyword scanner for a directory tree
pub struct Scanner {
    config: ScanConfig,
    keywords: Arc<KeywordSet>,
    filter: ExtensionFilter,
    registry: ExtractorRegistry,
}

impl Scanner {
    /// Create a scanner from already loaded inputs
    pub fn new(
        config: ScanConfig,
        keywords: KeywordSet,
        filter: ExtensionFilter,
        registry: ExtractorRegistry,
    ) -> Result<Self, ScanError> {
        config.validate().map_err(ScanError::Config)?;
        if keywords.is_empty() {
            warn!("No keywords loaded; nothing will match");
        }
        Ok(Self {
            config,
            keywords: Arc::new(keywords),
            filter,
            registry,
        })
    }

    /// Create a scanner that reads its keyword and extension files as configured
    pub fn from_config(config: ScanConfig) -> Result<Self, ScanError> {
        let keywords = KeywordSet::load(&config.keywords_file);
        let mode = if config.whitelist {
            FilterMode::Whitelist
        } else {
            FilterMode::Blacklist
        };
        let filter = ExtensionFilter::load(&config.extensions_file, mode);
        let registry = config.registry();
        Self::new(config, keywords, filter, registry)
    }

    /// Configuration in use
    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Scan `root`, quarantining every matching file
    ///
    /// `on_match` is called with the copied name and findings of each file
    /// as soon as it is quarantined. When `cancel` fires no new files are
    /// dispatched, in-flight files finish and the report is still written.
    pub async fn run<F>(
        &self,
        root: &Path,
        cancel: CancellationToken,
        mut on_match: F,
    ) -> Result<ScanSummary, ScanError>
    where
        F: FnMut(&str, &FileFindings),
    {
        let started = Instant::now();
        check_root(root)?;

        let store = Arc::new(QuarantineStore::create(
            &self.config.output_dir,
            Local::now().naive_local(),
        )?);
        let workers = self.config.worker_count();
        info!(
            "Scanning {} with {} worker(s) into {}",
            root.display(),
            workers,
            store.folder().display()
        );

        let job = Arc::new(FileJob {
            keywords: Arc::clone(&self.keywords),
            store: Arc::clone(&store),
            match_limit: self.config.match_limit,
            max_size: self.config.max_file_size_bytes(),
            timeout: self.config.file_timeout(),
        });

        let excluded = self.excluded_paths(&store);
        let (tx, mut rx) = mpsc::channel::<PathBuf>(workers * 4);
        let walker = {
            let root = root.to_path_buf();
            let cancel = cancel.clone();
            tokio::task::spawn_blocking(move || walk(&root, &excluded, &tx, &cancel))
        };

        let semaphore = Arc::new(Semaphore::new(workers));
        let mut tasks: JoinSet<FileOutcome> = JoinSet::new();
        let mut metrics = ScanMetrics::new();

        'dispatch: loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => break 'dispatch,
                Some(result) = tasks.join_next(), if !tasks.is_empty() => {
                    collect(result, &mut metrics, &mut on_match);
                }
                next = rx.recv() => {
                    let Some(path) = next else { break 'dispatch };
                    metrics.record_discovered();

                    let Some(extractor) = self.route(&path, &store, &mut metrics) else {
                        continue 'dispatch;
                    };

                    let permit = tokio::select! {
                        _ = cancel.cancelled() => break 'dispatch,
                        permit = Arc::clone(&semaphore).acquire_owned() => permit
                            .map_err(|e| ScanError::Worker(e.to_string()))?,
                    };

                    let job = Arc::clone(&job);
                    tasks.spawn(async move {
                        let outcome = job.run(path, extractor).await;
                        drop(permit);
                        outcome
                    });
                }
            }
        }

        let cancelled = cancel.is_cancelled();
        if cancelled {
            info!("Scan cancelled; waiting for {} in-flight file(s)", tasks.len());
        }
        drop(rx);

        while let Some(result) = tasks.join_next().await {
            collect(result, &mut metrics, &mut on_match);
        }

        match walker.await {
            Ok(stats) => record_walk(&stats, &mut metrics),
            Err(e) => warn!("Walker failed: {}", e),
        }

        let report = store.finalize()?;
        metrics.elapsed_ms = started.elapsed().as_millis() as u64;
        info!(
            "Scan finished: {} discovered, {} quarantined, {} interesting",
            metrics.discovered, metrics.quarantined, metrics.interesting
        );

        Ok(ScanSummary {
            metrics,
            report,
            cancelled,
        })
    }

    /// The run's own quarantine folder and input files, canonicalized
    fn excluded_paths(&self, store: &QuarantineStore) -> Vec<PathBuf> {
        [
            store.folder(),
            self.config.keywords_file.as_path(),
            self.config.extensions_file.as_path(),
        ]
        .into_iter()
        .filter_map(|path| fs::canonicalize(path).ok())
        .collect()
    }

    /// Apply the filter and pick an extractor; `None` when the file is done
    fn route(
        &self,
        path: &Path,
        store: &QuarantineStore,
        metrics: &mut ScanMetrics,
    ) -> Option<Arc<dyn TextExtractor>> {
        if !self.filter.allows(path) {
            debug!("Filtered: {}", path.display());
            metrics.record_skip(SkipReason::Filtered, 1);
            return None;
        }

        match self.registry.handler_for(path) {
            Some(Handler::Content(extractor)) => Some(extractor),
            Some(Handler::Interesting) => {
                debug!("Interesting: {}", path.display());
                store.record_interesting(path);
                metrics.record_interesting();
                None
            }
            None if self.filter.mode() == FilterMode::Whitelist => {
                debug!("Whitelisted without a handler, reading as text: {}", path.display());
                Some(self.registry.plain_text())
            }
            None => {
                debug!("No handler for {}", path.display());
                metrics.record_skip(SkipReason::NoHandler, 1);
                None
            }
        }
    }
}

impl FileJob {
    /// Extract, search and (on a match) quarantine one file
    async fn run(self: Arc<Self>, path: PathBuf, extractor: Arc<dyn TextExtractor>) -> FileOutcome {
        let job = Arc::clone(&self);
        let file = path.clone();
        let extraction = tokio::task::spawn_blocking(move || job.search(&file, extractor.as_ref()));

        let findings = match timeout(self.timeout, extraction).await {
            Err(_) => {
                warn!(
                    "Timed out after {}s: {}",
                    self.timeout.as_secs(),
                    path.display()
                );
                return FileOutcome::TimedOut;
            }
            Ok(Err(e)) => {
                warn!("Extraction task failed for {}: {}", path.display(), e);
                return FileOutcome::Failed;
            }
            Ok(Ok(Err(outcome))) => return outcome,
            Ok(Ok(Ok(None))) => return FileOutcome::Clean,
            Ok(Ok(Ok(Some(findings)))) => findings,
        };

        let store = Arc::clone(&self.store);
        let copied = tokio::task::spawn_blocking(move || {
            let result = store.quarantine(&findings);
            (result, findings)
        })
        .await;

        match copied {
            Ok((Ok(name), findings)) => FileOutcome::Quarantined { name, findings },
            Ok((Err(e), _)) => {
                warn!("Could not quarantine {}: {}", path.display(), e);
                FileOutcome::CopyFailed
            }
            Err(e) => {
                warn!("Copy task failed for {}: {}", path.display(), e);
                FileOutcome::CopyFailed
            }
        }
    }

    /// Blocking part of a file task
    fn search(
        &self,
        path: &Path,
        extractor: &dyn TextExtractor,
    ) -> Result<Option<FileFindings>, FileOutcome> {
        let size = match fs::metadata(path) {
            Ok(meta) => meta.len(),
            Err(e) => {
                debug!("Cannot stat {}: {}", path.display(), e);
                return Err(FileOutcome::Skipped(SkipReason::Unreadable));
            }
        };
        if size > self.max_size {
            debug!("Too large ({} bytes): {}", size, path.display());
            return Err(FileOutcome::Skipped(SkipReason::TooLarge));
        }

        process_file(path, extractor, &self.keywords, self.match_limit).map_err(|e| {
            debug!("{} failed on {}: {}", extractor.name(), path.display(), e);
            FileOutcome::Failed
        })
    }
}

fn check_root(root: &Path) -> Result<(), ScanError> {
    let inaccessible = |reason: String| ScanError::RootInaccessible {
        path: root.to_path_buf(),
        reason,
    };

    let meta = fs::metadata(root).map_err(|e| inaccessible(e.to_string()))?;
    if !meta.is_dir() {
        return Err(inaccessible("not a directory".to_string()));
    }
    fs::read_dir(root).map_err(|e| inaccessible(e.to_string()))?;
    Ok(())
}

fn collect<F>(result: Result<FileOutcome, JoinError>, metrics: &mut ScanMetrics, on_match: &mut F)
where
    F: FnMut(&str, &FileFindings),
{
    let outcome = match result {
        Ok(outcome) => outcome,
        Err(e) => {
            warn!("File task failed: {}", e);
            metrics.record_error();
            return;
        }
    };

    match outcome {
        FileOutcome::Clean => metrics.record_clean(),
        FileOutcome::Quarantined { name, findings } => {
            metrics.record_quarantined(findings.snippets.len());
            on_match(&name, &findings);
        }
        FileOutcome::CopyFailed => metrics.record_copy_failure(),
        FileOutcome::Skipped(reason) => metrics.record_skip(reason, 1),
        FileOutcome::Failed => metrics.record_error(),
        FileOutcome::TimedOut => metrics.record_timeout(),
    }
}

fn record_walk(stats: &WalkStats, metrics: &mut ScanMetrics) {
    if stats.symlinks > 0 {
        debug!("{} symlink(s) not followed", stats.symlinks);
    }
    if stats.unreadable > 0 {
        metrics.record_skip(SkipReason::Unreadable, stats.unreadable);
    }
}
