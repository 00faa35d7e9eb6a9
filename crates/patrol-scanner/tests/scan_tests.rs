//! End-to-end scans over temporary directory trees

use patrol_domain::{KeywordSet, TextUnit};
use patrol_extractor::{ExtractError, ExtractorRegistry, TextExtractor, TextUnits};
use patrol_scanner::{
    ExtensionFilter, FilterMode, ScanConfig, ScanError, ScanSummary, Scanner, SkipReason,
};
use patrol_store::{read_json, read_report, FOLDER_PREFIX};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;

/// Reads the file as one unit after sleeping
struct SlowExtractor(Duration);

impl TextExtractor for SlowExtractor {
    fn name(&self) -> &'static str {
        "slow"
    }

    fn units(&self, path: &Path) -> Result<TextUnits, ExtractError> {
        std::thread::sleep(self.0);
        let text = fs::read_to_string(path)?;
        Ok(Box::new(std::iter::once(Ok(TextUnit::whole(text)))))
    }
}

struct Fixture {
    root: TempDir,
    out: TempDir,
}

impl Fixture {
    fn new() -> Self {
        Self {
            root: tempfile::tempdir().unwrap(),
            out: tempfile::tempdir().unwrap(),
        }
    }

    fn write(&self, relative: &str, contents: &[u8]) {
        let path = self.root.path().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, contents).unwrap();
    }

    fn scanner(&self, filter: ExtensionFilter) -> Scanner {
        self.scanner_with(ScanConfig::default(), filter)
    }

    fn scanner_with(&self, config: ScanConfig, filter: ExtensionFilter) -> Scanner {
        let config = ScanConfig {
            output_dir: self.out.path().to_path_buf(),
            workers: Some(4),
            ..config
        };
        let registry = config.registry();
        build(config, filter, registry)
    }

    /// Scanner whose `.slow` files take `delay` each to extract
    fn slow_scanner(&self, config: ScanConfig, delay: Duration) -> Scanner {
        let config = ScanConfig {
            output_dir: self.out.path().to_path_buf(),
            workers: Some(4),
            ..config
        };
        let mut registry = config.registry();
        registry.register("slow", Arc::new(SlowExtractor(delay)));
        build(config, ExtensionFilter::allow_all(), registry)
    }

    fn path(&self, relative: &str) -> String {
        self.root.path().join(relative).to_string_lossy().into_owned()
    }
}

fn build(config: ScanConfig, filter: ExtensionFilter, registry: ExtractorRegistry) -> Scanner {
    Scanner::new(config, KeywordSet::from_lines("password\n"), filter, registry).unwrap()
}

async fn scan(scanner: &Scanner, root: &Path) -> ScanSummary {
    scanner
        .run(root, CancellationToken::new(), |_, _| {})
        .await
        .unwrap()
}

fn interesting(summary: &ScanSummary) -> Vec<String> {
    read_json(&summary.report.interesting).unwrap()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_text_file_is_quarantined() {
    let fx = Fixture::new();
    fx.write("a.txt", b"my password: hunter2");

    let summary = scan(&fx.scanner(ExtensionFilter::allow_all()), fx.root.path()).await;

    let folder_name = summary.report.folder.file_name().unwrap().to_string_lossy();
    assert!(folder_name.starts_with(FOLDER_PREFIX));
    assert_eq!(summary.report.folder.parent().unwrap(), fx.out.path());
    assert_eq!(
        fs::read(summary.report.folder.join("a.txt")).unwrap(),
        b"my password: hunter2"
    );

    let manifest = read_report(&summary.report.report).unwrap();
    assert_eq!(manifest.len(), 1);
    let entry = &manifest["a.txt"];
    assert_eq!(entry.original_path, fx.path("a.txt"));
    assert_eq!(entry.snippets, vec!["my **password**: hunter2".to_string()]);
    assert!(entry.verdicts.is_empty());

    assert_eq!(summary.metrics.discovered, 1);
    assert_eq!(summary.metrics.quarantined, 1);
    assert_eq!(summary.metrics.snippets, 1);
    assert!(!summary.cancelled);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_unknown_extension_is_skipped() {
    let fx = Fixture::new();
    fx.write("blob.bin", b"password");

    let summary = scan(&fx.scanner(ExtensionFilter::allow_all()), fx.root.path()).await;

    assert!(read_report(&summary.report.report).unwrap().is_empty());
    assert!(interesting(&summary).is_empty());
    assert_eq!(summary.metrics.skipped[&SkipReason::NoHandler], 1);
    assert_eq!(summary.metrics.errored, 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_credential_store_is_listed_not_read() {
    let fx = Fixture::new();
    fx.write("vault/secret.kdbx", b"password");

    let summary = scan(&fx.scanner(ExtensionFilter::allow_all()), fx.root.path()).await;

    assert_eq!(interesting(&summary), vec![fx.path("vault/secret.kdbx")]);
    assert!(read_report(&summary.report.report).unwrap().is_empty());
    assert_eq!(summary.metrics.interesting, 1);
    assert_eq!(summary.metrics.scanned, 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_match_limit_caps_snippets() {
    let fx = Fixture::new();
    fx.write("dump.log", "password\n".repeat(15).as_bytes());

    let summary = scan(&fx.scanner(ExtensionFilter::allow_all()), fx.root.path()).await;

    let manifest = read_report(&summary.report.report).unwrap();
    assert_eq!(manifest["dump.log"].snippets.len(), 10);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_same_name_from_two_folders() {
    let fx = Fixture::new();
    fx.write("hr/report.txt", b"hr password");
    fx.write("it/report.txt", b"it password");

    let summary = scan(&fx.scanner(ExtensionFilter::allow_all()), fx.root.path()).await;

    let manifest = read_report(&summary.report.report).unwrap();
    let mut names: Vec<&String> = manifest.keys().collect();
    names.sort();
    assert_eq!(names, vec!["report.txt", "report_1.txt"]);

    let mut originals: Vec<&str> = manifest.values().map(|e| e.original_path.as_str()).collect();
    originals.sort();
    assert_eq!(originals, vec![fx.path("hr/report.txt"), fx.path("it/report.txt")]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_filters_apply() {
    let fx = Fixture::new();
    fx.write("keep.txt", b"password");
    fx.write("drop.log", b"password");

    let blacklist = ExtensionFilter::from_lines(".log\n", FilterMode::Blacklist);
    let summary = scan(&fx.scanner(blacklist), fx.root.path()).await;
    let manifest = read_report(&summary.report.report).unwrap();
    assert!(manifest.contains_key("keep.txt"));
    assert!(!manifest.contains_key("drop.log"));
    assert_eq!(summary.metrics.skipped[&SkipReason::Filtered], 1);

    let whitelist = ExtensionFilter::from_lines(".log\n", FilterMode::Whitelist);
    let summary = scan(&fx.scanner(whitelist), fx.root.path()).await;
    let manifest = read_report(&summary.report.report).unwrap();
    assert_eq!(manifest.keys().collect::<Vec<_>>(), vec!["drop.log"]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_whitelisted_extension_without_handler_is_read_as_text() {
    let fx = Fixture::new();
    fx.write("db.bak", b"password=hunter2");
    fx.write("notes.txt", b"password=hunter2");

    let whitelist = ExtensionFilter::from_lines(".bak\n", FilterMode::Whitelist);
    let summary = scan(&fx.scanner(whitelist), fx.root.path()).await;

    let manifest = read_report(&summary.report.report).unwrap();
    assert_eq!(manifest.keys().collect::<Vec<_>>(), vec!["db.bak"]);
    assert_eq!(manifest["db.bak"].snippets, vec!["**password**=hunter2".to_string()]);
    assert_eq!(summary.metrics.skipped[&SkipReason::Filtered], 1);
    assert!(!summary.metrics.skipped.contains_key(&SkipReason::NoHandler));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_output_inside_root_is_not_rescanned() {
    let fx = Fixture::new();
    for dir in 0..3 {
        for file in 0..10 {
            fx.write(&format!("d{0}/f{0}{1}.txt", dir, file), b"password=hunter2");
        }
    }
    fx.write("keywords.txt", b"password\n");

    let config = ScanConfig {
        output_dir: fx.root.path().to_path_buf(),
        keywords_file: fx.root.path().join("keywords.txt"),
        workers: Some(4),
        ..ScanConfig::default()
    };
    let registry = config.registry();
    let scanner = build(config, ExtensionFilter::allow_all(), registry);
    let summary = scan(&scanner, fx.root.path()).await;

    let manifest = read_report(&summary.report.report).unwrap();
    assert_eq!(manifest.len(), 30);
    assert!(manifest.keys().all(|name| !name.contains('_')));
    assert!(manifest
        .values()
        .all(|entry| !entry.original_path.contains(FOLDER_PREFIX)));
    assert_eq!(summary.metrics.discovered, 30);
    assert_eq!(summary.metrics.quarantined, 30);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_slow_file_times_out_others_complete() {
    let fx = Fixture::new();
    fx.write("stuck.slow", b"password in a slow file");
    fx.write("quick.txt", b"password=hunter2");

    let config = ScanConfig {
        file_timeout_secs: 1,
        ..ScanConfig::default()
    };
    let scanner = fx.slow_scanner(config, Duration::from_secs(3));
    let summary = scan(&scanner, fx.root.path()).await;

    assert_eq!(summary.metrics.timed_out, 1);
    assert_eq!(summary.metrics.quarantined, 1);
    let manifest = read_report(&summary.report.report).unwrap();
    assert_eq!(manifest.keys().collect::<Vec<_>>(), vec!["quick.txt"]);
    assert!(!summary.cancelled);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_cancel_during_scan_keeps_finished_work() {
    let fx = Fixture::new();
    for i in 0..40 {
        fx.write(&format!("f{:02}.slow", i), b"password=hunter2");
    }

    let scanner = fx.slow_scanner(ScanConfig::default(), Duration::from_millis(200));
    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    let summary = scanner
        .run(fx.root.path(), cancel, |_, _| trigger.cancel())
        .await
        .unwrap();

    assert!(summary.cancelled);
    assert!(summary.metrics.quarantined >= 1);
    assert!(summary.metrics.quarantined < 40);

    let manifest = read_report(&summary.report.report).unwrap();
    assert_eq!(manifest.len() as u64, summary.metrics.quarantined);
    for name in manifest.keys() {
        assert!(summary.report.folder.join(name).exists());
    }
    let copies = fs::read_dir(&summary.report.folder).unwrap().count();
    assert_eq!(copies, manifest.len() + 2);
    assert!(interesting(&summary).is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_oversized_file_is_skipped() {
    let fx = Fixture::new();
    let mut big = b"password\n".to_vec();
    big.resize(2 * 1024 * 1024, b'x');
    fx.write("big.txt", &big);

    let config = ScanConfig {
        max_file_size_mb: 1,
        ..ScanConfig::default()
    };
    let scanner = fx.scanner_with(config, ExtensionFilter::allow_all());
    let summary = scan(&scanner, fx.root.path()).await;

    assert!(read_report(&summary.report.report).unwrap().is_empty());
    assert_eq!(summary.metrics.skipped[&SkipReason::TooLarge], 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_on_match_callback() {
    let fx = Fixture::new();
    fx.write("a.txt", b"password one");
    fx.write("b.txt", b"password two");
    fx.write("c.txt", b"nothing");

    let scanner = fx.scanner(ExtensionFilter::allow_all());
    let mut seen = Vec::new();
    let summary = scanner
        .run(fx.root.path(), CancellationToken::new(), |name, findings| {
            seen.push((name.to_string(), findings.snippets.len()));
        })
        .await
        .unwrap();

    seen.sort();
    assert_eq!(seen, vec![("a.txt".to_string(), 1), ("b.txt".to_string(), 1)]);
    assert_eq!(summary.metrics.scanned, 3);
    assert_eq!(summary.metrics.matched, 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_cancelled_scan_still_writes_report() {
    let fx = Fixture::new();
    for i in 0..20 {
        fx.write(&format!("f{}.txt", i), b"password");
    }

    let cancel = CancellationToken::new();
    cancel.cancel();
    let scanner = fx.scanner(ExtensionFilter::allow_all());
    let summary = scanner.run(fx.root.path(), cancel, |_, _| {}).await.unwrap();

    assert!(summary.cancelled);
    assert!(summary.report.report.exists());
    assert!(summary.report.interesting.exists());
    let manifest = read_report(&summary.report.report).unwrap();
    assert_eq!(manifest.len() as u64, summary.metrics.quarantined);
}

#[tokio::test]
async fn test_missing_root_is_an_error() {
    let fx = Fixture::new();
    let scanner = fx.scanner(ExtensionFilter::allow_all());
    let result = scanner
        .run(&fx.root.path().join("missing"), CancellationToken::new(), |_, _| {})
        .await;

    assert!(matches!(result, Err(ScanError::RootInaccessible { .. })));
    assert_eq!(fs::read_dir(fx.out.path()).unwrap().count(), 0);
}

#[test]
fn test_default_registry_matches_config_registry() {
    let registry = ExtractorRegistry::default();
    let configured = ScanConfig::default().registry();
    assert_eq!(format!("{:?}", registry), format!("{:?}", configured));
}
