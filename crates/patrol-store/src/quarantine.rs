//! The per-run quarantine folder

use crate::error::StoreError;
use crate::manifest::{Manifest, ManifestEntry};
use crate::report::write_json_atomic;
use chrono::NaiveDateTime;
use patrol_domain::FileFindings;
use serde::Serialize;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::{debug, info};

/// Prefix of every quarantine folder name
pub const FOLDER_PREFIX: &str = "downloaded_files_";

/// Name of the report document inside the folder
pub const REPORT_FILE: &str = "report.json";

/// Name of the interesting-file list inside the folder
pub const INTERESTING_FILE: &str = "interesting_files.json";

/// Upper bound on `name_N` candidates tried for a single copy
const MAX_NAME_ATTEMPTS: usize = 100_000;

/// Where a finalized run's artifacts live
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportPaths {
    /// The quarantine folder
    pub folder: PathBuf,
    /// `report.json`
    pub report: PathBuf,
    /// `interesting_files.json`
    pub interesting: PathBuf,
}

/// Collision-safe evidence store for one scan run
///
/// Safe to share between workers: name selection is an exclusive-create
/// reservation on the filesystem, and the manifest and interesting list are
/// each behind a mutex held only for a single insert.
#[derive(Debug)]
pub struct QuarantineStore {
    paths: ReportPaths,
    manifest: Mutex<Manifest>,
    interesting: Mutex<Vec<String>>,
}

impl QuarantineStore {
    /// Create `downloaded_files_<timestamp>` under `base_dir`
    ///
    /// `report.json` (`{}`) and `interesting_files.json` (`[]`) are written
    /// immediately, so they are valid documents from the start and no
    /// quarantined copy can take their names. If a folder for the same second
    /// already exists, `_1`, `_2`, ... is appended.
    pub fn create(base_dir: &Path, timestamp: NaiveDateTime) -> Result<Self, StoreError> {
        fs::create_dir_all(base_dir)?;

        let stamp = format!("{}{}", FOLDER_PREFIX, timestamp.format("%Y%m%d_%H%M%S"));
        let folder = create_unique_dir(base_dir, &stamp)?;

        let paths = ReportPaths {
            report: folder.join(REPORT_FILE),
            interesting: folder.join(INTERESTING_FILE),
            folder,
        };
        reserve(&paths.report, b"{}\n")?;
        reserve(&paths.interesting, b"[]\n")?;

        info!("Quarantine folder: {}", paths.folder.display());
        Ok(Self {
            paths,
            manifest: Mutex::new(Manifest::new()),
            interesting: Mutex::new(Vec::new()),
        })
    }

    /// The quarantine folder
    pub fn folder(&self) -> &Path {
        &self.paths.folder
    }

    /// Paths of the folder and its report documents
    pub fn paths(&self) -> &ReportPaths {
        &self.paths
    }

    /// Copy `source` into the folder under a name no other copy holds
    ///
    /// Candidates are `name.ext`, `name_1.ext`, `name_2.ext`, ... Each is
    /// claimed with an exclusive create before any bytes are written; if the
    /// copy then fails the claim is removed.
    pub fn copy(&self, source: &Path) -> Result<String, StoreError> {
        let file_name = source
            .file_name()
            .ok_or_else(|| StoreError::InvalidSource(source.display().to_string()))?
            .to_string_lossy()
            .into_owned();

        let mut reader = File::open(source)?;
        let mut reserved = None;
        for attempt in 0..MAX_NAME_ATTEMPTS {
            let candidate = candidate_name(source, &file_name, attempt);
            let target = self.paths.folder.join(&candidate);
            match OpenOptions::new().write(true).create_new(true).open(&target) {
                Ok(file) => {
                    reserved = Some((candidate, target, file));
                    break;
                }
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(e.into()),
            }
        }

        let (name, target, file) =
            reserved.ok_or_else(|| StoreError::NameExhausted(file_name.clone()))?;

        let mut writer = BufWriter::new(file);
        let copied = io::copy(&mut reader, &mut writer).and_then(|_| writer.flush());
        if let Err(e) = copied {
            drop(writer);
            if let Err(remove) = fs::remove_file(&target) {
                debug!("Could not remove partial copy {}: {}", target.display(), remove);
            }
            return Err(e.into());
        }

        debug!("Copied {} -> {}", source.display(), name);
        Ok(name)
    }

    /// Add a manifest entry for an already copied file
    pub fn record(&self, copied_name: impl Into<String>, entry: ManifestEntry) {
        lock(&self.manifest).insert(copied_name.into(), entry);
    }

    /// Copy a matching file and record its findings in one step
    pub fn quarantine(&self, findings: &FileFindings) -> Result<String, StoreError> {
        let name = self.copy(findings.path())?;
        self.record(name.clone(), ManifestEntry::from_findings(findings));
        Ok(name)
    }

    /// Note a file flagged by extension alone
    pub fn record_interesting(&self, path: &Path) {
        lock(&self.interesting).push(path.to_string_lossy().into_owned());
    }

    /// Number of quarantined files recorded so far
    pub fn quarantined_count(&self) -> usize {
        lock(&self.manifest).len()
    }

    /// Number of interesting files recorded so far
    pub fn interesting_count(&self) -> usize {
        lock(&self.interesting).len()
    }

    /// Snapshot of the manifest
    pub fn manifest(&self) -> Manifest {
        lock(&self.manifest).clone()
    }

    /// Write `report.json` and `interesting_files.json`
    ///
    /// The interesting list is sorted so repeated runs over the same tree
    /// produce identical documents.
    pub fn finalize(&self) -> Result<ReportPaths, StoreError> {
        let manifest = self.manifest();
        let mut interesting = lock(&self.interesting).clone();
        interesting.sort();
        interesting.dedup();

        write_json_atomic(&self.paths.report, &manifest)?;
        write_json_atomic(&self.paths.interesting, &interesting)?;

        info!(
            "Report written: {} quarantined, {} interesting",
            manifest.len(),
            interesting.len()
        );
        Ok(self.paths.clone())
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn create_unique_dir(base_dir: &Path, stem: &str) -> Result<PathBuf, StoreError> {
    for attempt in 0..MAX_NAME_ATTEMPTS {
        let name = match attempt {
            0 => stem.to_string(),
            n => format!("{}_{}", stem, n),
        };
        let folder = base_dir.join(name);
        match fs::create_dir(&folder) {
            Ok(()) => return Ok(folder),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => continue,
            Err(e) => return Err(e.into()),
        }
    }
    Err(StoreError::NameExhausted(stem.to_string()))
}

fn reserve(path: &Path, content: &[u8]) -> Result<(), StoreError> {
    let mut file = OpenOptions::new().write(true).create_new(true).open(path)?;
    file.write_all(content)?;
    Ok(())
}

/// `name.ext` for attempt 0, then `name_N.ext`
fn candidate_name(source: &Path, file_name: &str, attempt: usize) -> String {
    if attempt == 0 {
        return file_name.to_string();
    }
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| file_name.to_string());
    match source.extension() {
        Some(ext) => format!("{}_{}.{}", stem, attempt, ext.to_string_lossy()),
        None => format!("{}_{}", stem, attempt),
    }
}
