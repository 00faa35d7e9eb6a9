//! Streaming directory traversal

use std::fs;
use std::path::{Path, PathBuf};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use walkdir::{DirEntry, WalkDir};

/// Counters collected while walking a tree
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WalkStats {
    /// Regular files sent to the dispatcher
    pub files: u64,
    /// Symlinks that were not followed
    pub symlinks: u64,
    /// Entries that could not be read
    pub unreadable: u64,
}

/// Walk `root` and send every regular file to `tx`
///
/// Runs on the calling thread and blocks when the channel is full. Symlinks
/// are never followed. Entries whose canonical path is in `excluded` are
/// pruned, directories with everything below them. Stops early when
/// `cancel` fires or the receiver is dropped.
pub fn walk(
    root: &Path,
    excluded: &[PathBuf],
    tx: &mpsc::Sender<PathBuf>,
    cancel: &CancellationToken,
) -> WalkStats {
    let mut stats = WalkStats::default();
    let entries = WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_entry(|entry| !is_excluded(entry, excluded));

    for entry in entries {
        if cancel.is_cancelled() {
            debug!("Walk cancelled after {} file(s)", stats.files);
            break;
        }

        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                debug!("Skipping unreadable entry: {}", e);
                stats.unreadable += 1;
                continue;
            }
        };

        let file_type = entry.file_type();
        if file_type.is_symlink() {
            debug!("Skipping symlink: {}", entry.path().display());
            stats.symlinks += 1;
            continue;
        }
        if !file_type.is_file() {
            continue;
        }

        if tx.blocking_send(entry.into_path()).is_err() {
            debug!("Dispatcher closed; stopping walk");
            break;
        }
        stats.files += 1;
    }

    stats
}

/// Names are compared first so only candidates are canonicalized
fn is_excluded(entry: &DirEntry, excluded: &[PathBuf]) -> bool {
    let hit = excluded.iter().any(|path| {
        path.file_name() == Some(entry.file_name())
            && fs::canonicalize(entry.path()).is_ok_and(|canonical| &canonical == path)
    });
    if hit {
        debug!("Excluded from walk: {}", entry.path().display());
    }
    hit
}
