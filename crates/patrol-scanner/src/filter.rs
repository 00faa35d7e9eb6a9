//! Extension filter applied before a file is dispatched

use std::fs;
use std::path::Path;
use tracing::{debug, warn};

/// How the entries of an extension file are applied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterMode {
    /// Skip files ending with any entry
    #[default]
    Blacklist,
    /// Only scan files ending with an entry
    Whitelist,
}

/// Path-suffix filter loaded from a newline-delimited file
///
/// Entries are compared against the lowercased full path with `ends_with`,
/// so `.bak` and `backup.bak` are both valid entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionFilter {
    mode: FilterMode,
    entries: Option<Vec<String>>,
}

impl ExtensionFilter {
    /// A filter that allows every file
    pub fn allow_all() -> Self {
        Self {
            mode: FilterMode::Blacklist,
            entries: None,
        }
    }

    /// Build a filter from in-memory text; blank lines are ignored
    pub fn from_lines(contents: &str, mode: FilterMode) -> Self {
        let entries = contents
            .lines()
            .map(|line| line.trim().to_lowercase())
            .filter(|line| !line.is_empty())
            .collect();
        Self {
            mode,
            entries: Some(entries),
        }
    }

    /// Load a filter from `path`
    ///
    /// A file that cannot be read disables filtering; the problem is logged
    /// and the scan continues.
    pub fn load(path: impl AsRef<Path>, mode: FilterMode) -> Self {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(contents) => {
                let filter = Self::from_lines(&contents, mode);
                debug!(
                    "Loaded {} {:?} entries from {}",
                    filter.len(),
                    mode,
                    path.display()
                );
                filter
            }
            Err(e) => {
                warn!(
                    "Extension file {} not loaded ({}); scanning without a filter",
                    path.display(),
                    e
                );
                Self::allow_all()
            }
        }
    }

    /// Filter mode
    pub fn mode(&self) -> FilterMode {
        self.mode
    }

    /// Number of loaded entries
    pub fn len(&self) -> usize {
        self.entries.as_ref().map_or(0, Vec::len)
    }

    /// Check if no entries are loaded
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether `path` should be scanned
    pub fn allows(&self, path: &Path) -> bool {
        let Some(entries) = &self.entries else {
            return true;
        };

        let lowered = path.to_string_lossy().to_lowercase();
        let listed = entries.iter().any(|entry| lowered.ends_with(entry.as_str()));
        match self.mode {
            FilterMode::Blacklist => !listed,
            FilterMode::Whitelist => listed,
        }
    }
}

impl Default for ExtensionFilter {
    fn default() -> Self {
        Self::allow_all()
    }
}
