//! Configuration for scan runs
//!
//! Defines the per-file match limit, worker pool size, timeouts and the input
//! files a scan reads its keywords and extension filter from.

use patrol_domain::DEFAULT_MATCH_LIMIT;
use patrol_extractor::{normalize_extension, ExtractorRegistry, UnknownPolicy};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Configuration for a scan
///
/// # Examples
///
/// ```
/// use patrol_scanner::ScanConfig;
///
/// // Default configuration
/// let config = ScanConfig::default();
/// assert_eq!(config.match_limit, 10);
///
/// // Fast triage of a large share
/// let config = ScanConfig::quick();
/// assert_eq!(config.match_limit, 3);
///
/// // Slow, exhaustive pass
/// let config = ScanConfig::thorough();
/// assert_eq!(config.file_timeout_secs, 600);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Maximum number of matches recorded per file
    /// Default: 10
    pub match_limit: usize,

    /// Number of files processed concurrently
    /// Default: None (one per CPU)
    pub workers: Option<usize>,

    /// Soft time limit for extracting and searching one file (in seconds)
    /// Default: 120
    pub file_timeout_secs: u64,

    /// Files larger than this are skipped (in MiB)
    /// Default: 100
    pub max_file_size_mb: u64,

    /// Extensions flagged as interesting in addition to the built-in list
    pub interesting_extensions: Vec<String>,

    /// What to do with extensions no extractor handles
    /// Default: skip
    pub unknown_extensions: UnknownPolicy,

    /// Directory the `downloaded_files_*` folder is created in
    /// Default: current directory
    pub output_dir: PathBuf,

    /// Newline-delimited keyword list
    /// Default: keywords.txt
    pub keywords_file: PathBuf,

    /// Newline-delimited extension filter
    /// Default: blacklist.txt
    pub extensions_file: PathBuf,

    /// Treat the extension file as a whitelist instead of a blacklist
    /// Default: false
    pub whitelist: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            match_limit: DEFAULT_MATCH_LIMIT,
            workers: None,
            file_timeout_secs: 120,
            max_file_size_mb: 100,
            interesting_extensions: Vec::new(),
            unknown_extensions: UnknownPolicy::Skip,
            output_dir: PathBuf::from("."),
            keywords_file: PathBuf::from("keywords.txt"),
            extensions_file: PathBuf::from("blacklist.txt"),
            whitelist: false,
        }
    }
}

impl ScanConfig {
    /// Quick triage configuration
    ///
    /// - Match limit: 3
    /// - File timeout: 30 seconds
    /// - Max file size: 20 MiB
    pub fn quick() -> Self {
        Self {
            match_limit: 3,
            file_timeout_secs: 30,
            max_file_size_mb: 20,
            ..Self::default()
        }
    }

    /// Exhaustive configuration
    ///
    /// - Match limit: 50
    /// - File timeout: 10 minutes
    /// - Max file size: 1 GiB
    /// - Unknown extensions read as plain text
    pub fn thorough() -> Self {
        Self {
            match_limit: 50,
            file_timeout_secs: 600,
            max_file_size_mb: 1024,
            unknown_extensions: UnknownPolicy::PlainText,
            ..Self::default()
        }
    }

    /// Number of concurrent file tasks
    pub fn worker_count(&self) -> usize {
        self.workers.unwrap_or_else(num_cpus::get).max(1)
    }

    /// Get the per-file timeout as Duration
    pub fn file_timeout(&self) -> Duration {
        Duration::from_secs(self.file_timeout_secs)
    }

    /// Get the size limit in bytes
    pub fn max_file_size_bytes(&self) -> u64 {
        self.max_file_size_mb.saturating_mul(1024 * 1024)
    }

    /// Build the extractor registry this configuration describes
    pub fn registry(&self) -> ExtractorRegistry {
        let mut registry = ExtractorRegistry::with_defaults(self.unknown_extensions);
        for ext in &self.interesting_extensions {
            registry.flag_interesting(ext);
        }
        registry
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.match_limit == 0 {
            return Err("match_limit must be > 0".to_string());
        }
        if self.workers == Some(0) {
            return Err("workers must be > 0".to_string());
        }
        if self.file_timeout_secs == 0 {
            return Err("file_timeout_secs must be > 0".to_string());
        }
        if self.max_file_size_mb == 0 {
            return Err("max_file_size_mb must be > 0".to_string());
        }
        if let Some(ext) = self
            .interesting_extensions
            .iter()
            .find(|ext| normalize_extension(ext).is_empty())
        {
            return Err(format!("invalid interesting extension: {:?}", ext));
        }
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}
