//! PassPatrol Scanner
//!
//! Walks a directory tree, extracts text from every supported file, searches
//! it for keywords and quarantines the files that match.
//!
//! # Overview
//!
//! - **Traversal**: `walkdir` on a blocking thread, symlinks never followed,
//!   paths streamed through a bounded channel
//! - **Dispatch**: extension filter, then routing through an
//!   [`ExtractorRegistry`](patrol_extractor::ExtractorRegistry)
//! - **Workers**: one task per file, bounded by a semaphore, extraction on the
//!   blocking pool under a soft per-file timeout
//! - **Evidence**: matching files copied into `downloaded_files_<timestamp>/`
//!   with a `report.json` manifest
//!
//! Nothing that goes wrong with a single file fails the run; it is logged and
//! counted in [`ScanMetrics`].
//!
//! # Usage
//!
//! ```no_run
//! use patrol_scanner::{ScanConfig, Scanner};
//! use std::path::Path;
//! use tokio_util::sync::CancellationToken;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let scanner = Scanner::from_config(ScanConfig::default())?;
//!     let cancel = CancellationToken::new();
//!
//!     let summary = scanner
//!         .run(Path::new("/mnt/share"), cancel, |name, findings| {
//!             println!("{} <- {}", name, findings.original_path.display());
//!         })
//!         .await?;
//!     println!("{}", summary.metrics.summary());
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod filter;
pub mod metrics;
pub mod process;
pub mod scanner;
pub mod walker;

pub use config::ScanConfig;
pub use error::ScanError;
pub use filter::{ExtensionFilter, FilterMode};
pub use metrics::{ScanMetrics, SkipReason};
pub use process::process_file;
pub use scanner::{ScanSummary, Scanner};
pub use walker::{walk, WalkStats};
