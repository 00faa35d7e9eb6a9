//! PassPatrol Storage Layer
//!
//! Evidence handling for a scan run: matching files are copied into a
//! timestamped quarantine folder and described in `report.json`; files
//! flagged by extension alone are listed in `interesting_files.json`.
//!
//! # Layout
//!
//! ```text
//! downloaded_files_20240315_093000/
//! ├── report.json              { "<copied name>": { original_path, snippets, verdicts } }
//! ├── interesting_files.json   [ "<original path>", ... ]
//! ├── passwords.txt
//! └── passwords_1.txt
//! ```
//!
//! # Examples
//!
//! ```no_run
//! use patrol_store::QuarantineStore;
//! use std::path::Path;
//!
//! let store = QuarantineStore::create(Path::new("."), chrono::Local::now().naive_local()).unwrap();
//! let name = store.copy(Path::new("/mnt/share/notes.txt")).unwrap();
//! store.finalize().unwrap();
//! ```

#![warn(missing_docs)]

pub mod error;
pub mod manifest;
pub mod quarantine;
pub mod report;

pub use error::StoreError;
pub use manifest::{mark, unmark, Manifest, ManifestEntry, VerdictRecord};
pub use quarantine::{QuarantineStore, ReportPaths, FOLDER_PREFIX, INTERESTING_FILE, REPORT_FILE};
pub use report::{read_json, read_report, write_json_atomic, write_report};
