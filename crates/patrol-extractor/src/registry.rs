//! Routing files to extractors by extension

use crate::extractor::TextExtractor;
use crate::legacy::LegacyBinaryExtractor;
use crate::opendocument::OpenDocumentExtractor;
use crate::pdf::PdfExtractor;
use crate::plain::PlainTextExtractor;
use crate::presentation::PresentationExtractor;
use crate::spreadsheet::SpreadsheetExtractor;
use crate::word::WordExtractor;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

/// Extensions read as plain text
pub const PLAIN_TEXT_EXTENSIONS: &[&str] = &[
    "txt", "log", "cfg", "conf", "config", "ini", "inf", "xml", "json", "yml", "yaml", "csv",
    "tsv", "md", "ps1", "psm1", "bat", "cmd", "sh", "vbs", "sql", "properties", "env", "htm",
    "html", "php", "py", "reg", "rdp", "toml",
];

/// Extensions flagged as interesting without reading their content
pub const INTERESTING_EXTENSIONS: &[&str] = &[
    "kdbx", "kdb", "psafe3", "keychain", "pfx", "p12", "jks", "ppk", "vmdk", "vhd", "vhdx",
    "vdi", "qcow2",
];

/// What to do with a file whose extension has no registered handler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownPolicy {
    /// Skip the file (logged at debug)
    #[default]
    Skip,
    /// Read it as plain text
    PlainText,
}

/// How a file should be processed
#[derive(Clone)]
pub enum Handler {
    /// Extract text and search it
    Content(Arc<dyn TextExtractor>),
    /// Record the file as interesting; never read it
    Interesting,
}

impl std::fmt::Debug for Handler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Handler::Content(extractor) => write!(f, "Content({})", extractor.name()),
            Handler::Interesting => write!(f, "Interesting"),
        }
    }
}

/// Lowercase an extension and strip any leading dots
///
/// ```
/// use patrol_extractor::normalize_extension;
///
/// assert_eq!(normalize_extension(".DOCX"), "docx");
/// assert_eq!(normalize_extension(" Pdf "), "pdf");
/// ```
pub fn normalize_extension(ext: &str) -> String {
    ext.trim().trim_start_matches('.').to_lowercase()
}

/// Extension → handler table
#[derive(Clone)]
pub struct ExtractorRegistry {
    handlers: HashMap<String, Handler>,
    plain: Arc<dyn TextExtractor>,
    unknown: UnknownPolicy,
}

impl ExtractorRegistry {
    /// Empty registry; files without an extension are still read as text
    pub fn empty(unknown: UnknownPolicy) -> Self {
        Self {
            handlers: HashMap::new(),
            plain: Arc::new(PlainTextExtractor),
            unknown,
        }
    }

    /// Registry with every built-in format and interesting extension
    pub fn with_defaults(unknown: UnknownPolicy) -> Self {
        let mut registry = Self::empty(unknown);

        let plain = Arc::clone(&registry.plain);
        for ext in PLAIN_TEXT_EXTENSIONS {
            registry.register(ext, Arc::clone(&plain));
        }

        registry.register("pdf", Arc::new(PdfExtractor));

        let word: Arc<dyn TextExtractor> = Arc::new(WordExtractor);
        for ext in ["docx", "docm", "dotx"] {
            registry.register(ext, Arc::clone(&word));
        }

        let spreadsheet: Arc<dyn TextExtractor> = Arc::new(SpreadsheetExtractor);
        for ext in ["xlsx", "xlsm", "xlsb", "xls", "ods"] {
            registry.register(ext, Arc::clone(&spreadsheet));
        }

        let presentation: Arc<dyn TextExtractor> = Arc::new(PresentationExtractor);
        for ext in ["pptx", "pptm"] {
            registry.register(ext, Arc::clone(&presentation));
        }

        let open_document: Arc<dyn TextExtractor> = Arc::new(OpenDocumentExtractor);
        for ext in ["odt", "odp"] {
            registry.register(ext, Arc::clone(&open_document));
        }

        registry.register("doc", Arc::new(LegacyBinaryExtractor::word()));
        registry.register("ppt", Arc::new(LegacyBinaryExtractor::presentation()));

        for ext in INTERESTING_EXTENSIONS {
            registry.flag_interesting(ext);
        }

        registry
    }

    /// Route `ext` to `extractor`, replacing any previous handler
    pub fn register(&mut self, ext: &str, extractor: Arc<dyn TextExtractor>) {
        self.handlers
            .insert(normalize_extension(ext), Handler::Content(extractor));
    }

    /// Flag `ext` as interesting, replacing any previous handler
    pub fn flag_interesting(&mut self, ext: &str) {
        self.handlers
            .insert(normalize_extension(ext), Handler::Interesting);
    }

    /// The plain-text extractor used for unregistered files
    pub fn plain_text(&self) -> Arc<dyn TextExtractor> {
        Arc::clone(&self.plain)
    }

    /// Find the handler for `path`, or `None` when it should be skipped
    pub fn handler_for(&self, path: &Path) -> Option<Handler> {
        let ext = match path.extension() {
            Some(ext) => normalize_extension(&ext.to_string_lossy()),
            None => return Some(Handler::Content(Arc::clone(&self.plain))),
        };

        if let Some(handler) = self.handlers.get(&ext) {
            return Some(handler.clone());
        }

        match self.unknown {
            UnknownPolicy::Skip => None,
            UnknownPolicy::PlainText => Some(Handler::Content(Arc::clone(&self.plain))),
        }
    }
}

impl std::fmt::Debug for ExtractorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut extensions: Vec<&String> = self.handlers.keys().collect();
        extensions.sort();
        f.debug_struct("ExtractorRegistry")
            .field("extensions", &extensions)
            .field("unknown", &self.unknown)
            .finish()
    }
}

impl Default for ExtractorRegistry {
    fn default() -> Self {
        Self::with_defaults(UnknownPolicy::default())
    }
}
