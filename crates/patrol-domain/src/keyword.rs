//! Keyword store - the list of sensitive terms searched for in every file

use regex::{Regex, RegexBuilder};
use std::fmt;
use std::path::Path;
use tracing::{debug, warn};

/// A single search term
///
/// Keywords are stored lowercase. Each one carries a pre-compiled
/// case-insensitive literal pattern so that matching reports offsets into the
/// original, case-preserved text.
#[derive(Debug, Clone)]
pub struct Keyword {
    text: String,
    pattern: Regex,
}

impl Keyword {
    /// Create a keyword from raw input (trimmed and lowercased)
    ///
    /// Fails only when the pattern exceeds the regex size limit.
    pub fn new(raw: &str) -> Result<Self, regex::Error> {
        let text = raw.trim().to_lowercase();
        let pattern = RegexBuilder::new(&regex::escape(&text))
            .case_insensitive(true)
            .build()?;
        Ok(Self { text, pattern })
    }

    /// The normalized keyword text
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Whether this is the degenerate empty keyword (from a blank line)
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Case-insensitive pattern for this keyword
    pub fn pattern(&self) -> &Regex {
        &self.pattern
    }
}

impl PartialEq for Keyword {
    fn eq(&self, other: &Self) -> bool {
        self.text == other.text
    }
}

impl Eq for Keyword {}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Ordered set of keywords loaded once per run
///
/// Order is the order of the source file and decides which keyword is
/// searched first.
#[derive(Debug, Clone, Default)]
pub struct KeywordSet {
    keywords: Vec<Keyword>,
}

impl KeywordSet {
    /// Build a keyword set from newline-delimited text
    ///
    /// Every line becomes a keyword, including blank lines (which become the
    /// empty keyword and match everywhere). A line too long to compile is
    /// logged and skipped.
    ///
    /// # Examples
    ///
    /// ```
    /// use patrol_domain::KeywordSet;
    ///
    /// let set = KeywordSet::from_lines("  Password \nSECRET\n");
    /// let words: Vec<&str> = set.iter().map(|k| k.as_str()).collect();
    /// assert_eq!(words, vec!["password", "secret"]);
    /// ```
    pub fn from_lines(contents: &str) -> Self {
        let keywords: Vec<Keyword> = contents
            .lines()
            .enumerate()
            .filter_map(|(index, line)| match Keyword::new(line) {
                Ok(keyword) => Some(keyword),
                Err(e) => {
                    warn!("Skipping keyword on line {} ({} bytes): {}", index + 1, line.len(), e);
                    None
                }
            })
            .collect();

        if keywords.iter().any(Keyword::is_empty) {
            warn!("Keyword list contains a blank entry; it will match every scanned file");
        }

        Self { keywords }
    }

    /// Load keywords from a file
    ///
    /// Fails softly: a missing or unreadable file is logged and yields an
    /// empty set, so the scan runs and matches nothing.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(contents) => {
                let set = Self::from_lines(&contents);
                debug!("Loaded {} keywords from {}", set.len(), path.display());
                set
            }
            Err(e) => {
                warn!("Error loading keywords from {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Iterate keywords in file order
    pub fn iter(&self) -> std::slice::Iter<'_, Keyword> {
        self.keywords.iter()
    }

    /// Number of keywords
    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    /// Whether the set has no keywords at all
    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }
}

impl<'a> IntoIterator for &'a KeywordSet {
    type Item = &'a Keyword;
    type IntoIter = std::slice::Iter<'a, Keyword>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
