//! Keyword matcher - bounded, case-insensitive substring search

use crate::keyword::{Keyword, KeywordSet};

/// Default number of matches recorded per file
pub const DEFAULT_MATCH_LIMIT: usize = 10;

/// A keyword occurrence inside a text unit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    /// The keyword that matched
    pub keyword: Keyword,

    /// Byte offset of the occurrence in the original text
    pub offset: usize,

    /// Byte length of the occurrence in the original text
    ///
    /// Usually equal to the keyword length, but case folding can change the
    /// byte width of non-ASCII characters.
    pub len: usize,
}

impl Match {
    /// Byte offset just past the occurrence
    pub fn end(&self) -> usize {
        self.offset + self.len
    }
}

/// Find keyword occurrences in `text`, stopping after `remaining_limit` matches
///
/// Keywords are searched one after another in set order. For each keyword the
/// scan resumes where the previous occurrence ended, so occurrences of one
/// keyword never overlap. The result is grouped by keyword, not sorted by
/// position.
///
/// # Examples
///
/// ```
/// use patrol_domain::{search, KeywordSet};
///
/// let keywords = KeywordSet::from_lines("password");
/// let matches = search("PASSWORD=x", &keywords, 10);
/// assert_eq!(matches.len(), 1);
/// assert_eq!(matches[0].offset, 0);
/// ```
pub fn search(text: &str, keywords: &KeywordSet, remaining_limit: usize) -> Vec<Match> {
    let mut matches = Vec::new();
    if remaining_limit == 0 {
        return matches;
    }

    for keyword in keywords {
        for found in keyword.pattern().find_iter(text) {
            matches.push(Match {
                keyword: keyword.clone(),
                offset: found.start(),
                len: found.len(),
            });
            if matches.len() >= remaining_limit {
                return matches;
            }
        }
    }

    matches
}
