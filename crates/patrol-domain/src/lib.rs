//! PassPatrol Domain Layer
//!
//! Core search logic and data model for PassPatrol. Everything in this crate is
//! pure computation over text: no filesystem traversal, no document parsing and
//! no network access. Those live in the infrastructure crates.
//!
//! ## Key Concepts
//!
//! - **Keyword**: a lowercase search term loaded from the keyword file
//! - **Match**: a keyword occurrence inside a text unit
//! - **Snippet**: bounded, highlighted context around a match
//! - **FileFindings**: the evidence collected for one matching file
//! - **Verdict**: the classifier's judgement on one snippet
//!
//! ## Pipeline
//!
//! ```text
//! TextUnit → search() → Match → render() → Snippet → FileFindings
//! ```
//!
//! ```
//! use patrol_domain::{search, render, KeywordSet};
//!
//! let keywords = KeywordSet::from_lines("password\n");
//! let text = "db_user=admin\nPASSWORD=hunter2\n";
//! let matches = search(text, &keywords, 10);
//! assert_eq!(matches.len(), 1);
//!
//! let snippet = render(text, &matches[0]).unwrap();
//! assert_eq!(snippet.highlight_with(|kw| format!("[{}]", kw)), "db_user=admin\n[PASSWORD]=hunter2");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod findings;
pub mod keyword;
pub mod matcher;
pub mod snippet;
pub mod unit;
pub mod verdict;

// Re-exports for convenience
pub use findings::FileFindings;
pub use keyword::{Keyword, KeywordSet};
pub use matcher::{search, Match, DEFAULT_MATCH_LIMIT};
pub use snippet::{render, Snippet, CONTEXT_CHARS};
pub use unit::TextUnit;
pub use verdict::Verdict;
