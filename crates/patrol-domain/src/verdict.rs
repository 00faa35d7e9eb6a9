//! Classification verdicts for snippets

use serde::{Deserialize, Serialize};
use std::fmt;

/// The classifier's judgement on one snippet
///
/// Mirrors the three-line response contract:
///
/// ```text
/// OK
/// pass=<password>
/// user=<user>,pass=<password>
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Verdict {
    /// No credential in the snippet
    Clean,

    /// A password without an associated user
    Password {
        /// The extracted password
        password: String,
    },

    /// A user and password pair
    Credential {
        /// The extracted user name
        user: String,
        /// The extracted password
        password: String,
    },

    /// The response did not follow the contract
    Unparsed {
        /// Raw response text
        raw: String,
    },
}

impl Verdict {
    /// Whether the verdict reports credential material
    pub fn is_credential(&self) -> bool {
        matches!(self, Verdict::Password { .. } | Verdict::Credential { .. })
    }

    /// Short label for tables and logs
    pub fn label(&self) -> &'static str {
        match self {
            Verdict::Clean => "clean",
            Verdict::Password { .. } => "password",
            Verdict::Credential { .. } => "credential",
            Verdict::Unparsed { .. } => "unparsed",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Clean => write!(f, "OK"),
            Verdict::Password { password } => write!(f, "pass={}", password),
            Verdict::Credential { user, password } => write!(f, "user={},pass={}", user, password),
            Verdict::Unparsed { raw } => write!(f, "unparsed: {}", raw),
        }
    }
}
