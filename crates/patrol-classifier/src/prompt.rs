//! LLM prompt for snippet classification

/// Builds the prompt asking whether a snippet holds a credential
pub struct PromptBuilder {
    snippet: String,
    source: Option<String>,
}

impl PromptBuilder {
    /// Create a new prompt builder for `snippet`
    pub fn new(snippet: impl Into<String>) -> Self {
        Self {
            snippet: snippet.into(),
            source: None,
        }
    }

    /// Mention the file the snippet came from (file names are a useful hint)
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Build the complete classification prompt
    pub fn build(&self) -> String {
        let mut prompt = String::new();

        prompt.push_str(CLASSIFICATION_INSTRUCTIONS);
        prompt.push_str("\n\n");

        if let Some(source) = &self.source {
            prompt.push_str(&format!("Source file: {}\n\n", source));
        }

        prompt.push_str("Snippet:\n");
        prompt.push_str("---\n");
        prompt.push_str(self.snippet.trim_end());
        prompt.push_str("\n---\n\n");

        prompt.push_str(OUTPUT_FORMAT_REMINDER);
        prompt
    }
}

const CLASSIFICATION_INSTRUCTIONS: &str = r#"You are reviewing text found on a file share during an authorized security assessment.
Decide whether the snippet below contains an actual credential: a concrete password, passphrase, PIN or secret value, optionally together with the user name it belongs to.

Rules:
- Mentions of the word "password" without a value are not credentials ("reset your password", "password policy")
- Masked values and placeholders are not credentials ("<password>", "********", "xxx")
- Default passwords written in documentation are credentials
- Copy the password and user exactly as written, without quotes"#;

const OUTPUT_FORMAT_REMINDER: &str = r#"Answer with exactly one line, in one of these forms:
OK
pass=<password>
user=<user>,pass=<password>

Use OK when there is no credential. Return ONLY that line, no explanations."#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_wraps_snippet_in_delimiters() {
        let prompt = PromptBuilder::new("db_user=sa\ndb_pass=Summer2024\n").build();
        assert!(prompt.contains("---\ndb_user=sa\ndb_pass=Summer2024\n---"));
    }

    #[test]
    fn test_prompt_includes_contract() {
        let prompt = PromptBuilder::new("x").build();
        assert!(prompt.contains("\nOK\n"));
        assert!(prompt.contains("pass=<password>"));
        assert!(prompt.contains("user=<user>,pass=<password>"));
    }

    #[test]
    fn test_prompt_with_source() {
        let prompt = PromptBuilder::new("x").with_source("/mnt/it/web.config").build();
        assert!(prompt.contains("Source file: /mnt/it/web.config"));

        let prompt = PromptBuilder::new("x").build();
        assert!(!prompt.contains("Source file:"));
    }
}
