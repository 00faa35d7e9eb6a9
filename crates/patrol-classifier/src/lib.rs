//! PassPatrol Classifier
//!
//! Second-stage review of scan results: every snippet in a finalized
//! `report.json` is shown to an LLM, which answers whether it holds an actual
//! credential.
//!
//! # Architecture
//!
//! ```text
//! report.json → Classifier → PromptBuilder → LlmProvider → parse_verdict → report.json
//! ```
//!
//! # Response Contract
//!
//! ```text
//! OK
//! pass=<password>
//! user=<user>,pass=<password>
//! ```
//!
//! # Example Usage
//!
//! ```no_run
//! use patrol_classifier::{Classifier, ClassifierConfig};
//! use patrol_llm::OllamaProvider;
//! use std::path::Path;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ClassifierConfig::default();
//! let llm = OllamaProvider::new(&config.endpoint, &config.model)?;
//! let classifier = Classifier::new(llm, config)?;
//!
//! let summary = classifier
//!     .classify_report(Path::new("downloaded_files_20240315_093000/report.json"), |c| {
//!         println!("{}: {}", c.original_path, c.verdict);
//!     })
//!     .await?;
//! println!("{} credential(s)", summary.credentials);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod classifier;
mod config;
mod error;
mod parser;
mod prompt;

pub use classifier::{ClassificationSummary, ClassifiedSnippet, Classifier};
pub use config::ClassifierConfig;
pub use error::ClassifierError;
pub use parser::parse_verdict;
pub use prompt::PromptBuilder;
