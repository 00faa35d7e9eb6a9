//! Classify command implementation.

use crate::cli::ClassifyArgs;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use patrol_classifier::{Classifier, ClassifierConfig};
use patrol_llm::OllamaProvider;

/// Execute the classify command.
pub async fn execute_classify(
    args: ClassifyArgs,
    config: &ClassifierConfig,
    formatter: &Formatter,
) -> Result<()> {
    let config = apply_overrides(&args, config.clone())?;
    let llm = OllamaProvider::new(&config.endpoint, &config.model)?
        .with_max_retries(config.max_retries);
    let classifier = Classifier::new(llm, config)?;

    let mut verdicts = Vec::new();
    let summary = classifier
        .classify_report(&args.report, |classified| {
            if formatter.streams() {
                println!("{}", formatter.verdict(classified));
            }
            verdicts.push(classified.clone());
        })
        .await?;

    println!("{}", formatter.classification(&summary, &verdicts)?);
    Ok(())
}

/// Apply command-line flags on top of the configured values.
pub fn apply_overrides(
    args: &ClassifyArgs,
    mut config: ClassifierConfig,
) -> Result<ClassifierConfig> {
    if let Some(endpoint) = &args.endpoint {
        config.endpoint = endpoint.clone();
    }
    if let Some(model) = &args.model {
        config.model = model.clone();
    }

    config.validate().map_err(CliError::InvalidInput)?;
    Ok(config)
}
