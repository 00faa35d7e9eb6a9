//! Scan command implementation.

use crate::cli::ScanArgs;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use patrol_scanner::{ScanConfig, Scanner};
use tokio_util::sync::CancellationToken;
use tracing::warn;

/// Execute the scan command.
pub async fn execute_scan(
    args: ScanArgs,
    config: &ScanConfig,
    formatter: &Formatter,
) -> Result<()> {
    let config = apply_overrides(&args, config.clone())?;
    let scanner = Scanner::from_config(config)?;

    let cancel = CancellationToken::new();
    let interrupt = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Interrupted; finishing files in progress");
                cancel.cancel();
            }
        })
    };

    let print_matches = args.out && formatter.streams();
    let result = scanner
        .run(&args.root, cancel, |name, findings| {
            if print_matches {
                println!("{}", formatter.quarantined(name, findings));
            }
        })
        .await;
    interrupt.abort();

    println!("{}", formatter.scan_summary(&result?)?);
    Ok(())
}

/// Apply command-line flags on top of the configured values.
pub fn apply_overrides(args: &ScanArgs, mut config: ScanConfig) -> Result<ScanConfig> {
    if let Some(keywords) = &args.keywords {
        config.keywords_file = keywords.clone();
    }
    if let Some(limit) = args.limit {
        config.match_limit = limit;
    }
    if let Some(extensions) = &args.extensions {
        config.extensions_file = extensions.clone();
    }
    if args.whitelist {
        config.whitelist = true;
    }
    if let Some(workers) = args.workers {
        config.workers = Some(workers);
    }
    if let Some(output_dir) = &args.output_dir {
        config.output_dir = output_dir.clone();
    }

    config.validate().map_err(CliError::InvalidInput)?;
    Ok(config)
}
