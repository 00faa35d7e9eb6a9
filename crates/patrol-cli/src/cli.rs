//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// PassPatrol - Find credentials left on file shares.
#[derive(Debug, Parser)]
#[command(name = "passpatrol")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Whether debug logging was requested.
    pub fn debug(&self) -> bool {
        match &self.command {
            Command::Scan(args) => args.debug,
            Command::Classify(args) => args.debug,
        }
    }
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (paths only)
    Quiet,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Scan a directory tree for keywords and quarantine matching files
    Scan(ScanArgs),

    /// Ask an LLM which snippets of a report hold real credentials
    Classify(ClassifyArgs),
}

/// Arguments for the scan command.
#[derive(Debug, Parser)]
pub struct ScanArgs {
    /// Directory to scan (e.g. a mounted share)
    pub root: PathBuf,

    /// Keyword file, one keyword per line
    #[arg(short, long)]
    pub keywords: Option<PathBuf>,

    /// Maximum matches recorded per file
    #[arg(short, long)]
    pub limit: Option<usize>,

    /// Enable debug logging
    #[arg(short, long)]
    pub debug: bool,

    /// Extension file, one suffix per line
    #[arg(short, long)]
    pub extensions: Option<PathBuf>,

    /// Scan only files listed in the extension file
    #[arg(short, long)]
    pub whitelist: bool,

    /// Print each match as soon as the file is quarantined
    #[arg(short, long)]
    pub out: bool,

    /// Number of files processed concurrently
    #[arg(long)]
    pub workers: Option<usize>,

    /// Directory the quarantine folder is created in
    #[arg(long)]
    pub output_dir: Option<PathBuf>,
}

/// Arguments for the classify command.
#[derive(Debug, Parser)]
pub struct ClassifyArgs {
    /// report.json written by a scan
    pub report: PathBuf,

    /// Ollama endpoint (e.g., http://localhost:11434)
    #[arg(long, env = "PASSPATROL_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Model name
    #[arg(short, long, env = "PASSPATROL_MODEL")]
    pub model: Option<String>,

    /// Enable debug logging
    #[arg(short, long)]
    pub debug: bool,
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
            CliFormat::Quiet => crate::config::OutputFormat::Quiet,
        }
    }
}
