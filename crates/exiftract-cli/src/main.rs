//! Command-line front end for exiftract.
//!
//! Reads one file, runs the extraction, and prints the outcome record as
//! JSON (default) or a short human-readable summary. Exit code 0 covers
//! every classified outcome, including OPT_OUT, MALFORMED and ERROR; only
//! machinery failures (missing exiftool, timeout, bad config) exit non-zero.

use anyhow::Context;
use clap::{Parser, ValueEnum};
use exiftract::{extract_file, ExiftractConfig, OutcomeLabel};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Text,
}

#[derive(Parser, Debug)]
#[command(name = "exiftract", version, about = "Extract file metadata via ExifTool")]
struct Cli {
    /// File to extract metadata from
    file: PathBuf,

    /// Configuration file (.toml or .json)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Timeout for the exiftool invocation, in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Maximum stored length of a feature value, in characters
    #[arg(long)]
    max_value_length: Option<usize>,

    /// Path to the exiftool executable
    #[arg(long)]
    exiftool_path: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,
}

fn build_config(cli: &Cli) -> anyhow::Result<ExiftractConfig> {
    let mut config = match &cli.config {
        Some(path) => ExiftractConfig::from_file(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => ExiftractConfig::default(),
    };

    if let Some(timeout) = cli.timeout {
        config.timeout_seconds = timeout;
    }
    if let Some(max_value_length) = cli.max_value_length {
        config.max_value_length = max_value_length;
    }
    if let Some(path) = &cli.exiftool_path {
        config.exiftool_path = Some(path.clone());
    }

    config.validate()?;
    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = build_config(&cli)?;
    tracing::debug!(?config, file = %cli.file.display(), "starting extraction");

    let outcome = extract_file(&cli.file, &config)
        .await
        .with_context(|| format!("extraction failed for {}", cli.file.display()))?;

    match cli.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&outcome)?);
        }
        OutputFormat::Text => {
            let label = match outcome.label {
                OutcomeLabel::Completed => "COMPLETED",
                OutcomeLabel::CompletedWithWarnings => "COMPLETED_WITH_WARNINGS",
                OutcomeLabel::OptOut => "OPT_OUT",
                OutcomeLabel::Malformed => "MALFORMED",
                OutcomeLabel::Error => "ERROR",
            };
            println!("{}", label);
            if let Some(message) = &outcome.message {
                println!("  {}", message);
            }
            for (feature, values) in &outcome.features {
                println!("{}:", feature);
                for fv in values {
                    match &fv.label {
                        Some(label) => println!("  {} = {}", label, fv.value),
                        None => println!("  {}", fv.value),
                    }
                }
            }
        }
    }

    Ok(())
}
