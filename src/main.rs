use std::io::BufRead;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{bail, Context, Result};
use clap::Parser;

use fanlog::{Setup, Severity};

/// Log stdin lines through configured sinks
#[derive(Parser)]
#[command(name = "fanlog")]
#[command(version)]
#[command(
    long_about = "Reads lines from stdin and logs each one through the configured sinks.\nWithout --config, config.yml or config.yaml in the working directory is used,\nfalling back to stdout at debug level."
)]
struct Cli {
    /// Config file to load (.yml, .yaml or .toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Severity every stdin line is logged at
    #[arg(short, long, default_value = "info", value_parser = Severity::from_str)]
    level: Severity,

    /// Process-wide minimum severity
    #[arg(long, default_value = "debug", value_parser = Severity::from_str)]
    min_level: Severity,
}

fn main() -> Result<()> {
    // Diagnostics about sink construction go to stderr, separate from the sinks
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "fanlog=warn".into());
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let args = Cli::parse();

    match &args.config {
        Some(path) => {
            if !path.is_file() {
                bail!("config file {} does not exist", path.display());
            }
            let applied = Setup::resolve(Some(path), Vec::new())
                .and_then(Setup::apply)
                .with_context(|| format!("Failed to apply {}", path.display()))?;
            if !applied {
                tracing::warn!("{} declares no sinks, using defaults", path.display());
                fanlog::init().context("Failed to initialise logging")?;
            }
        }
        None => fanlog::init().context("Failed to initialise logging")?,
    }
    fanlog::set_global_level(args.min_level);

    let entry = fanlog::default_entry();
    tracing::debug!("Logging to {} sinks", entry.len());

    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        let line = line.context("Failed to read stdin")?;
        if !line.is_empty() {
            entry.log(args.level, &line);
        }
    }

    Ok(())
}
