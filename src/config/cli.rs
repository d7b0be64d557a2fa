//! CLI argument parsing using clap

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Execution context backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BackendType {
    /// Built-in thread pool
    Pool,
    /// Rayon thread pool
    Rayon,
}

/// Sub-range partitioning mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PartitionType {
    /// Last sub-range ends at values_per_worker * parallelism (may skip a short tail)
    Reference,
    /// Last sub-range extends to the number itself
    Exhaustive,
}

/// PrimePulse - parallel trial-division primality checker
#[derive(Parser, Debug)]
#[command(name = "primepulse")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Numbers to test (decimal, or hex with a 0x prefix; '_' separators allowed)
    #[arg(value_name = "NUMBER", required = true)]
    pub numbers: Vec<String>,

    /// Number of sub-ranges to split each search into [default: CPU count]
    #[arg(short = 'p', long)]
    pub parallelism: Option<usize>,

    /// Worker threads in the execution context [default: CPU count]
    #[arg(short = 't', long)]
    pub threads: Option<usize>,

    /// Execution context backend
    #[arg(long, value_enum)]
    pub backend: Option<BackendType>,

    /// Partitioning mode for the candidate space
    #[arg(long, value_enum)]
    pub partition: Option<PartitionType>,

    /// Per-number timeout in whole seconds, minutes or hours (e.g., 30s, 5m, 1h)
    #[arg(long)]
    pub timeout: Option<String>,

    /// TOML configuration file (CLI options take precedence)
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,

    /// Also write the JSON report to this file
    #[arg(long)]
    pub json_file: Option<PathBuf>,

    /// Log filter used when RUST_LOG is unset (e.g., warn, debug, primepulse=trace)
    #[arg(long, env = "PRIMEPULSE_LOG")]
    pub log_level: Option<String>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Validate configuration and numbers without running any check
    #[arg(long)]
    pub dry_run: bool,
}

impl Cli {
    /// Parse CLI arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate CLI arguments
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.numbers.is_empty() {
            anyhow::bail!("at least one number is required");
        }

        if self.parallelism == Some(0) {
            anyhow::bail!("parallelism must be at least 1");
        }

        if self.threads == Some(0) {
            anyhow::bail!("threads must be at least 1");
        }

        Ok(())
    }
}
