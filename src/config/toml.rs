//! TOML configuration file parsing

use super::*;
use crate::config::cli::Cli;
use crate::config::cli_convert::{convert_backend, convert_partition, parse_duration};
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Parse TOML configuration file
pub fn parse_toml_file(path: &Path) -> Result<Config> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    parse_toml_string(&contents)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Parse TOML configuration from string
pub fn parse_toml_string(contents: &str) -> Result<Config> {
    let config: Config = ::toml::from_str(contents)
        .context("Failed to parse TOML configuration")?;

    Ok(config)
}

/// Load the configuration file named on the command line (or defaults) and
/// apply CLI overrides
pub fn load_config(cli: &Cli) -> Result<Config> {
    let config = match &cli.config {
        Some(path) => parse_toml_file(path)?,
        None => Config::default(),
    };
    merge_cli_with_config(cli, config)
}

/// Merge CLI arguments with TOML configuration (CLI takes precedence)
pub fn merge_cli_with_config(cli: &Cli, mut config: Config) -> Result<Config> {
    if let Some(parallelism) = cli.parallelism {
        config.check.parallelism = parallelism;
    }
    if let Some(partition) = cli.partition {
        config.check.partition = convert_partition(partition);
    }

    if let Some(threads) = cli.threads {
        config.executor.threads = threads;
    }
    if let Some(backend) = cli.backend {
        config.executor.backend = convert_backend(backend);
    }

    if cli.json {
        config.output.format = OutputFormat::Json;
    }
    if let Some(ref path) = cli.json_file {
        config.output.json_file = Some(path.clone());
    }

    if let Some(ref timeout) = cli.timeout {
        config.runtime.timeout = Some(parse_duration(timeout).context("Invalid timeout")?);
    }
    if let Some(ref level) = cli.log_level {
        config.runtime.log_level = level.clone();
    }
    if cli.debug {
        config.runtime.debug = true;
    }

    Ok(config)
}
