//! PrimePulse CLI entry point

use anyhow::{Context, Result};
use primepulse::config::{cli::Cli, cli_convert, toml, validator, Config, OutputFormat};
use primepulse::output::{json, text};
use primepulse::{executor, runner, CancelToken};
use std::time::Instant;

fn main() -> Result<()> {
    let main_start = Instant::now();

    // Parse CLI arguments
    let cli = Cli::parse_args();
    cli.validate()?;

    // Build configuration (TOML file, then CLI overrides)
    let config = toml::load_config(&cli).context("Failed to load configuration")?;
    init_logging(&config);

    validator::validate_config(&config)
        .context("Configuration validation failed")?;

    let numbers = cli
        .numbers
        .iter()
        .map(|s| cli_convert::parse_number(s))
        .collect::<Result<Vec<_>>>()?;

    if config.output.format == OutputFormat::Text {
        println!("PrimePulse v{}", env!("CARGO_PKG_VERSION"));
        println!();
        text::print_configuration(&config);
    }

    if cli.dry_run {
        println!("Dry run mode - configuration validated successfully");
        return Ok(());
    }

    let executor = executor::from_config(&config.executor)
        .context("Failed to create executor")?;

    let records = runner::run_checks(&numbers, executor.as_ref(), &config, &CancelToken::new());
    tracing::debug!(elapsed = ?main_start.elapsed(), "all checks finished");

    write_reports(&records, &config)?;

    if records.iter().any(|r| r.is_failure()) {
        std::process::exit(1);
    }

    Ok(())
}

/// Install the tracing subscriber; RUST_LOG wins over configuration
fn init_logging(config: &Config) {
    let fallback = if config.runtime.debug {
        "debug".to_string()
    } else {
        config.runtime.log_level.clone()
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(fallback)),
        )
        .init();
}

fn write_reports(records: &[runner::CheckRecord], config: &Config) -> Result<()> {
    match config.output.format {
        OutputFormat::Text => text::print_results(records),
        OutputFormat::Json => json::print_json(&json::build_report(records, config))?,
    }

    if let Some(ref path) = config.output.json_file {
        json::write_json_file(&json::build_report(records, config), path)?;
        if config.output.format == OutputFormat::Text {
            println!();
            println!("JSON report written to {}", path.display());
        }
    }

    Ok(())
}
