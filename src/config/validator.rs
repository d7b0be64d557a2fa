//! Configuration validation

use super::*;
use anyhow::Result;

/// Upper bound on sub-ranges per check
pub const MAX_PARALLELISM: usize = 65_536;

/// Upper bound on executor threads
pub const MAX_THREADS: usize = 4_096;

/// Validate complete configuration
pub fn validate_config(config: &Config) -> Result<()> {
    validate_check(&config.check)?;
    validate_executor(&config.executor)?;
    validate_output(&config.output)?;
    validate_runtime(&config.runtime)?;

    Ok(())
}

/// Validate check configuration
pub fn validate_check(check: &CheckConfig) -> Result<()> {
    if check.parallelism == 0 || check.parallelism > MAX_PARALLELISM {
        anyhow::bail!(
            "parallelism must be between 1 and {}, got {}",
            MAX_PARALLELISM,
            check.parallelism
        );
    }

    Ok(())
}

/// Validate executor configuration
pub fn validate_executor(executor: &ExecutorConfig) -> Result<()> {
    if executor.threads == 0 || executor.threads > MAX_THREADS {
        anyhow::bail!(
            "threads must be between 1 and {}, got {}",
            MAX_THREADS,
            executor.threads
        );
    }

    Ok(())
}

/// Validate output configuration
pub fn validate_output(output: &OutputConfig) -> Result<()> {
    if let Some(ref path) = output.json_file {
        if path.as_os_str().is_empty() {
            anyhow::bail!("json_file must not be empty");
        }
        if path.is_dir() {
            anyhow::bail!("json_file {} is a directory", path.display());
        }
    }

    Ok(())
}

/// Validate runtime configuration
pub fn validate_runtime(runtime: &RuntimeConfig) -> Result<()> {
    if runtime.timeout == Some(0) {
        anyhow::bail!("timeout must be at least 1 second");
    }

    if runtime.log_level.trim().is_empty() {
        anyhow::bail!("log_level must not be empty");
    }

    Ok(())
}
