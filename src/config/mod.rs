//! Configuration module
//!
//! Handles CLI argument parsing, TOML configuration files, and validation.

pub mod cli;
pub mod cli_convert;
pub mod toml;
pub mod validator;

use crate::prime::PartitionMode;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Complete run configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub check: CheckConfig,
    #[serde(default)]
    pub executor: ExecutorConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub runtime: RuntimeConfig,
}

/// How each number is searched
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckConfig {
    /// Number of sub-ranges the candidate space is split into
    #[serde(default = "default_parallelism")]
    pub parallelism: usize,
    /// Handling of the tail left by integer division
    #[serde(default)]
    pub partition: PartitionMode,
}

fn default_parallelism() -> usize {
    num_cpus::get()
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            parallelism: default_parallelism(),
            partition: PartitionMode::default(),
        }
    }
}

/// Execution context backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutorBackend {
    /// Built-in crossbeam-fed thread pool
    #[default]
    Pool,
    /// Dedicated rayon thread pool
    Rayon,
}

/// Execution context configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutorConfig {
    #[serde(default)]
    pub backend: ExecutorBackend,
    /// Worker threads in the pool
    #[serde(default = "default_threads")]
    pub threads: usize,
}

fn default_threads() -> usize {
    num_cpus::get()
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            backend: ExecutorBackend::default(),
            threads: default_threads(),
        }
    }
}

/// Report format written to stdout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Output configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,
    /// Also write the JSON report to this file
    #[serde(default)]
    pub json_file: Option<PathBuf>,
}

/// Runtime configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// Per-number timeout in seconds
    #[serde(default)]
    pub timeout: Option<u64>,
    /// Enable debug output
    #[serde(default)]
    pub debug: bool,
    /// Log filter used when RUST_LOG is unset
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            timeout: None,
            debug: false,
            log_level: default_log_level(),
        }
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Configuration:")?;
        writeln!(f, "{}", self.check)?;
        writeln!(f, "{}", self.executor)?;
        writeln!(f, "{}", self.output)?;
        write!(f, "{}", self.runtime)
    }
}

impl fmt::Display for CheckConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "  Check:")?;
        writeln!(f, "    Parallelism: {}", self.parallelism)?;
        write!(f, "    Partition: {}", self.partition)
    }
}

impl fmt::Display for ExecutorBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecutorBackend::Pool => write!(f, "pool"),
            ExecutorBackend::Rayon => write!(f, "rayon"),
        }
    }
}

impl fmt::Display for ExecutorConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "  Executor:")?;
        writeln!(f, "    Backend: {}", self.backend)?;
        write!(f, "    Threads: {}", self.threads)
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

impl fmt::Display for OutputConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "  Output:")?;
        write!(f, "    Format: {}", self.format)?;
        if let Some(ref path) = self.json_file {
            write!(f, "\n    JSON file: {}", path.display())?;
        }
        Ok(())
    }
}

impl fmt::Display for RuntimeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "  Runtime:")?;
        match self.timeout {
            Some(secs) => writeln!(f, "    Timeout: {}s", secs)?,
            None => writeln!(f, "    Timeout: none")?,
        }
        write!(f, "    Log level: {}", self.log_level)?;
        if self.debug {
            write!(f, " (debug)")?;
        }
        Ok(())
    }
}

impl Config {
    /// Timeout applied to each number, if configured
    pub fn timeout(&self) -> Option<std::time::Duration> {
        self.runtime.timeout.map(std::time::Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert!(config.check.parallelism >= 1);
        assert_eq!(config.check.partition, PartitionMode::Reference);
        assert_eq!(config.executor.backend, ExecutorBackend::Pool);
        assert!(config.executor.threads >= 1);
        assert_eq!(config.output.format, OutputFormat::Text);
        assert_eq!(config.runtime.log_level, "warn");
        assert!(config.timeout().is_none());
    }

    #[test]
    fn test_display() {
        let mut config = Config::default();
        config.check.parallelism = 8;
        config.runtime.timeout = Some(30);
        let text = config.to_string();
        assert!(text.contains("Parallelism: 8"));
        assert!(text.contains("Partition: reference"));
        assert!(text.contains("Backend: pool"));
        assert!(text.contains("Timeout: 30s"));
    }
}
