//! JSON output formatting
//!
//! Numbers and factors are emitted as decimal strings so arbitrarily large
//! values survive JSON parsers that only handle 64-bit floats.

use crate::config::Config;
use crate::prime::SearchPath;
use crate::runner::{CheckRecord, Verdict};
use crate::util::time::{duration_micros, format_duration};
use crate::Result;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::time::Duration;

/// Duration with both microseconds and human-readable format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonDuration {
    pub micros: u64,
    pub human: String,
}

impl JsonDuration {
    pub fn from_duration(d: Duration) -> Self {
        Self {
            micros: duration_micros(d),
            human: format_duration(d),
        }
    }
}

/// Inclusive range of candidate divisors
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRange {
    pub from: String,
    pub to: String,
}

/// Settings the checks ran with
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonSettings {
    pub parallelism: usize,
    pub partition: String,
    pub backend: String,
    pub threads: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

/// Result for one number
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonCheckResult {
    pub number: String,
    /// "prime", "composite", or "undetermined"
    pub verdict: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub factor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default)]
    pub interrupted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_path: Option<SearchPath>,
    #[serde(default)]
    pub tasks_dispatched: usize,
    #[serde(default)]
    pub tasks_completed: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elapsed: Option<JsonDuration>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub untested_tail: Option<JsonRange>,
}

/// Complete JSON report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonReport {
    pub tool: String,
    pub version: String,
    /// RFC 3339 timestamp of report creation
    pub timestamp: String,
    pub settings: JsonSettings,
    pub results: Vec<JsonCheckResult>,
}

impl From<&CheckRecord> for JsonCheckResult {
    fn from(record: &CheckRecord) -> Self {
        let verdict = match record.verdict() {
            Verdict::Prime => "prime",
            Verdict::Composite => "composite",
            Verdict::Undetermined => "undetermined",
        };
        let (error, interrupted) = match &record.outcome {
            Ok(_) => (None, false),
            Err(e) => (Some(e.to_string()), e.is_interruption()),
        };

        Self {
            number: record.number.to_string(),
            verdict: verdict.to_string(),
            factor: record.factor.as_ref().map(|f| f.to_string()),
            error,
            interrupted,
            search_path: record.stats.as_ref().map(|s| s.path),
            tasks_dispatched: record.stats.as_ref().map_or(0, |s| s.tasks_dispatched),
            tasks_completed: record.stats.as_ref().map_or(0, |s| s.tasks_completed),
            elapsed: record.stats.as_ref().map(|s| JsonDuration::from_duration(s.elapsed)),
            untested_tail: record.untested_tail.as_ref().map(|(from, to)| JsonRange {
                from: from.to_string(),
                to: to.to_string(),
            }),
        }
    }
}

/// Build a report from check records
pub fn build_report(records: &[CheckRecord], config: &Config) -> JsonReport {
    JsonReport {
        tool: "primepulse".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        settings: JsonSettings {
            parallelism: config.check.parallelism,
            partition: config.check.partition.to_string(),
            backend: config.executor.backend.to_string(),
            threads: config.executor.threads,
            timeout_secs: config.runtime.timeout,
        },
        results: records.iter().map(JsonCheckResult::from).collect(),
    }
}

/// Print the report to stdout
pub fn print_json(report: &JsonReport) -> Result<()> {
    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    serde_json::to_writer_pretty(&mut handle, report)
        .context("Failed to serialize JSON report")?;
    writeln!(handle)?;
    Ok(())
}

/// Write the report to a file
pub fn write_json_file(report: &JsonReport, output_path: &Path) -> Result<()> {
    let file = File::create(output_path)
        .with_context(|| format!("Failed to create JSON file: {}", output_path.display()))?;
    serde_json::to_writer_pretty(file, report)
        .with_context(|| format!("Failed to write JSON file: {}", output_path.display()))?;
    Ok(())
}
