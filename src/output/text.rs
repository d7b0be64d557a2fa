//! Human-readable text output

use crate::config::Config;
use crate::prime::SearchPath;
use crate::runner::{CheckRecord, Verdict};
use crate::util::time::format_duration;
use std::fmt::Write;

const RULE: &str = "═══════════════════════════════════════════════════════════";

/// Print the effective configuration
pub fn print_configuration(config: &Config) {
    println!("{}", config);
    println!();
}

/// Print check results to console
pub fn print_results(records: &[CheckRecord]) {
    print!("{}", render_results(records));
}

/// Render check results as text
///
/// Displays, per number:
/// - Verdict and discovered factor
/// - Which search path was taken and how many sub-ranges ran
/// - Elapsed time
/// - Any candidates left unsearched by reference partitioning
pub fn render_results(records: &[CheckRecord]) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "{}", RULE);
    let _ = writeln!(out, "                    CHECK RESULTS");
    let _ = writeln!(out, "{}", RULE);

    for record in records {
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", record.number);

        match (&record.outcome, record.verdict()) {
            (Ok(_), Verdict::Prime) => {
                let _ = writeln!(out, "  Verdict: prime");
            }
            (Ok(_), _) => {
                let _ = writeln!(out, "  Verdict: composite");
                if let Some(ref factor) = record.factor {
                    let _ = writeln!(out, "  Factor:  {}", factor);
                }
            }
            (Err(e), _) => {
                let label = if e.is_interruption() { "interrupted" } else { "error" };
                let _ = writeln!(out, "  Verdict: undetermined ({})", label);
                let _ = writeln!(out, "  Error:   {}", e);
            }
        }

        if let Some(ref stats) = record.stats {
            let path = match stats.path {
                SearchPath::AlreadyDecided => "already decided".to_string(),
                SearchPath::EvenFastPath => "even fast path".to_string(),
                SearchPath::Sequential => "sequential (too few values per worker)".to_string(),
                SearchPath::Parallel => format!(
                    "parallel ({} of {} sub-ranges drained)",
                    stats.tasks_completed, stats.tasks_dispatched
                ),
            };
            let _ = writeln!(out, "  Search:  {}", path);
            let _ = writeln!(out, "  Elapsed: {}", format_duration(stats.elapsed));
        }

        if let Some((ref from, ref to)) = record.untested_tail {
            let _ = writeln!(out, "  Note:    candidates {}..={} were not searched", from, to);
        }
    }

    let total = records.len();
    let failed = records.iter().filter(|r| r.is_failure()).count();
    let primes = records.iter().filter(|r| r.verdict() == Verdict::Prime).count();
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", RULE);
    let _ = writeln!(
        out,
        "{} checked: {} prime, {} composite, {} undetermined",
        total,
        primes,
        total - primes - failed,
        failed
    );

    out
}
