//! CLI to Config conversion utilities

use crate::config::cli;
use crate::config::ExecutorBackend;
use crate::prime::PartitionMode;
use anyhow::{Context, Result};
use num_bigint::BigUint;
use num_traits::Num;

/// Parse a non-negative integer of any size
///
/// Accepts decimal (`1000003`), hexadecimal with a `0x` prefix (`0xF4243`),
/// and `_` digit separators (`1_000_003`).
pub fn parse_number(s: &str) -> Result<BigUint> {
    let cleaned: String = s.trim().chars().filter(|&c| c != '_').collect();
    let lower = cleaned.to_lowercase();

    let (digits, radix) = match lower.strip_prefix("0x") {
        Some(hex) => (hex, 16),
        None => (lower.as_str(), 10),
    };

    if digits.is_empty() {
        anyhow::bail!("Invalid number: '{}'", s);
    }
    if digits.starts_with('+') || digits.starts_with('-') {
        anyhow::bail!("Invalid number: '{}' (sign not allowed)", s);
    }

    BigUint::from_str_radix(digits, radix).with_context(|| format!("Invalid number: '{}'", s))
}

/// Parse a duration string (e.g., "60s", "5m", "1h") to whole seconds
pub fn parse_duration(s: &str) -> Result<u64> {
    let s = s.trim().to_lowercase();

    if s.ends_with("ms") || s.ends_with("us") || s.ends_with("ns") {
        anyhow::bail!(
            "Invalid duration: {} (timeouts are whole seconds; use s, m or h)",
            s
        );
    }

    let (num_str, multiplier) = if s.ends_with("sec") || s.ends_with('s') {
        (s.trim_end_matches("sec").trim_end_matches('s'), 1u64)
    } else if s.ends_with("min") || s.ends_with('m') {
        (s.trim_end_matches("min").trim_end_matches('m'), 60)
    } else if s.ends_with("hr") || s.ends_with('h') {
        (s.trim_end_matches("hr").trim_end_matches('h'), 3600)
    } else {
        (s.as_str(), 1)
    };

    let num: u64 = num_str.parse()
        .with_context(|| format!("Invalid duration format: {}", s))?;

    num.checked_mul(multiplier)
        .with_context(|| format!("Duration too large: {}", s))
}

/// Convert CLI BackendType to config ExecutorBackend
pub fn convert_backend(cli_type: cli::BackendType) -> ExecutorBackend {
    match cli_type {
        cli::BackendType::Pool => ExecutorBackend::Pool,
        cli::BackendType::Rayon => ExecutorBackend::Rayon,
    }
}

/// Convert CLI PartitionType to PartitionMode
pub fn convert_partition(cli_type: cli::PartitionType) -> PartitionMode {
    match cli_type {
        cli::PartitionType::Reference => PartitionMode::Reference,
        cli::PartitionType::Exhaustive => PartitionMode::Exhaustive,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number("97").unwrap(), BigUint::from(97u32));
        assert_eq!(parse_number(" 1_000_003 ").unwrap(), BigUint::from(1_000_003u32));
        assert_eq!(parse_number("0x61").unwrap(), BigUint::from(97u32));
        assert_eq!(parse_number("0XfF").unwrap(), BigUint::from(255u32));
        assert_eq!(parse_number("0").unwrap(), BigUint::from(0u32));

        let big = parse_number("340282366920938463463374607431768211457").unwrap();
        assert_eq!(big.to_string(), "340282366920938463463374607431768211457");
    }

    #[test]
    fn test_parse_number_rejects_garbage() {
        assert!(parse_number("").is_err());
        assert!(parse_number("0x").is_err());
        assert!(parse_number("-7").is_err());
        assert!(parse_number("+7").is_err());
        assert!(parse_number("12a").is_err());
        assert!(parse_number("1.5").is_err());
    }

    #[test]
    fn test_parse_duration() {
        assert_eq!(parse_duration("60s").unwrap(), 60);
        assert_eq!(parse_duration("45sec").unwrap(), 45);
        assert_eq!(parse_duration("5m").unwrap(), 300);
        assert_eq!(parse_duration("2min").unwrap(), 120);
        assert_eq!(parse_duration("1h").unwrap(), 3600);
        assert_eq!(parse_duration("90").unwrap(), 90);
        assert!(parse_duration("fast").is_err());
    }

    #[test]
    fn test_parse_duration_rejects_subsecond_units() {
        let err = parse_duration("500ms").unwrap_err();
        assert!(err.to_string().contains("whole seconds"));
        assert!(parse_duration("10us").is_err());
    }

    #[test]
    fn test_convert_enums() {
        assert_eq!(convert_backend(cli::BackendType::Rayon), ExecutorBackend::Rayon);
        assert_eq!(convert_partition(cli::PartitionType::Exhaustive), PartitionMode::Exhaustive);
    }
}
