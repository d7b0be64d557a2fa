//! PrimePulse - parallel trial-division primality checker
//!
//! PrimePulse decides whether an arbitrarily large integer is prime by trial
//! division, spreading the candidate divisors over a configurable number of
//! concurrent sub-range searches and stopping as soon as any of them finds a
//! factor.
//!
//! # Architecture
//!
//! - **Coordinator**: partitions the candidate space and drains worker results
//!   in completion order, cancelling the rest on the first factor
//! - **Range workers**: odd-only trial division over one sub-range
//! - **Execution contexts**: caller-supplied thread pools (built-in or rayon)
//! - **Cooperative cancellation**: caller tokens and per-check deadlines

pub mod cancel;
pub mod config;
pub mod error;
pub mod executor;
pub mod output;
pub mod prime;
pub mod runner;
pub mod util;

// Re-export commonly used types
pub use cancel::CancelToken;
pub use config::Config;
pub use error::{CheckError, ExecutorError};
pub use executor::Executor;
pub use prime::{CheckOptions, PrimeProcessor, TrialDivisionTester};

/// Result type used throughout PrimePulse
pub type Result<T> = anyhow::Result<T>;
