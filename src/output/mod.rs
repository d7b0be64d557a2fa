//! Report output
//!
//! - `text`: human-readable summary on stdout
//! - `json`: machine-readable report on stdout or to a file

pub mod json;
pub mod text;
