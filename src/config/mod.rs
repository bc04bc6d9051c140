//! Application configuration and constants.
//!
//! This module provides:
//! - Configuration constants (timeouts, redirect bounds, HLS heuristics)
//! - The per-run configuration record and logging option types

mod constants;
mod types;

// Re-export all constants
pub use constants::*;
pub use types::{LogFormat, LogLevel, RunConfig};
