//! Error handling and processing statistics.
//!
//! This module provides:
//! - Structured error definitions for probe and run-level failures
//! - Categorization of transport/status failures into statistics buckets
//! - The fuzzy failure-text matchers behind the stop-on-failure heuristic
//!   and the report's timed-out bucket
//!
//! Per-target errors are always isolated: one target's failure never aborts
//! the batch except through the explicit, caller-configured paths modeled by
//! `BatchError`.

mod categorization;
mod stats;
mod types;

// Re-export public API
pub use categorization::{
    categorize_probe_error, compile_abort_pattern, format_transport_error, is_proxy_failure,
    is_timeout_like,
};
pub use stats::ProcessingStats;
pub use types::{BatchError, ErrorType, ProbeError};
