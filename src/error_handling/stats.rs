//! Processing statistics tracking.
//!
//! Counts failures by category over a run. Counters are atomic so the stats
//! can be shared behind an `Arc` with a progress consumer while the batch is
//! still running.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use strum::IntoEnumIterator;

use super::types::ErrorType;

/// Per-run error counters, one per `ErrorType`, all initialized to zero.
pub struct ProcessingStats {
    errors: HashMap<ErrorType, AtomicUsize>,
}

impl ProcessingStats {
    pub fn new() -> Self {
        let mut errors = HashMap::new();
        for error in ErrorType::iter() {
            errors.insert(error, AtomicUsize::new(0));
        }
        ProcessingStats { errors }
    }

    /// Increment an error counter.
    ///
    /// All categories are inserted in `new()`; a missing entry indicates a
    /// bug in initialization and is logged rather than panicking.
    pub fn increment_error(&self, error: ErrorType) {
        if let Some(counter) = self.errors.get(&error) {
            counter.fetch_add(1, Ordering::Relaxed);
        } else {
            log::error!(
                "Attempted to increment error counter for {:?} which is not in the map.",
                error
            );
        }
    }

    /// Get the count for an error type.
    pub fn get_error_count(&self, error: ErrorType) -> usize {
        self.errors
            .get(&error)
            .map(|c| c.load(Ordering::SeqCst))
            .unwrap_or(0)
    }

    /// Total failures across all categories.
    pub fn total_errors(&self) -> usize {
        self.errors
            .values()
            .map(|c| c.load(Ordering::SeqCst))
            .sum()
    }

    /// Logs every non-zero category, most frequent first.
    pub fn log_summary(&self) {
        if self.total_errors() == 0 {
            return;
        }
        let mut counts: Vec<(ErrorType, usize)> = ErrorType::iter()
            .map(|e| (e, self.get_error_count(e)))
            .filter(|(_, count)| *count > 0)
            .collect();
        counts.sort_by(|a, b| b.1.cmp(&a.1));
        log::info!("Error statistics:");
        for (error_type, count) in counts {
            log::info!("  {}: {}", error_type.as_str(), count);
        }
    }
}

impl Default for ProcessingStats {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_stats_initialized_to_zero() {
        let stats = ProcessingStats::new();
        for error_type in ErrorType::iter() {
            assert_eq!(stats.get_error_count(error_type), 0);
        }
        assert_eq!(stats.total_errors(), 0);
    }

    #[test]
    fn test_stats_increment() {
        let stats = ProcessingStats::new();
        stats.increment_error(ErrorType::ProxyConnectError);
        stats.increment_error(ErrorType::ProxyConnectError);
        stats.increment_error(ErrorType::HttpStatusClientError);
        assert_eq!(stats.get_error_count(ErrorType::ProxyConnectError), 2);
        assert_eq!(stats.get_error_count(ErrorType::HttpStatusClientError), 1);
        assert_eq!(stats.total_errors(), 3);
    }
}
