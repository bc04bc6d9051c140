//! Configuration types.
//!
//! This module defines the per-run configuration record consumed by the
//! batch orchestrator, plus the logging enums shared with the CLI.

use clap::ValueEnum;

use crate::config::constants::{
    CONNECT_TIMEOUT_SECS, DEFAULT_USER_AGENT, MAX_REDIRECT_HOPS, TOTAL_TIMEOUT_SECS,
};
use crate::models::ProxyConfig;

/// Logging level for the application.
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Per-run configuration for the batch orchestrator.
///
/// Constructed programmatically or from CLI flags; no CLI dependencies here.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// SOCKS5 proxy; `None` means direct connection.
    pub proxy: Option<ProxyConfig>,

    /// HTTP User-Agent header value.
    pub user_agent: String,

    /// Resolve and connect over IPv4 only.
    pub force_ipv4: bool,

    /// Verify SOCKS5 connectivity once before the batch; a failed probe
    /// aborts the run with zero targets fetched.
    pub probe_proxy_first: bool,

    /// Stop the batch when a failure's error text matches the abort pattern.
    pub stop_on_first_failure: bool,

    /// Skip targets whose URL does not contain `.m3u8` (case-insensitive).
    pub only_playlist_urls: bool,

    /// Maximum redirect hops per fetch.
    pub max_redirects: usize,

    /// TCP connect timeout per fetch, in seconds.
    pub connect_timeout_secs: u64,

    /// End-to-end fetch timeout, in seconds.
    pub total_timeout_secs: u64,

    /// Override for the stop-on-first-failure text pattern (regex). The
    /// default policy matches proxy/empty-reply wording.
    pub abort_pattern: Option<String>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            proxy: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            force_ipv4: false,
            probe_proxy_first: false,
            stop_on_first_failure: false,
            only_playlist_urls: false,
            max_redirects: MAX_REDIRECT_HOPS,
            connect_timeout_secs: CONNECT_TIMEOUT_SECS,
            total_timeout_secs: TOTAL_TIMEOUT_SECS,
            abort_pattern: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_conversion() {
        assert_eq!(
            log::LevelFilter::from(LogLevel::Error),
            log::LevelFilter::Error
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Info),
            log::LevelFilter::Info
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Trace),
            log::LevelFilter::Trace
        );
    }

    #[test]
    fn test_run_config_default() {
        let config = RunConfig::default();
        assert!(config.proxy.is_none());
        assert_eq!(config.max_redirects, 10);
        assert_eq!(config.connect_timeout_secs, 10);
        assert_eq!(config.total_timeout_secs, 30);
        assert!(!config.probe_proxy_first);
        assert!(!config.stop_on_first_failure);
        assert!(!config.only_playlist_urls);
        assert!(config.abort_pattern.is_none());
    }
}
