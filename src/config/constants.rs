//! Configuration constants.
//!
//! Defaults for timeouts, redirect bounds, and the HLS/proxy heuristics used
//! across the probe pipeline.

/// Maximum redirect hops followed per fetch.
pub const MAX_REDIRECT_HOPS: usize = 10;

/// TCP connect timeout per fetch, in seconds.
pub const CONNECT_TIMEOUT_SECS: u64 = 10;

/// End-to-end fetch timeout (all redirect hops plus body), in seconds.
pub const TOTAL_TIMEOUT_SECS: u64 = 30;

/// TCP connect timeout for the SOCKS5 handshake probe, in seconds.
pub const SOCKS_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Read/write timeout for SOCKS5 handshake replies, in seconds.
pub const SOCKS_IO_TIMEOUT_SECS: u64 = 5;

/// Default User-Agent string for HTTP requests.
///
/// Streaming origins frequently gate responses on a browser-looking UA;
/// users can override this via the `--user-agent` CLI flag.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0 Safari/537.36";

/// Content-Type values that classify a response as an HLS playlist.
pub const HLS_MIME_TYPES: [&str; 2] = ["application/vnd.apple.mpegurl", "application/x-mpegurl"];

/// Default pattern for the stop-on-first-failure heuristic: error text that
/// suggests the proxy itself (not the target) is broken.
pub const DEFAULT_ABORT_PATTERN: &str = "(?i)proxy|empty reply";

/// Group assigned to entries whose list supplied none.
pub const UNGROUPED: &str = "ungrouped";

/// Maximum run-history records kept; saving beyond this evicts the oldest.
pub const MAX_HISTORY_RECORDS: i64 = 20;

/// Default history database path.
pub const DB_PATH: &str = "./stream_status.db";
