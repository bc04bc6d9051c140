//! Core data model shared across the probe pipeline.
//!
//! These are plain owned records: the orchestrator builds them, the report
//! renderer and history store serialize them, nothing mutates them afterwards.

use serde::{Deserialize, Serialize};

/// SOCKS5 proxy endpoint, with optional username/password authentication.
///
/// Absence of a `ProxyConfig` altogether means direct connection. When
/// `username` is non-empty, it is sent together with `password` (possibly
/// empty) during the SOCKS5 sub-negotiation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProxyConfig {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl ProxyConfig {
    /// Whether credentials should be sent during the handshake.
    pub fn has_credentials(&self) -> bool {
        self.username.as_deref().is_some_and(|u| !u.is_empty())
    }

    /// Display label, e.g. `socks5://127.0.0.1:1080`.
    pub fn label(&self) -> String {
        format!("socks5://{}:{}", self.host, self.port)
    }
}

/// One entry from a channel list: display name, URL, and group.
///
/// Immutable once parsed from input text. `name` defaults to a slug derived
/// from the URL when the list did not supply one; `group` defaults to the
/// ungrouped sentinel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetEntry {
    pub name: String,
    pub url: String,
    pub group: String,
}

/// One 3xx response observed while following redirects, in encounter order.
///
/// The terminal landing URL, when appended synthetically after a 200, carries
/// status 200 (see `fetch`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedirectHop {
    pub status: u16,
    pub location: String,
}

/// Everything observed for a single HTTP fetch, redirects included.
///
/// `status_code` is 0 when the transport failed before any final response;
/// the failure message is then in `transport_error`. The redirect chain holds
/// whatever hops were gathered before the failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FetchOutcome {
    pub status_code: u16,
    pub response_time_ms: f64,
    pub content_type: Option<String>,
    pub effective_url: String,
    pub redirect_chain: Vec<RedirectHop>,
    #[serde(skip)]
    pub body: Vec<u8>,
    pub transport_error: Option<String>,
}

/// Aggregate statistics extracted from a playlist body in a single pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlaylistStats {
    pub total_lines: usize,
    pub extinf_count: usize,
    pub segment_count: usize,
    pub total_duration_sec: f64,
    pub avg_duration_sec: f64,
    pub has_endlist: bool,
    pub is_variant_playlist: bool,
    pub max_bitrate_bps: u64,
}

/// Full outcome for one target: fetch result, playlist classification, and
/// (when classified as a playlist) validity plus statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeResult {
    pub target: TargetEntry,
    pub success: bool,
    pub is_playlist: bool,
    pub playlist_valid: bool,
    pub stats: Option<PlaylistStats>,
    pub fetch: FetchOutcome,
    pub error: Option<String>,
    pub skipped: bool,
}

impl ProbeResult {
    /// A result recorded without any network call (skip filter).
    pub fn skipped(target: TargetEntry, reason: &str) -> Self {
        ProbeResult {
            target,
            success: false,
            is_playlist: false,
            playlist_valid: false,
            stats: None,
            fetch: FetchOutcome::default(),
            error: Some(reason.to_string()),
            skipped: true,
        }
    }
}

/// Immutable snapshot of a completed batch run.
///
/// `total_count` always equals `results.len()`: targets never attempted
/// (cancellation, stop-on-failure) are absent, not recorded. Skipped targets
/// are recorded but excluded from `failed_count`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub results: Vec<ProbeResult>,
    pub total_count: usize,
    pub success_count: usize,
    pub failed_count: usize,
    pub skipped_count: usize,
    pub valid_playlist_count: usize,
}

impl RunSummary {
    /// Builds the summary from the accumulated per-target results.
    pub fn from_results(results: Vec<ProbeResult>) -> Self {
        let total_count = results.len();
        let success_count = results.iter().filter(|r| r.success).count();
        let skipped_count = results.iter().filter(|r| r.skipped).count();
        let failed_count = results
            .iter()
            .filter(|r| !r.success && !r.skipped)
            .count();
        let valid_playlist_count = results
            .iter()
            .filter(|r| r.success && r.is_playlist && r.playlist_valid)
            .count();

        RunSummary {
            results,
            total_count,
            success_count,
            failed_count,
            skipped_count,
            valid_playlist_count,
        }
    }

    /// Success percentage against `total_count`, rounded to 2 decimal places.
    pub fn success_rate(&self) -> f64 {
        percentage(self.success_count, self.total_count)
    }

    /// Valid-playlist percentage against `total_count`, rounded to 2 decimal places.
    pub fn valid_playlist_rate(&self) -> f64 {
        percentage(self.valid_playlist_count, self.total_count)
    }
}

fn percentage(count: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let raw = count as f64 / total as f64 * 100.0;
    (raw * 100.0).round() / 100.0
}
