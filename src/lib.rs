//! stream_status library: M3U8 stream source batch probing.
//!
//! This library probes whether streaming endpoints (HLS playlists) are
//! reachable and well-formed, optionally routed through a SOCKS5 proxy, and
//! aggregates many such probes into a run-level summary: a SOCKS5 handshake
//! tester, a redirect-chain-aware HTTP fetcher, an HLS playlist
//! validator/analyzer, and a sequential batch orchestrator, plus the
//! plumbing around them (channel-list parsing, report rendering, bounded
//! run history).
//!
//! # Example
//!
//! ```no_run
//! use stream_status::{parse_target_list, run_batch, RunConfig};
//! use tokio_util::sync::CancellationToken;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let targets = parse_target_list("CCTV-1,http://example.com/tv/cctv1.m3u8");
//! let config = RunConfig::default();
//!
//! let summary = run_batch(targets, &config, CancellationToken::new(), None).await?;
//! println!(
//!     "Probed {} targets: {:.2}% reachable, {:.2}% valid playlists",
//!     summary.total_count,
//!     summary.success_rate(),
//!     summary.valid_playlist_rate()
//! );
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime. Use `#[tokio::main]` in your
//! application or ensure you're calling library functions within an async
//! context.

mod batch;
pub mod config;
mod error_handling;
mod fetch;
pub mod initialization;
mod models;
mod playlist;
mod report;
mod socks;
mod storage;
mod targets;

// Re-export public API
pub use batch::{run_batch, ProgressEvent};
pub use config::{LogFormat, LogLevel, RunConfig};
pub use error_handling::{BatchError, ProbeError};
pub use fetch::{fetch, FetchOptions};
pub use models::{
    FetchOutcome, PlaylistStats, ProbeResult, ProxyConfig, RedirectHop, RunSummary, TargetEntry,
};
pub use playlist::{analyze_playlist, format_bitrate, is_valid_playlist};
pub use report::render_report;
pub use socks::probe_socks5;
pub use storage::{
    delete_run_record, init_db_pool_with_path, query_run_history, run_migrations, save_run_record,
    RunRecord,
};
pub use targets::{parse_target_list, slug_from_url};
