//! Batch orchestration.
//!
//! Sequences probes over a target list, one at a time, and aggregates the
//! per-target results into a run summary. Processing is strictly sequential
//! by design: a single proxy connection is typically being exercised, and
//! interleaving simultaneous handshakes against it would make failure
//! attribution ambiguous. The loop suspends only at network I/O boundaries.

use std::time::{Duration, Instant};

use log::{info, warn};
use tokio::sync::mpsc::UnboundedSender;
use tokio_util::sync::CancellationToken;

use crate::config::{RunConfig, HLS_MIME_TYPES, SOCKS_CONNECT_TIMEOUT_SECS, SOCKS_IO_TIMEOUT_SECS};
use crate::error_handling::{
    categorize_probe_error, compile_abort_pattern, is_proxy_failure, BatchError, ProbeError,
    ProcessingStats,
};
use crate::fetch::{fetch, FetchOptions};
use crate::models::{FetchOutcome, ProbeResult, RunSummary, TargetEntry};
use crate::playlist::{analyze_playlist, is_valid_playlist};
use crate::socks::probe_socks5;

/// Advisory per-target completion notification.
///
/// Delivered over an unbounded channel so an unconsumed receiver never
/// blocks the run; `index` is 1-based over the original target list.
#[derive(Debug, Clone)]
pub struct ProgressEvent {
    pub index: usize,
    pub total: usize,
    pub result: ProbeResult,
}

/// Runs the batch over `targets` in list order and returns the summary.
///
/// Cancellation is cooperative: the token is checked once per target before
/// its fetch; an in-flight fetch runs to its own timeout. Results gathered
/// before a cancellation are kept.
///
/// # Errors
///
/// * `BatchError::NoTargets` - empty input, reported before any network
///   activity.
/// * `BatchError::ProxyCheckFailed` - the pre-flight SOCKS5 probe failed;
///   zero targets were fetched.
pub async fn run_batch(
    targets: Vec<TargetEntry>,
    config: &RunConfig,
    cancel: CancellationToken,
    progress: Option<UnboundedSender<ProgressEvent>>,
) -> Result<RunSummary, BatchError> {
    if targets.is_empty() {
        return Err(BatchError::NoTargets);
    }

    if config.probe_proxy_first {
        if let Some(proxy) = &config.proxy {
            info!("Checking SOCKS5 proxy {} before the batch", proxy.label());
            let latency = probe_socks5(
                proxy,
                Duration::from_secs(SOCKS_CONNECT_TIMEOUT_SECS),
                Duration::from_secs(SOCKS_IO_TIMEOUT_SECS),
            )
            .await
            .map_err(BatchError::ProxyCheckFailed)?;
            info!("Proxy handshake OK ({latency:.0}ms)");
        }
    }

    let abort_pattern = compile_abort_pattern(config.abort_pattern.as_deref());
    let options = FetchOptions::from_config(config);
    let stats = ProcessingStats::new();
    let started = Instant::now();
    let total = targets.len();
    let mut results: Vec<ProbeResult> = Vec::with_capacity(total);

    for (position, target) in targets.into_iter().enumerate() {
        let index = position + 1;

        if cancel.is_cancelled() {
            warn!(
                "Run cancelled; stopping after {} of {total} targets",
                results.len()
            );
            break;
        }

        if config.only_playlist_urls && !target.url.to_ascii_lowercase().contains(".m3u8") {
            info!(
                "[{index}/{total}] {} - skipped (not an M3U8 URL) -> {}",
                target.name, target.url
            );
            let result = ProbeResult::skipped(target, "skipped: not an M3U8 URL");
            record_result(&mut results, result, &progress, index, total);
            continue;
        }

        let result = probe_target(target, &options).await;

        if result.success {
            info!(
                "[{index}/{total}] {} - OK ({:.0}ms) -> {}",
                result.target.name, result.fetch.response_time_ms, result.target.url
            );
            if let Some(playlist) = &result.stats {
                log::debug!(
                    "[{index}/{total}] {}: {} segments, {:.1}s total, bitrate {}",
                    result.target.name,
                    playlist.segment_count,
                    playlist.total_duration_sec,
                    playlist.bitrate_label()
                );
            }
        } else {
            let detail = result.error.as_deref().unwrap_or("unknown error");
            warn!(
                "[{index}/{total}] {} - failed ({detail}) -> {}",
                result.target.name, result.target.url
            );
            stats.increment_error(categorize_probe_error(&probe_error_for(&result.fetch)));

            if config.stop_on_first_failure
                && result
                    .error
                    .as_deref()
                    .is_some_and(|text| is_proxy_failure(text, abort_pattern.as_ref()))
            {
                warn!("Proxy-level failure detected; stopping the batch");
                cancel.cancel();
            }
        }

        record_result(&mut results, result, &progress, index, total);
    }

    stats.log_summary();

    let summary = RunSummary::from_results(results);
    info!(
        "Batch finished in {:.1}s: {} probed, {} succeeded, {} failed, {} skipped, {} valid playlists",
        started.elapsed().as_secs_f64(),
        summary.total_count,
        summary.success_count,
        summary.failed_count,
        summary.skipped_count,
        summary.valid_playlist_count
    );

    Ok(summary)
}

/// Fetches one target and classifies/validates/analyzes the body.
async fn probe_target(target: TargetEntry, options: &FetchOptions) -> ProbeResult {
    let outcome = fetch(&target.url, options).await;
    let success = outcome.status_code == 200 && outcome.transport_error.is_none();

    let is_playlist = success && classify_playlist(&outcome);
    let (playlist_valid, stats) = if is_playlist {
        (
            is_valid_playlist(&outcome.body),
            Some(analyze_playlist(&outcome.body)),
        )
    } else {
        (false, None)
    };

    let error = if success {
        None
    } else {
        Some(match &outcome.transport_error {
            Some(message) => message.clone(),
            None => ProbeError::Http(outcome.status_code).to_string(),
        })
    };

    ProbeResult {
        target,
        success,
        is_playlist,
        playlist_valid,
        stats,
        fetch: outcome,
        error,
        skipped: false,
    }
}

/// Playlist classification: HLS Content-Type, or `.m3u8` in the effective URL.
fn classify_playlist(outcome: &FetchOutcome) -> bool {
    let by_content_type = outcome.content_type.as_deref().is_some_and(|value| {
        let value = value.to_ascii_lowercase();
        HLS_MIME_TYPES.iter().any(|mime| value.contains(mime))
    });
    by_content_type
        || outcome
            .effective_url
            .to_ascii_lowercase()
            .contains(".m3u8")
}

/// Reconstructs the probe error used for statistics categorization.
fn probe_error_for(outcome: &FetchOutcome) -> ProbeError {
    match &outcome.transport_error {
        Some(message) => ProbeError::Transport(message.clone()),
        None => ProbeError::Http(outcome.status_code),
    }
}

fn record_result(
    results: &mut Vec<ProbeResult>,
    result: ProbeResult,
    progress: &Option<UnboundedSender<ProgressEvent>>,
    index: usize,
    total: usize,
) {
    if let Some(sender) = progress {
        // Advisory only; a dropped receiver must never stall the run.
        let _ = sender.send(ProgressEvent {
            index,
            total,
            result: result.clone(),
        });
    }
    results.push(result);
}
