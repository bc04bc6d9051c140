//! Run report rendering.
//!
//! Turns a completed `RunSummary` back into channel-list text, bucketed into
//! valid / timed-out / invalid sections so the valid block can be fed
//! straight back into a player or another test run. Within each section,
//! entries keep run order and are grouped under `group,#genre#` markers.

use chrono::Local;

use crate::error_handling::is_timeout_like;
use crate::models::{ProbeResult, RunSummary};

/// Renders the plain-text report for a finished run.
///
/// Bucket rules: success with a valid playlist → valid; an attempted failure
/// with no status code or timeout/connect-flavored error text → timed out;
/// everything else (bad statuses, invalid playlists, skipped entries) →
/// invalid. Empty sections are omitted.
pub fn render_report(summary: &RunSummary, proxy_label: Option<&str>) -> String {
    let mut report = format!(
        "{}\n# Report generated by stream_status.\n# SOCKS5 proxy: {}\n\n",
        Local::now().format("%Y/%m/%d %H:%M:%S"),
        proxy_label.unwrap_or("none (direct connection)"),
    );

    let mut valid: Vec<&ProbeResult> = Vec::new();
    let mut timed_out: Vec<&ProbeResult> = Vec::new();
    let mut invalid: Vec<&ProbeResult> = Vec::new();

    for result in &summary.results {
        if result.success && result.playlist_valid {
            valid.push(result);
        } else if !result.success && !result.skipped && looks_timed_out(result) {
            timed_out.push(result);
        } else {
            invalid.push(result);
        }
    }

    write_section(&mut report, "valid sources", &valid);
    write_section(&mut report, "timed-out sources", &timed_out);
    write_section(&mut report, "invalid sources", &invalid);
    report
}

fn looks_timed_out(result: &ProbeResult) -> bool {
    result.fetch.status_code == 0
        || result.error.as_deref().is_some_and(is_timeout_like)
}

fn write_section(report: &mut String, title: &str, results: &[&ProbeResult]) {
    if results.is_empty() {
        return;
    }
    report.push_str(&format!("= {title} =\n"));
    let mut current_group = "";
    for result in results {
        if result.target.group != current_group {
            report.push_str(&format!("{},#genre#\n", result.target.group));
            current_group = &result.target.group;
        }
        report.push_str(&format!("{},{}\n", result.target.name, result.target.url));
    }
    report.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FetchOutcome, TargetEntry};

    fn target(name: &str, group: &str) -> TargetEntry {
        TargetEntry {
            name: name.to_string(),
            url: format!("http://example.com/{name}.m3u8"),
            group: group.to_string(),
        }
    }

    fn result(name: &str, group: &str, success: bool, valid: bool, error: Option<&str>) -> ProbeResult {
        ProbeResult {
            target: target(name, group),
            success,
            is_playlist: valid,
            playlist_valid: valid,
            stats: None,
            fetch: FetchOutcome {
                status_code: if success { 200 } else if error.is_some() { 0 } else { 404 },
                ..FetchOutcome::default()
            },
            error: error.map(str::to_string),
            skipped: false,
        }
    }

    #[test]
    fn test_report_buckets_and_group_markers() {
        let summary = RunSummary::from_results(vec![
            result("alpha", "Sports", true, true, None),
            result("beta", "Sports", false, false, Some("request timed out: deadline")),
            result("gamma", "News", false, false, None),
        ]);
        let report = render_report(&summary, Some("socks5://127.0.0.1:1080"));

        assert!(report.contains("# SOCKS5 proxy: socks5://127.0.0.1:1080"));
        assert!(report.contains("= valid sources =\nSports,#genre#\nalpha,"));
        assert!(report.contains("= timed-out sources =\nSports,#genre#\nbeta,"));
        assert!(report.contains("= invalid sources =\nNews,#genre#\ngamma,"));
    }

    #[test]
    fn test_report_omits_empty_sections() {
        let summary = RunSummary::from_results(vec![result("alpha", "Sports", true, true, None)]);
        let report = render_report(&summary, None);
        assert!(report.contains("= valid sources ="));
        assert!(!report.contains("= timed-out sources ="));
        assert!(!report.contains("= invalid sources ="));
        assert!(report.contains("none (direct connection)"));
    }

    #[test]
    fn test_skipped_entries_land_in_invalid() {
        let summary = RunSummary::from_results(vec![ProbeResult::skipped(
            target("delta", "Sports"),
            "skipped: not an M3U8 URL",
        )]);
        let report = render_report(&summary, None);
        assert!(report.contains("= invalid sources =\nSports,#genre#\ndelta,"));
        assert!(!report.contains("= timed-out sources ="));
    }

    #[test]
    fn test_group_header_emitted_once_per_run_of_entries() {
        let summary = RunSummary::from_results(vec![
            result("a", "Sports", true, true, None),
            result("b", "Sports", true, true, None),
        ]);
        let report = render_report(&summary, None);
        assert_eq!(report.matches("Sports,#genre#").count(), 1);
    }
}
