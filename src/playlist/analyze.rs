//! Playlist content analysis.
//!
//! Single-pass statistics over HLS text. Runs on everything classified as a
//! playlist, whether or not validation accepted it, so malformed playlists
//! still surface partial numbers.

use std::sync::LazyLock;

use regex::Regex;

use crate::models::PlaylistStats;

static EXTINF_DURATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#EXTINF:([\d.]+)").expect("EXTINF pattern must compile"));

static BANDWIDTH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"BANDWIDTH=(\d+)").expect("BANDWIDTH pattern must compile"));

/// Walks a playlist body and extracts aggregate statistics.
///
/// A malformed `EXTINF` duration contributes zero to the duration sum rather
/// than aborting the scan. Segment detection is a substring match (`.ts`,
/// `.m4s`, `.mp4`) because query strings routinely follow the extension in
/// real playlists.
pub fn analyze_playlist(body: &[u8]) -> PlaylistStats {
    let text = String::from_utf8_lossy(body);
    let trimmed = text.trim();

    let mut stats = PlaylistStats::default();
    if trimmed.is_empty() {
        return stats;
    }

    for line in trimmed.lines() {
        let line = line.trim();
        stats.total_lines += 1;

        if line.starts_with("#EXTINF:") {
            stats.extinf_count += 1;
            if let Some(duration) = EXTINF_DURATION_RE
                .captures(line)
                .and_then(|c| c.get(1))
                .and_then(|m| m.as_str().parse::<f64>().ok())
            {
                stats.total_duration_sec += duration;
            }
        } else if line.contains(".ts") || line.contains(".m4s") || line.contains(".mp4") {
            stats.segment_count += 1;
        } else if line.starts_with("#EXT-X-ENDLIST") {
            stats.has_endlist = true;
        } else if line.starts_with("#EXT-X-STREAM-INF") {
            stats.is_variant_playlist = true;
            if let Some(bandwidth) = BANDWIDTH_RE
                .captures(line)
                .and_then(|c| c.get(1))
                .and_then(|m| m.as_str().parse::<u64>().ok())
            {
                stats.max_bitrate_bps = stats.max_bitrate_bps.max(bandwidth);
            }
        }
    }

    if stats.extinf_count > 0 {
        stats.avg_duration_sec = stats.total_duration_sec / stats.extinf_count as f64;
    }

    stats
}

/// Human-readable bitrate label for display.
pub fn format_bitrate(bps: u64) -> String {
    if bps >= 1_000_000 {
        format!("{:.2} Mbps", bps as f64 / 1e6)
    } else if bps > 0 {
        format!("{:.2} Kbps", bps as f64 / 1e3)
    } else {
        "unknown".to_string()
    }
}

impl PlaylistStats {
    /// Display label for `max_bitrate_bps`.
    pub fn bitrate_label(&self) -> String {
        format_bitrate(self.max_bitrate_bps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analyze_media_playlist() {
        let body = "#EXTM3U\n#EXTINF:10.0,\nseg1.ts\n#EXTINF:5.0,\nseg2.ts\n#EXT-X-ENDLIST\n";
        let stats = analyze_playlist(body.as_bytes());
        assert_eq!(stats.extinf_count, 2);
        assert_eq!(stats.segment_count, 2);
        assert_eq!(stats.total_duration_sec, 15.0);
        assert_eq!(stats.avg_duration_sec, 7.5);
        assert!(stats.has_endlist);
        assert!(!stats.is_variant_playlist);
        assert_eq!(stats.total_lines, 6);
    }

    #[test]
    fn test_analyze_empty_body() {
        let stats = analyze_playlist(b"");
        assert_eq!(stats.extinf_count, 0);
        assert_eq!(stats.total_duration_sec, 0.0);
        assert_eq!(stats.avg_duration_sec, 0.0);
        assert!(!stats.has_endlist);
    }

    #[test]
    fn test_analyze_variant_playlist_max_bandwidth() {
        let body = "#EXTM3U\n\
                    #EXT-X-STREAM-INF:BANDWIDTH=2500000,RESOLUTION=1920x1080\n\
                    high/index.m3u8\n\
                    #EXT-X-STREAM-INF:BANDWIDTH=1200000\n\
                    low/index.m3u8\n";
        let stats = analyze_playlist(body.as_bytes());
        assert!(stats.is_variant_playlist);
        assert_eq!(stats.max_bitrate_bps, 2_500_000);
    }

    #[test]
    fn test_malformed_extinf_duration_contributes_zero() {
        let body = "#EXTM3U\n#EXTINF:abc,\nseg1.ts\n#EXTINF:4.5,\nseg2.ts\n";
        let stats = analyze_playlist(body.as_bytes());
        assert_eq!(stats.extinf_count, 2);
        assert_eq!(stats.total_duration_sec, 4.5);
        assert_eq!(stats.avg_duration_sec, 2.25);
    }

    #[test]
    fn test_segment_match_tolerates_query_strings() {
        let body = "#EXTM3U\n#EXTINF:6.0,\nhttps://cdn.example.com/seg1.ts?token=abc\n\
                    #EXTINF:6.0,\nchunk.m4s\n#EXTINF:6.0,\nclip.mp4\n";
        let stats = analyze_playlist(body.as_bytes());
        assert_eq!(stats.segment_count, 3);
    }

    #[test]
    fn test_fractional_duration_parsing() {
        let body = "#EXTM3U\n#EXTINF:9.009,\nseg.ts\n";
        let stats = analyze_playlist(body.as_bytes());
        assert!((stats.total_duration_sec - 9.009).abs() < 1e-9);
    }

    #[test]
    fn test_format_bitrate_labels() {
        assert_eq!(format_bitrate(2_500_000), "2.50 Mbps");
        assert_eq!(format_bitrate(800_000), "800.00 Kbps");
        assert_eq!(format_bitrate(0), "unknown");
    }
}
