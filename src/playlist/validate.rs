//! Playlist syntax validation.

/// Checks whether a fetched body is a syntactically valid HLS playlist.
///
/// Deliberately permissive: the first non-whitespace line must start with
/// `#EXTM3U` and at least one line must start with `#EXTINF:`. Real-world
/// playlists deviate from the RFC in too many ways for stricter checks to be
/// useful here; the analyzer surfaces the details either way.
pub fn is_valid_playlist(body: &[u8]) -> bool {
    let text = String::from_utf8_lossy(body);
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return false;
    }

    let mut lines = trimmed.lines().map(str::trim);
    match lines.next() {
        Some(first) if first.starts_with("#EXTM3U") => {}
        _ => return false,
    }

    trimmed
        .lines()
        .any(|line| line.trim().starts_with("#EXTINF:"))
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = "#EXTM3U\n#EXTINF:10.0,\nseg1.ts\n";

    #[test]
    fn test_valid_playlist_accepted() {
        assert!(is_valid_playlist(VALID.as_bytes()));
    }

    #[test]
    fn test_missing_header_rejected() {
        assert!(!is_valid_playlist(b"#EXTINF:10.0,\nseg1.ts\n"));
    }

    #[test]
    fn test_header_without_extinf_rejected() {
        assert!(!is_valid_playlist(b"#EXTM3U\n#EXT-X-VERSION:3\n"));
    }

    #[test]
    fn test_empty_body_rejected() {
        assert!(!is_valid_playlist(b""));
        assert!(!is_valid_playlist(b"   \n\n  "));
    }

    #[test]
    fn test_leading_whitespace_tolerated() {
        assert!(is_valid_playlist(b"\n  #EXTM3U\n#EXTINF:5.0,\nseg.ts\n"));
    }

    #[test]
    fn test_crlf_line_endings() {
        assert!(is_valid_playlist(b"#EXTM3U\r\n#EXTINF:10.0,\r\nseg1.ts\r\n"));
    }
}
