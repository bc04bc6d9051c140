//! Target list parsing.
//!
//! Channel lists arrive as line-oriented text mixing three shapes:
//! `Group,#genre#` markers, `name,http…` pairs, and bare URLs. Anything else
//! (comments, decorative separators) is ignored. Entries keep their list
//! order; the current group applies to every entry until the next marker.

use log::warn;
use url::Url;

use crate::config::UNGROUPED;
use crate::models::TargetEntry;

/// Parses channel list text into target entries.
///
/// Names are split at the *last* `,http` occurrence, so channel names may
/// themselves contain commas. Entries whose URL does not parse as http(s)
/// are dropped with a warning.
pub fn parse_target_list(text: &str) -> Vec<TargetEntry> {
    let mut entries = Vec::new();
    let mut current_group = UNGROUPED.to_string();

    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if let Some(group) = line.strip_suffix(",#genre#") {
            let group = group.trim();
            current_group = if group.is_empty() {
                UNGROUPED.to_string()
            } else {
                group.to_string()
            };
            continue;
        }

        if let Some(at) = line.rfind(",http") {
            let name = line[..at].trim();
            let url = line[at + 1..].trim();
            if let Some(url) = checked_url(url) {
                let name = if name.is_empty() {
                    slug_from_url(&url)
                } else {
                    name.to_string()
                };
                entries.push(TargetEntry {
                    name,
                    url,
                    group: current_group.clone(),
                });
            }
            continue;
        }

        if line.starts_with("http://") || line.starts_with("https://") {
            if let Some(url) = checked_url(line) {
                entries.push(TargetEntry {
                    name: slug_from_url(&url),
                    url,
                    group: current_group.clone(),
                });
            }
        }
    }

    entries
}

/// Derives a display name from a URL: the last path segment's file stem, or
/// the host when the path yields nothing.
pub fn slug_from_url(url: &str) -> String {
    let Ok(parsed) = Url::parse(url) else {
        return url.to_string();
    };
    let host = parsed.host_str().unwrap_or(url).to_string();

    let last_segment = parsed
        .path_segments()
        .and_then(|segments| segments.filter(|s| !s.is_empty()).last());
    let Some(segment) = last_segment else {
        return host;
    };

    let stem = match segment.rsplit_once('.') {
        Some((stem, _)) => stem,
        None => segment,
    };
    if stem.is_empty() {
        host
    } else {
        stem.to_string()
    }
}

/// Keeps only URLs that parse with an http(s) scheme.
fn checked_url(url: &str) -> Option<String> {
    match Url::parse(url) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => Some(url.to_string()),
        Ok(parsed) => {
            warn!("Skipping unsupported scheme {} for URL: {url}", parsed.scheme());
            None
        }
        Err(_) => {
            warn!("Skipping invalid URL: {url}");
            None
        }
    }
}
