//! HTTP redirect chain tracking.
//!
//! Follows redirects manually, recording every 3xx hop's status and target
//! so the full path from initial URL to final destination is preserved.

use std::time::Instant;

use reqwest::Url;

use crate::error_handling::format_transport_error;
use crate::models::RedirectHop;

/// How a redirect walk ended.
pub(super) enum ChainEnd {
    /// A non-redirect response was reached; the caller consumes it.
    Final(reqwest::Response),
    /// The transport gave up; `url` is the hop being fetched at the time.
    Transport { message: String, url: String },
}

/// Follows the redirect chain from `start_url`, recording each 3xx hop into
/// `chain`, until a final response, the hop bound, or the deadline.
///
/// Every response with status in {301, 302, 303, 307, 308} carrying a
/// `Location` header appends one hop before advancing. The hop records the
/// `Location` value as observed (possibly relative); resolution against the
/// current URL only determines where the walk goes next. A 3xx without
/// `Location` terminates the chain as the final response. Each hop request
/// gets the time remaining until `deadline`.
pub(super) async fn walk_redirect_chain(
    client: &reqwest::Client,
    start_url: &str,
    max_hops: usize,
    deadline: Instant,
    chain: &mut Vec<RedirectHop>,
) -> ChainEnd {
    let mut current = start_url.to_string();
    let mut hops = 0usize;

    loop {
        let now = Instant::now();
        if now >= deadline {
            return ChainEnd::Transport {
                message: "request timed out: total timeout exceeded".to_string(),
                url: current,
            };
        }

        let response = match client
            .get(&current)
            .timeout(deadline.duration_since(now))
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                return ChainEnd::Transport {
                    message: format_transport_error(&e),
                    url: current,
                }
            }
        };

        let status = response.status().as_u16();
        if !is_redirect_status(status) {
            return ChainEnd::Final(response);
        }

        let location = response
            .headers()
            .get(reqwest::header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|s| !s.is_empty());
        let Some(location) = location else {
            // Redirect status but no Location header - unusual; treat as final
            log::warn!("Redirect status {status} for {current} without Location header");
            return ChainEnd::Final(response);
        };

        let Some(next) = resolve_location(&current, location) else {
            return ChainEnd::Transport {
                message: format!("invalid redirect Location {location:?}"),
                url: current,
            };
        };

        if hops == max_hops {
            return ChainEnd::Transport {
                message: format!("maximum redirects followed ({max_hops})"),
                url: current,
            };
        }

        chain.push(RedirectHop {
            status,
            location: location.to_string(),
        });
        hops += 1;
        current = next;
    }
}

/// Whether `status` is one of the tracked redirect codes.
pub(super) fn is_redirect_status(status: u16) -> bool {
    matches!(status, 301 | 302 | 303 | 307 | 308)
}

/// Resolves a `Location` header value to an absolute URL, joining relative
/// values against the URL that produced them.
pub(super) fn resolve_location(current: &str, location: &str) -> Option<String> {
    Url::parse(location)
        .or_else(|_| Url::parse(current).and_then(|base| base.join(location)))
        .map(|url| url.to_string())
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_redirect_status() {
        for status in [301, 302, 303, 307, 308] {
            assert!(is_redirect_status(status), "{status} should be tracked");
        }
        for status in [200, 204, 300, 304, 404, 500] {
            assert!(!is_redirect_status(status), "{status} should not be tracked");
        }
    }

    #[test]
    fn test_resolve_absolute_location() {
        let resolved = resolve_location(
            "http://example.com/live.m3u8",
            "https://cdn.example.net/stream/index.m3u8",
        );
        assert_eq!(
            resolved.as_deref(),
            Some("https://cdn.example.net/stream/index.m3u8")
        );
    }

    #[test]
    fn test_resolve_relative_location() {
        let resolved = resolve_location("http://example.com/tv/live.m3u8", "/hls/index.m3u8");
        assert_eq!(resolved.as_deref(), Some("http://example.com/hls/index.m3u8"));
    }

    #[test]
    fn test_resolve_invalid_location() {
        assert!(resolve_location("not a url", "also not a url").is_none());
    }
}
