//! Error categorization and failure-text matching.
//!
//! This module maps transport and status failures onto `ErrorType` counters
//! and hosts the fuzzy text matchers used by the stop-on-failure heuristic
//! and the report's timed-out bucket.

use std::sync::LazyLock;

use regex::Regex;

use super::types::{ErrorType, ProbeError};
use crate::config::DEFAULT_ABORT_PATTERN;

/// Default matcher for "the proxy itself is broken" error text.
static PROXY_FAILURE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(DEFAULT_ABORT_PATTERN).expect("default abort pattern must compile")
});

/// Matcher for the report's timed-out bucket: transport never delivered a
/// response, or the message names a timeout/connect-level failure.
static TIMEOUT_LIKE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)timed out|timeout|empty reply|connect").expect("timeout pattern must compile")
});

/// Categorizes a `ProbeError` into an `ErrorType`.
pub fn categorize_probe_error(error: &ProbeError) -> ErrorType {
    match error {
        ProbeError::Connect(_) => ErrorType::ProxyConnectError,
        ProbeError::HandshakeFailed => ErrorType::ProxyHandshakeError,
        ProbeError::AuthFailed => ErrorType::ProxyAuthError,
        ProbeError::Http(status) => categorize_status(*status),
        ProbeError::Transport(message) => {
            let lower = message.to_ascii_lowercase();
            if lower.contains("timed out") || lower.contains("timeout") {
                ErrorType::HttpRequestTimeoutError
            } else if lower.contains("connect") {
                ErrorType::HttpRequestConnectError
            } else if lower.contains("redirect") {
                ErrorType::HttpRequestRedirectError
            } else if lower.contains("body") || lower.contains("decode") {
                ErrorType::HttpRequestBodyError
            } else {
                ErrorType::HttpRequestOtherError
            }
        }
    }
}

fn categorize_status(status: u16) -> ErrorType {
    match status {
        400..=499 => ErrorType::HttpStatusClientError,
        500..=599 => ErrorType::HttpStatusServerError,
        _ => ErrorType::HttpStatusOtherError,
    }
}

/// Renders a `reqwest::Error` into the transport-error string stored on a
/// `FetchOutcome`. Timeouts are spelled out so downstream text matchers
/// (stop heuristic, timed-out report bucket) can recognize them.
pub fn format_transport_error(error: &reqwest::Error) -> String {
    if error.is_timeout() {
        format!("request timed out: {error}")
    } else if error.is_connect() {
        format!("connect error: {error}")
    } else {
        error.to_string()
    }
}

/// Whether error text looks like a proxy-level failure.
///
/// The underlying transport errors are not reliably classified upstream, so
/// this stays a loose pattern match (see the stop-on-first-failure config).
/// `pattern` overrides the default policy when supplied.
pub fn is_proxy_failure(error_text: &str, pattern: Option<&Regex>) -> bool {
    match pattern {
        Some(re) => re.is_match(error_text),
        None => PROXY_FAILURE_RE.is_match(error_text),
    }
}

/// Whether error text (or a missing status) belongs in the timed-out report
/// bucket rather than the invalid one.
pub fn is_timeout_like(error_text: &str) -> bool {
    TIMEOUT_LIKE_RE.is_match(error_text)
}

/// Compiles a caller-supplied abort pattern, falling back to the default
/// policy (with a warning) when it does not parse.
pub fn compile_abort_pattern(pattern: Option<&str>) -> Option<Regex> {
    let raw = pattern?;
    match Regex::new(raw) {
        Ok(re) => Some(re),
        Err(e) => {
            log::warn!("Invalid abort pattern {raw:?}, using default: {e}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_proxy_failure_default_pattern() {
        assert!(is_proxy_failure("unable to connect to proxy server: refused", None));
        assert!(is_proxy_failure("Empty reply from server", None));
        assert!(is_proxy_failure("PROXY handshake rejected", None));
        assert!(!is_proxy_failure("HTTP error status: 404", None));
    }

    #[test]
    fn test_proxy_failure_custom_pattern() {
        let re = Regex::new("(?i)tunnel").unwrap();
        assert!(is_proxy_failure("Tunnel collapsed", Some(&re)));
        assert!(!is_proxy_failure("Empty reply from server", Some(&re)));
    }

    #[test]
    fn test_timeout_like_matching() {
        assert!(is_timeout_like("request timed out: deadline elapsed"));
        assert!(is_timeout_like("connect error: refused"));
        assert!(is_timeout_like("Empty reply from server"));
        assert!(!is_timeout_like("HTTP error status: 500"));
    }

    #[test]
    fn test_categorize_probe_error() {
        assert_eq!(
            categorize_probe_error(&ProbeError::Connect("refused".into())),
            ErrorType::ProxyConnectError
        );
        assert_eq!(
            categorize_probe_error(&ProbeError::HandshakeFailed),
            ErrorType::ProxyHandshakeError
        );
        assert_eq!(
            categorize_probe_error(&ProbeError::AuthFailed),
            ErrorType::ProxyAuthError
        );
        assert_eq!(
            categorize_probe_error(&ProbeError::Http(404)),
            ErrorType::HttpStatusClientError
        );
        assert_eq!(
            categorize_probe_error(&ProbeError::Http(503)),
            ErrorType::HttpStatusServerError
        );
        assert_eq!(
            categorize_probe_error(&ProbeError::Http(302)),
            ErrorType::HttpStatusOtherError
        );
        assert_eq!(
            categorize_probe_error(&ProbeError::Transport("request timed out".into())),
            ErrorType::HttpRequestTimeoutError
        );
        assert_eq!(
            categorize_probe_error(&ProbeError::Transport("connect error: refused".into())),
            ErrorType::HttpRequestConnectError
        );
        assert_eq!(
            categorize_probe_error(&ProbeError::Transport("maximum redirects followed (10)".into())),
            ErrorType::HttpRequestRedirectError
        );
        assert_eq!(
            categorize_probe_error(&ProbeError::Transport("TLS alert".into())),
            ErrorType::HttpRequestOtherError
        );
    }

    #[test]
    fn test_compile_abort_pattern_falls_back_on_invalid() {
        assert!(compile_abort_pattern(Some("(?i)gateway")).is_some());
        assert!(compile_abort_pattern(Some("(unclosed")).is_none());
        assert!(compile_abort_pattern(None).is_none());
    }
}
