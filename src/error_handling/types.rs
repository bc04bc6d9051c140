//! Error type definitions.
//!
//! This module defines the structured errors surfaced by the probe pipeline
//! and the categories used for per-run error statistics.

use strum_macros::EnumIter as EnumIterMacro;
use thiserror::Error;

/// Errors produced while probing a single proxy or target.
///
/// Per-target failures never abort the batch; they resolve into a
/// `ProbeResult` carrying the rendered message. The only paths that abort a
/// run are modeled by [`BatchError`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProbeError {
    /// Cannot reach the proxy or origin at the TCP level.
    #[error("unable to connect to proxy server: {0}")]
    Connect(String),

    /// The SOCKS5 greeting was rejected or answered with garbage.
    #[error("SOCKS5 handshake failed")]
    HandshakeFailed,

    /// The SOCKS5 username/password sub-negotiation was rejected.
    #[error("SOCKS5 authentication failed")]
    AuthFailed,

    /// The final response carried a non-200 status.
    #[error("HTTP error status: {0}")]
    Http(u16),

    /// Timeout, TLS, DNS, or any other transport-level failure.
    #[error("{0}")]
    Transport(String),
}

/// Run-level failures reported before or instead of a `RunSummary`.
#[derive(Error, Debug)]
pub enum BatchError {
    /// The caller supplied an empty target list. Reported before any
    /// network activity.
    #[error("target list is empty")]
    NoTargets,

    /// The pre-flight SOCKS5 probe failed; zero targets were fetched.
    #[error("proxy connectivity check failed: {0}")]
    ProxyCheckFailed(#[source] ProbeError),
}

/// Categories for per-run error statistics.
///
/// Every attempted-and-failed target increments exactly one counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum ErrorType {
    ProxyConnectError,
    ProxyHandshakeError,
    ProxyAuthError,
    HttpRequestTimeoutError,
    HttpRequestConnectError,
    HttpRequestRedirectError,
    HttpRequestBodyError,
    HttpRequestOtherError,
    HttpStatusClientError,
    HttpStatusServerError,
    HttpStatusOtherError,
}

impl std::fmt::Display for ErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ErrorType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorType::ProxyConnectError => "Proxy connect error",
            ErrorType::ProxyHandshakeError => "SOCKS5 handshake error",
            ErrorType::ProxyAuthError => "SOCKS5 authentication error",
            ErrorType::HttpRequestTimeoutError => "HTTP request timeout error",
            ErrorType::HttpRequestConnectError => "HTTP request connect error",
            ErrorType::HttpRequestRedirectError => "HTTP request redirect error",
            ErrorType::HttpRequestBodyError => "HTTP request body error",
            ErrorType::HttpRequestOtherError => "HTTP request other error",
            ErrorType::HttpStatusClientError => "HTTP status 4xx",
            ErrorType::HttpStatusServerError => "HTTP status 5xx",
            ErrorType::HttpStatusOtherError => "HTTP status other",
        }
    }
}
