//! SOCKS5 handshake probe.
//!
//! Verifies that a SOCKS5 proxy is reachable and willing to talk (RFC 1928,
//! with the RFC 1929 username/password sub-negotiation the original servers
//! speak). The probe stops after negotiation; it never issues a CONNECT
//! request, so no traffic is relayed through the proxy.

use std::time::{Duration, Instant};

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::timeout;

use crate::error_handling::ProbeError;
use crate::models::ProxyConfig;

const SOCKS_VERSION: u8 = 0x05;
const METHOD_NO_AUTH: u8 = 0x00;
const REPLY_SUCCESS: [u8; 2] = [SOCKS_VERSION, 0x00];

/// Performs the SOCKS5 greeting (and, when credentials are configured, the
/// username/password sub-negotiation) against `proxy`.
///
/// The greeting always advertises the single no-auth method, regardless of
/// configured credentials; the sub-negotiation only runs when `username` is
/// non-empty.
///
/// # Returns
///
/// Elapsed wall time in milliseconds on success.
///
/// # Errors
///
/// * `ProbeError::Connect` - TCP connect failed or timed out (the timeout is
///   named in the message text).
/// * `ProbeError::HandshakeFailed` - the greeting reply was not `05 00`, or
///   the proxy hung up mid-negotiation.
/// * `ProbeError::AuthFailed` - the credential sub-negotiation was rejected.
pub async fn probe_socks5(
    proxy: &ProxyConfig,
    connect_timeout: Duration,
    io_timeout: Duration,
) -> Result<f64, ProbeError> {
    let start = Instant::now();
    let address = format!("{}:{}", proxy.host, proxy.port);

    let mut stream = match timeout(connect_timeout, TcpStream::connect(&address)).await {
        Ok(Ok(stream)) => stream,
        Ok(Err(e)) => return Err(ProbeError::Connect(e.to_string())),
        Err(_) => {
            return Err(ProbeError::Connect(format!(
                "connection to {address} timed out after {}s",
                connect_timeout.as_secs()
            )))
        }
    };

    // Greeting: version 5, one method, no-auth.
    let greeting = [SOCKS_VERSION, 0x01, METHOD_NO_AUTH];
    exchange(&mut stream, &greeting, io_timeout)
        .await
        .map_err(|_| ProbeError::HandshakeFailed)
        .and_then(|reply| {
            if reply == REPLY_SUCCESS {
                Ok(())
            } else {
                Err(ProbeError::HandshakeFailed)
            }
        })?;

    if proxy.has_credentials() {
        let username = proxy.username.as_deref().unwrap_or("");
        let password = proxy.password.as_deref().unwrap_or("");
        let mut message = Vec::with_capacity(3 + username.len() + password.len());
        message.push(SOCKS_VERSION);
        push_field(&mut message, username);
        push_field(&mut message, password);

        exchange(&mut stream, &message, io_timeout)
            .await
            .map_err(|_| ProbeError::AuthFailed)
            .and_then(|reply| {
                if reply == REPLY_SUCCESS {
                    Ok(())
                } else {
                    Err(ProbeError::AuthFailed)
                }
            })?;
    }

    // Connection dropped here; handshake verification only.
    Ok(start.elapsed().as_secs_f64() * 1000.0)
}

/// Writes `message` and reads the fixed 2-byte reply, both under `io_timeout`.
async fn exchange(
    stream: &mut TcpStream,
    message: &[u8],
    io_timeout: Duration,
) -> std::io::Result<[u8; 2]> {
    timeout(io_timeout, stream.write_all(message))
        .await
        .map_err(|_| std::io::Error::from(std::io::ErrorKind::TimedOut))??;

    let mut reply = [0u8; 2];
    timeout(io_timeout, stream.read_exact(&mut reply))
        .await
        .map_err(|_| std::io::Error::from(std::io::ErrorKind::TimedOut))??;
    Ok(reply)
}

/// Appends a length-prefixed field, truncated to the 255-byte wire limit.
fn push_field(message: &mut Vec<u8>, value: &str) {
    let bytes = &value.as_bytes()[..value.len().min(255)];
    message.push(bytes.len() as u8);
    message.extend_from_slice(bytes);
}

#[cfg(test)]
mod tests {
    use super::push_field;

    #[test]
    fn test_push_field_length_prefix() {
        let mut buf = Vec::new();
        push_field(&mut buf, "user");
        assert_eq!(buf, [4, b'u', b's', b'e', b'r']);
    }

    #[test]
    fn test_push_field_empty_password() {
        let mut buf = Vec::new();
        push_field(&mut buf, "");
        assert_eq!(buf, [0]);
    }

    #[test]
    fn test_push_field_truncates_at_wire_limit() {
        let long = "x".repeat(300);
        let mut buf = Vec::new();
        push_field(&mut buf, &long);
        assert_eq!(buf[0], 255);
        assert_eq!(buf.len(), 256);
    }
}
